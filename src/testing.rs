//! Test doubles shared by unit tests.

use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::{
    commands::Invocation,
    reporting::{IdentityContext, LogSink, Reporter, Scope},
    session::{Actor, Group, Inbound, ReplyState, Session, SessionTransport},
};

/// Log sink keeping every line in memory.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for MemorySink {
    fn write(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_owned());
    }
}

/// Transport tracking its reply state like a platform would, and recording
/// every call as `op:content`.
pub struct FakeTransport {
    state: Mutex<ReplyState>,
    calls: Mutex<Vec<String>>,
    repliable: bool,
    failing: bool,
}

impl Default for FakeTransport {
    fn default() -> Self {
        FakeTransport::with_state(ReplyState::None)
    }
}

impl FakeTransport {
    pub fn new() -> Self {
        FakeTransport::default()
    }

    pub fn with_state(state: ReplyState) -> Self {
        FakeTransport {
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
            repliable: true,
            failing: false,
        }
    }

    /// No longer repliable.
    pub fn expired(mut self) -> Self {
        self.repliable = false;
        self
    }

    /// Every operation fails and leaves the state untouched.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn state(&self) -> ReplyState {
        *self.state.lock().unwrap()
    }

    fn call(&self, op: &str, content: Option<&str>, next: ReplyState) -> anyhow::Result<()> {
        let mut calls = self.calls.lock().unwrap();
        if self.failing {
            calls.push(format!("{op}-failed"));
            return Err(anyhow!("transport down"));
        }
        match content {
            Some(content) => calls.push(format!("{op}:{content}")),
            None => calls.push(op.to_owned()),
        }
        *self.state.lock().unwrap() = next;
        Ok(())
    }
}

#[async_trait]
impl SessionTransport for FakeTransport {
    fn reply_state(&self) -> ReplyState {
        self.state()
    }

    fn is_repliable(&self) -> bool {
        self.repliable
    }

    async fn reply(&self, content: &str) -> anyhow::Result<()> {
        self.call("reply", Some(content), ReplyState::Replied)
    }

    async fn edit_reply(&self, content: &str) -> anyhow::Result<()> {
        self.call("edit", Some(content), ReplyState::Replied)
    }

    async fn follow_up(&self, content: &str) -> anyhow::Result<()> {
        self.call("follow_up", Some(content), ReplyState::Replied)
    }

    async fn defer(&self) -> anyhow::Result<()> {
        self.call("defer", None, ReplyState::Deferred)
    }
}

/// Session of alice in the Lobby invoking `command`.
pub fn session(command: &str, args: &[&str], transport: Arc<FakeTransport>) -> Arc<Session> {
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    let inbound = Inbound {
        body: format!("!parley {} {}", command, args.join(" ")),
        actor: Actor {
            id: "@alice:example.com".to_owned(),
            name: "alice".to_owned(),
        },
        group: Some(Group {
            id: "!lobby:example.com".to_owned(),
            name: "Lobby".to_owned(),
        }),
        transport,
    };

    Arc::new(Session::new(inbound, Invocation::new(command, args)))
}

/// Reporter for `scope` writing into a memory sink, escalating like the bot.
pub fn reporter(scope: Scope) -> (Reporter, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::default());
    let escalation = Reporter::terminal(Scope::reporting(), sink.clone(), IdentityContext::init());
    (Reporter::new(scope, escalation), sink)
}
