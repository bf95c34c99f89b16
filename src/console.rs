//! Console session transport.
//!
//! Each line typed on stdin is one inbound message; replies are written to
//! stdout. A console session stays repliable for a configured time, after
//! which it behaves like an expired platform interaction.

use std::{
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::io::{self, AsyncWriteExt};

use crate::session::{Actor, Inbound, ReplyState, SessionTransport};

/// Transport of one console session.
///
/// The reply state is tracked locally, since stdout has no notion of a
/// pending reply:
///
/// - `reply` writes the content and marks the session as replied
/// - `defer` writes an ellipsis, and `edit_reply` writes the content prefixed
///   with `(edited)`
/// - `follow_up` writes the content without changing the state
///
/// # Examples
///
/// ```text
/// let transport = ConsoleTransport::new(Duration::from_secs(900));
/// transport.reply("🏓 Pong!").await?;
/// assert_eq!(transport.reply_state(), ReplyState::Replied);
/// ```
pub struct ConsoleTransport {
    /// Reply state of the session
    state: Mutex<ReplyState>,
    /// When the line was read
    opened: Instant,
    /// How long the session can be answered
    ttl: Duration,
}

impl ConsoleTransport {
    /// Opens a console session that stays repliable for `ttl`.
    ///
    /// # Arguments
    ///
    /// * `ttl` - The time after which the session counts as expired
    pub fn new(ttl: Duration) -> Self {
        ConsoleTransport {
            state: Mutex::new(ReplyState::None),
            opened: Instant::now(),
            ttl,
        }
    }

    /// Wraps a typed line into an inbound message from `user`.
    ///
    /// Console messages have no group, so their errors are logged as direct
    /// messages. The actor id is `console:<user>`.
    ///
    /// # Arguments
    ///
    /// * `line` - The line read on stdin
    /// * `user` - The configured console user
    /// * `ttl` - The time-to-live of the new session
    ///
    /// # Returns
    ///
    /// The inbound message, carrying a fresh [`ConsoleTransport`].
    pub fn inbound(line: String, user: &str, ttl: Duration) -> Inbound {
        Inbound {
            body: line,
            actor: Actor {
                id: format!("console:{user}"),
                name: user.to_owned(),
            },
            group: None,
            transport: Arc::new(ConsoleTransport::new(ttl)),
        }
    }

    fn set_state(&self, state: ReplyState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    async fn write(&self, line: &str) -> anyhow::Result<()> {
        let mut stdout = io::stdout();
        stdout.write_all(format!("{line}\n").as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl SessionTransport for ConsoleTransport {
    fn reply_state(&self) -> ReplyState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_repliable(&self) -> bool {
        self.opened.elapsed() < self.ttl
    }

    async fn reply(&self, content: &str) -> anyhow::Result<()> {
        self.write(content).await?;
        self.set_state(ReplyState::Replied);
        Ok(())
    }

    async fn edit_reply(&self, content: &str) -> anyhow::Result<()> {
        self.write(&format!("(edited) {content}")).await?;
        self.set_state(ReplyState::Replied);
        Ok(())
    }

    async fn follow_up(&self, content: &str) -> anyhow::Result<()> {
        self.write(content).await
    }

    async fn defer(&self) -> anyhow::Result<()> {
        self.write("…").await?;
        self.set_state(ReplyState::Deferred);
        Ok(())
    }
}
