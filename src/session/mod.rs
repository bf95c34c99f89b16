//! Interactive sessions and their reply channel.
//!
//! A session is one inbound request recognized as a command invocation,
//! together with the transport used to answer it. The transport tracks the
//! reply state on the platform side:
//!
//! ```text
//!   NONE ──reply──▶ REPLIED ◀──edit── DEFERRED ◀──defer── NONE
//!                     │
//!                     └──follow-up──▶ REPLIED
//! ```
//!
//! A session may also expire at any point, after which nothing can be sent.
//! All sends go through the session's [`SessionGateway`].

mod gateway;

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

pub use crate::session::gateway::{ReplyAction, SessionGateway};
use crate::commands::Invocation;

/// Reply state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    /// Nothing was sent yet
    None,
    /// An acknowledgement was sent, the final content is pending
    Deferred,
    /// The final content was sent; only follow-ups are possible
    Replied,
    /// The session can no longer be answered
    Expired,
}

/// Platform side of a session.
///
/// Every send may fail; failures are returned, never panicked.
#[automock]
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Current reply state as known by the platform.
    fn reply_state(&self) -> ReplyState;
    /// Whether the session can still be answered.
    fn is_repliable(&self) -> bool;
    /// Sends the first reply.
    async fn reply(&self, content: &str) -> anyhow::Result<()>;
    /// Replaces the pending reply of a deferred session.
    async fn edit_reply(&self, content: &str) -> anyhow::Result<()>;
    /// Sends a supplementary message after the reply.
    async fn follow_up(&self, content: &str) -> anyhow::Result<()>;
    /// Acknowledges the session without final content.
    async fn defer(&self) -> anyhow::Result<()>;
}

/// User who started a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

/// Channel or room a session happens in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
}

/// Raw inbound request, before it is recognized as a command.
pub struct Inbound {
    /// Message text
    pub body: String,
    /// Sender of the message
    pub actor: Actor,
    /// Channel of the message, `None` for direct messages
    pub group: Option<Group>,
    /// Transport used to answer
    pub transport: Arc<dyn SessionTransport>,
}

/// A command invocation and its reply channel.
pub struct Session {
    actor: Actor,
    group: Option<Group>,
    invocation: Invocation,
    gateway: SessionGateway,
}

impl Session {
    pub fn new(inbound: Inbound, invocation: Invocation) -> Self {
        Session {
            actor: inbound.actor,
            group: inbound.group,
            invocation,
            gateway: SessionGateway::new(inbound.transport),
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    pub fn command_name(&self) -> &str {
        &self.invocation.name
    }

    /// Arguments following the command name.
    pub fn args(&self) -> &[String] {
        &self.invocation.args
    }

    pub fn gateway(&self) -> &SessionGateway {
        &self.gateway
    }

    /// Sends `content` with whichever operation the reply state allows.
    pub async fn respond(&self, content: &str) -> anyhow::Result<ReplyAction> {
        Ok(self.gateway.send(content).await?)
    }

    /// Acknowledges the session so the final content can come later.
    pub async fn defer(&self) -> anyhow::Result<()> {
        Ok(self.gateway.defer().await?)
    }
}
