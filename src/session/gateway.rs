//! Three-state reply protocol.

use std::sync::Arc;

use log::debug;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    reporting::{ErrorRecord, ReportOptions, Reporter, keys},
    session::{ReplyState, SessionTransport},
};

/// Operation used to send a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyAction {
    /// First reply of the session
    Replied,
    /// Pending reply of a deferred session replaced
    Edited,
    /// Supplementary message after the reply
    FollowedUp,
}

/// Outcome of delivering an error reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent(ReplyAction),
    /// The session expired, `EXPIRED_INTERACTION` was escalated
    Expired,
    /// The transport failed, `FAILED_REPLY` was escalated
    Failed,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("session is no longer repliable")]
    Expired,
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Single entry point for every message sent to a session.
///
/// The reply state is read from the transport at the moment of sending, under
/// a per-session lock, so two sends on the same session never pick their
/// operation from the same stale state.
pub struct SessionGateway {
    transport: Arc<dyn SessionTransport>,
    lock: Mutex<()>,
}

impl SessionGateway {
    pub fn new(transport: Arc<dyn SessionTransport>) -> Self {
        SessionGateway {
            transport,
            lock: Mutex::new(()),
        }
    }

    /// Current state, `Expired` as soon as the transport stops being repliable.
    pub fn state(&self) -> ReplyState {
        if !self.transport.is_repliable() {
            return ReplyState::Expired;
        }
        self.transport.reply_state()
    }

    /// Sends `content` with the operation allowed by the current state.
    ///
    /// | state    | operation        |
    /// |----------|------------------|
    /// | NONE     | `reply`          |
    /// | DEFERRED | `edit_reply`     |
    /// | REPLIED  | `follow_up`      |
    /// | EXPIRED  | none, error      |
    pub async fn send(&self, content: &str) -> Result<ReplyAction, DeliveryError> {
        let _guard = self.lock.lock().await;

        let action = match self.state() {
            ReplyState::Expired => return Err(DeliveryError::Expired),
            ReplyState::Replied => {
                self.transport.follow_up(content).await?;
                ReplyAction::FollowedUp
            }
            ReplyState::Deferred => {
                self.transport.edit_reply(content).await?;
                ReplyAction::Edited
            }
            ReplyState::None => {
                self.transport.reply(content).await?;
                ReplyAction::Replied
            }
        };

        debug!("session answered with {:?}", action);

        Ok(action)
    }

    /// Acknowledges the session. Does nothing if it was already answered.
    pub async fn defer(&self) -> Result<(), DeliveryError> {
        let _guard = self.lock.lock().await;

        match self.state() {
            ReplyState::Expired => Err(DeliveryError::Expired),
            ReplyState::None => Ok(self.transport.defer().await?),
            ReplyState::Deferred | ReplyState::Replied => Ok(()),
        }
    }

    /// Delivers the error reply about `record`.
    ///
    /// Delivery problems are new failures: they are escalated through
    /// `reporter` with `record` as primary error, never returned.
    pub async fn deliver(
        &self,
        content: &str,
        record: &Arc<ErrorRecord>,
        reporter: &Reporter,
    ) -> Delivery {
        match self.send(content).await {
            Ok(action) => Delivery::Sent(action),
            Err(DeliveryError::Expired) => {
                reporter.escalate(
                    keys::EXPIRED_INTERACTION,
                    ReportOptions::new()
                        .primary(Arc::clone(record))
                        .forced_reply(record.forced_reply()),
                );
                Delivery::Expired
            }
            Err(DeliveryError::Transport(cause)) => {
                reporter.escalate(
                    keys::FAILED_REPLY,
                    ReportOptions::new()
                        .cause(cause)
                        .primary(Arc::clone(record))
                        .forced_reply(record.forced_reply()),
                );
                Delivery::Failed
            }
        }
    }
}
