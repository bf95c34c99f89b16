//! Command handlers, their registration and loading.
//!
//! # Architecture
//!
//! ```text
//! config entries (name, reference)
//!      │
//!      ▼
//! ┌────────────────┐   resolve(reference)   ┌──────────────────┐
//! │ CommandLoader  │ ─────────────────────▶ │ CommandResolver  │
//! └────────────────┘                        └──────────────────┘
//!      │  (name, LoadOutcome)                 static table of
//!      ▼                                      CommandModule factories
//! ┌────────────────┐
//! │CommandRegistry │  ← built once, all commands loaded in parallel
//! └────────────────┘
//!      │  get(name)
//!      ▼
//!   Dispatcher
//! ```
//!
//! Loading never fails: a registration that cannot be loaded becomes an
//! unavailable command that tells the user why. Loaded commands are wrapped so
//! that their failures are reported through their own [`Scope`].
//!
//! # Module Organization
//!
//! - [`invocation`] - recognizing `!<bot> <command> args...` messages
//! - [`resolver`] - turning a reference into a [`CommandModule`]
//! - [`loader`] - loading one registration into a handler
//! - [`registry`] - the name to handler table
//! - [`actions`] - built-in commands

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

mod actions;
mod invocation;
mod loader;
mod registry;
mod resolver;

pub use crate::commands::{
    invocation::Invocation,
    loader::{CommandLoader, LoadOutcome},
    registry::CommandRegistry,
    resolver::{CommandResolver, StaticResolver},
};
use crate::{reporting::Scope, session::Session};

/// Something that can be executed for a session.
///
/// Loaded commands, unavailable stubs and the guards around them all
/// implement this trait, so the dispatcher treats them the same way.
#[async_trait]
pub trait Command: Send + Sync {
    async fn execute(&self, session: Arc<Session>) -> anyhow::Result<()>;
}

/// What a resolver returns for a reference.
pub struct CommandModule {
    /// Execution entry point, `None` for incomplete plugins
    pub execute: Option<Arc<dyn Command>>,
    /// Messages and replies for the command's own failures
    pub scope: Scope,
}

impl CommandModule {
    /// A module executing `command`, with `scope` for its failures.
    pub fn new(command: impl Command + 'static, scope: Scope) -> Self {
        CommandModule {
            execute: Some(Arc::new(command)),
            scope,
        }
    }
}

/// Failure raised by a command with a key of its own scope.
///
/// # Examples
///
/// ```text
/// return Err(CommandFailure::new("MISSING_TEXT").arg(&user).into());
/// ```
#[derive(Debug, Error)]
#[error("command failed with {key}")]
pub struct CommandFailure {
    key: &'static str,
    args: Vec<String>,
}

impl CommandFailure {
    pub fn new(key: &'static str) -> Self {
        CommandFailure {
            key,
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}
