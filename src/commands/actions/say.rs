//! Say command handler.
//!
//! Repeats the text following the command. Without text, the command fails
//! with its own `MISSING_TEXT` key, so the reply comes from the say scope
//! rather than the generic error reply.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::{
    commands::{Command, CommandFailure, CommandModule},
    reporting::{Scope, first},
    session::Session,
};

/// Error key of an invocation without text
const MISSING_TEXT: &str = "MISSING_TEXT";

/// Handler for the say command.
struct Say;

#[async_trait]
impl Command for Say {
    async fn execute(&self, session: Arc<Session>) -> anyhow::Result<()> {
        debug!("handling say command");

        if session.args().is_empty() {
            return Err(CommandFailure::new(MISSING_TEXT)
                .arg(&session.actor().name)
                .into());
        }

        session.respond(&session.args().join(" ")).await?;
        Ok(())
    }
}

/// Builds the say command.
///
/// # Returns
///
/// The say handler with its scope. The scope names the user who asked to say
/// nothing in the log and replies with a usage hint that does not depend on
/// the configured bot name or prefix.
pub fn say() -> CommandModule {
    let scope = Scope::new("say")
        .message(MISSING_TEXT, |args| {
            format!("{} asked to say nothing", first(args))
        })
        .reply(MISSING_TEXT, "❌ Nothing to say, add the text to repeat after the command");

    CommandModule::new(Say, scope)
}
