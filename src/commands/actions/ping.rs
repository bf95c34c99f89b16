//! Ping command handler.
//!
//! Defers the session first, so the final answer replaces the pending reply.

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use log::debug;

use crate::{
    commands::{Command, CommandModule},
    reporting::Scope,
    session::Session,
};

/// Handler for the ping command.
///
/// The reply carries the time spent acknowledging the session, which is a
/// rough measure of the transport latency.
struct Ping;

#[async_trait]
impl Command for Ping {
    async fn execute(&self, session: Arc<Session>) -> anyhow::Result<()> {
        debug!("handling ping command");

        let started = Instant::now();
        session.defer().await?;
        let elapsed = started.elapsed().as_millis();

        session.respond(&format!("🏓 Pong! ({elapsed} ms)")).await?;
        Ok(())
    }
}

/// Builds the ping command.
///
/// Ping has no error key of its own, so its scope is empty and every failure
/// gets the default reply.
pub fn ping() -> CommandModule {
    CommandModule::new(Ping, Scope::new("ping"))
}
