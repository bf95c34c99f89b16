//! Resolving command references.
//!
//! Commands are not loaded from paths at runtime. Each reference names a
//! factory in a table built at startup; an unknown reference is a load
//! failure like any other.

use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use mockall::automock;

use crate::commands::{CommandModule, actions};

/// Turns a reference into a command module.
#[automock]
#[async_trait]
pub trait CommandResolver: Send + Sync {
    async fn resolve(&self, reference: &str) -> anyhow::Result<CommandModule>;
}

/// Builds a command module.
pub type Factory = fn() -> CommandModule;

/// Resolver backed by a table of factories.
#[derive(Default)]
pub struct StaticResolver {
    factories: HashMap<&'static str, Factory>,
}

impl StaticResolver {
    /// Resolver knowing the built-in commands.
    pub fn builtin() -> Self {
        StaticResolver::default()
            .register("builtin:ping", actions::ping)
            .register("builtin:say", actions::say)
    }

    pub fn register(mut self, reference: &'static str, factory: Factory) -> Self {
        self.factories.insert(reference, factory);
        self
    }
}

#[async_trait]
impl CommandResolver for StaticResolver {
    async fn resolve(&self, reference: &str) -> anyhow::Result<CommandModule> {
        let factory = self
            .factories
            .get(reference)
            .ok_or_else(|| anyhow!("no command registered under {reference}"))?;
        Ok(factory())
    }
}
