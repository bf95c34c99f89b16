//! Name to handler table.

use std::{collections::HashMap, sync::Arc};

use futures::future::join_all;
use log::{info, warn};

use crate::{
    commands::{Command, CommandLoader, LoadOutcome},
    config::CommandEntry,
};

/// Every configured command, loaded or unavailable.
///
/// The registry is built in one piece after all loads resolved, so the
/// dispatcher never sees a partially populated table.
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Loads all `entries` in parallel.
    pub async fn load(loader: &CommandLoader, entries: &[CommandEntry]) -> Self {
        let loaded = join_all(
            entries
                .iter()
                .map(|entry| loader.load(entry.name.as_deref(), entry.reference.as_deref())),
        )
        .await;

        let ready = loaded.iter().filter(|(_, outcome)| outcome.is_ready()).count();
        let registry = CommandRegistry::from_loaded(loaded);
        info!(
            "{} commands registered, {} entries failed to load",
            registry.len(),
            entries.len() - ready
        );
        registry
    }

    /// Builds the table. For duplicated names the first registration wins.
    pub fn from_loaded(loaded: impl IntoIterator<Item = (String, LoadOutcome)>) -> Self {
        let mut commands = HashMap::new();

        for (name, outcome) in loaded {
            if commands.contains_key(&name) {
                warn!("command {} registered twice, keeping the first one", name);
                continue;
            }
            if let LoadOutcome::Unavailable { record, .. } = &outcome {
                match record {
                    Some(record) => {
                        warn!("command {} is unavailable, see error {}", name, record.id())
                    }
                    None => warn!("command {} is unavailable", name),
                }
            }
            commands.insert(name, Arc::clone(outcome.handler()));
        }

        CommandRegistry { commands }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
