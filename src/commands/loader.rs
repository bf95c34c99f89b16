//! Loading command registrations into handlers.

use std::{panic::AssertUnwindSafe, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use futures::FutureExt;
use log::{debug, info};

use crate::{
    commands::{Command, CommandModule, CommandResolver},
    reporting::{ErrorRecord, ReportOptions, Reporter, Scope, keys, panic_message},
    session::Session,
};

/// Result of loading one registration.
pub enum LoadOutcome {
    /// The command resolved and is wrapped with its own scope
    Ready(Arc<dyn Command>),
    /// The command could not be loaded; the handler only explains why
    Unavailable {
        /// Stub replying with the reason
        handler: Arc<dyn Command>,
        /// Logged record of the reason, `None` if reporting itself failed
        record: Option<Arc<ErrorRecord>>,
    },
}

impl LoadOutcome {
    /// Handler to register, whether the command loaded or not.
    pub fn handler(&self) -> &Arc<dyn Command> {
        match self {
            LoadOutcome::Ready(handler) => handler,
            LoadOutcome::Unavailable { handler, .. } => handler,
        }
    }

    /// Returns `true` if the command itself was loaded.
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadOutcome::Ready(_))
    }
}

/// Loads command registrations through a resolver.
///
/// Loading never fails: every problem is reported through the loading scope
/// and turns into an unavailable command.
pub struct CommandLoader {
    resolver: Arc<dyn CommandResolver>,
    /// Reporter of the loading scope
    reporter: Reporter,
}

impl CommandLoader {
    /// Creates a loader resolving references through `resolver`.
    ///
    /// # Arguments
    ///
    /// * `resolver` - Turns a command reference into a command module
    /// * `reporter` - The top-level reporter; the loader reports through a copy
    ///   using the loading scope, and guarded commands through a copy using
    ///   their own scope
    ///
    /// # Examples
    ///
    /// ```text
    /// let loader = CommandLoader::new(Arc::new(StaticResolver::builtin()), &reporter);
    /// let (name, outcome) = loader.load(Some("ping"), Some("builtin:ping")).await;
    /// assert!(outcome.is_ready());
    /// ```
    pub fn new(resolver: Arc<dyn CommandResolver>, reporter: &Reporter) -> Self {
        CommandLoader {
            resolver,
            reporter: reporter.scoped(Arc::new(Scope::loading())),
        }
    }

    /// Loads the command `name` from `reference`.
    ///
    /// Returns the name the handler is registered under. When the name is
    /// missing the reference stands in for it.
    pub async fn load(&self, name: Option<&str>, reference: Option<&str>) -> (String, LoadOutcome) {
        let name = name.filter(|name| !name.is_empty());
        let reference = reference.filter(|reference| !reference.is_empty());

        let (name, reference) = match (name, reference) {
            (None, reference) => {
                let identifier = reference.unwrap_or_default().to_owned();
                let outcome =
                    self.unavailable(keys::MISSING_NAME, ReportOptions::new().arg(&identifier));
                return (identifier, outcome);
            }
            (Some(name), None) => {
                let outcome =
                    self.unavailable(keys::MISSING_PATH, ReportOptions::new().arg(name));
                return (name.to_owned(), outcome);
            }
            (Some(name), Some(reference)) => (name, reference),
        };

        debug!("loading command {} from {}", name, reference);

        // Resolution happens inside the future so a panicking resolver is caught too
        let resolved = AssertUnwindSafe(async { self.resolver.resolve(reference).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(anyhow!(
                    "resolver panicked: {}",
                    panic_message(panic.as_ref())
                ))
            });

        let module = match resolved {
            Ok(module) => module,
            Err(cause) => {
                let outcome = self.unavailable(
                    keys::LOAD_FAILED,
                    ReportOptions::new().arg(name).cause(cause),
                );
                return (name.to_owned(), outcome);
            }
        };

        let CommandModule { execute, scope } = module;
        let Some(execute) = execute else {
            let outcome =
                self.unavailable(keys::MISSING_EXECUTE, ReportOptions::new().arg(name));
            return (name.to_owned(), outcome);
        };

        info!("command {} loaded with scope {}", name, scope.name());

        let handler = GuardedCommand {
            inner: execute,
            reporter: self.reporter.scoped(Arc::new(scope)),
        };
        (name.to_owned(), LoadOutcome::Ready(Arc::new(handler)))
    }

    fn unavailable(&self, key: &str, options: ReportOptions) -> LoadOutcome {
        let record = self.reporter.record(key, Some(options));
        let stub = UnavailableCommand {
            reply: self.reporter.scope().reply_for(Some(key)).to_owned(),
        };

        LoadOutcome::Unavailable {
            handler: Arc::new(GuardedCommand {
                inner: Arc::new(stub),
                reporter: self.reporter.clone(),
            }),
            record,
        }
    }
}

/// Funnels the failures and panics of a command into its reporter.
struct GuardedCommand {
    inner: Arc<dyn Command>,
    reporter: Reporter,
}

#[async_trait]
impl Command for GuardedCommand {
    async fn execute(&self, session: Arc<Session>) -> anyhow::Result<()> {
        let outcome = AssertUnwindSafe(async { self.inner.execute(Arc::clone(&session)).await })
            .catch_unwind()
            .await;

        let error = match outcome {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(error)) => error,
            Err(panic) => anyhow!("command panicked: {}", panic_message(panic.as_ref())),
        };

        self.reporter.bind(session).report_error(error).await;
        Ok(())
    }
}

/// Stands in for a command that could not be loaded.
struct UnavailableCommand {
    reply: String,
}

#[async_trait]
impl Command for UnavailableCommand {
    async fn execute(&self, session: Arc<Session>) -> anyhow::Result<()> {
        session.respond(&self.reply).await?;
        Ok(())
    }
}
