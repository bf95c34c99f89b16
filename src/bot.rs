//! Bot module wiring reporting, commands and the console together.
//!
//! This module provides the main [`Bot`] implementation. It builds the error
//! reporting chain, loads every configured command, and then turns each line
//! read on stdin into a command session.
//!
//! # Startup
//!
//! 1. **Identity context**: initialized first, so every error record of the
//!    process is numbered from the same counter.
//! 2. **Reporting chain**: a terminal reporter with the reporting scope, and the
//!    top-level reporter escalating to it.
//! 3. **Commands**: all configured entries are loaded in parallel. The
//!    dispatcher is only created once the registry is complete.
//!
//! # Architecture
//!
//! ```text
//! stdin line → ConsoleTransport::inbound → JoinSet task → Dispatcher::dispatch
//!                                                              │
//!                                  CommandRegistry (loaded once at startup)
//! ```
//!
//! Each line is dispatched on its own task, so a slow command never blocks
//! reading the next line. A task that panics outside of its command guard is
//! reported as `UNCAUGHT_PANIC`. Ctrl-C stops reading and waits for the
//! sessions still running.
//!
//! # Example
//!
//! ```no_run
//! # use parley::bot::Bot;
//! # use parley::config::Config;
//! # async fn run() -> Result<(), figment::Error> {
//! let config = Config::load("parley.yaml")?;
//!
//! let bot = Bot::new(config).await;
//! bot.start().await; // Runs until stdin closes or Ctrl-C
//! # Ok(())
//! # }
//! ```

use std::{sync::Arc, time::Duration};

use log::{debug, error, info, warn};
use tokio::{
    io::{self, AsyncBufReadExt, BufReader},
    signal,
    task::{JoinError, JoinSet},
};

use crate::{
    commands::{CommandLoader, CommandRegistry, StaticResolver},
    config::{self, Config},
    console::ConsoleTransport,
    dispatcher::{Dispatch, Dispatcher},
    reporting::{
        ErrorLogSink, IdentityContext, LogSink, ReportOptions, Reporter, Scope, keys,
        panic_message,
    },
};

/// Console chat bot.
///
/// The `Bot` owns everything a session needs once startup is over:
///
/// - the [`Dispatcher`], shared with every session task, holding the complete
///   command registry
/// - the top-level [`Reporter`], used for failures that escape every command
///   guard
/// - the console settings used to open sessions
///
/// # Thread Safety
///
/// The dispatcher is wrapped in `Arc` and cloned into each session task.
/// Reporters are cheap to clone and share their sink and escalation chain.
///
/// # Examples
///
/// ```no_run
/// # use parley::bot::Bot;
/// # use parley::config::Config;
/// # async fn run(config: Config) {
/// let bot = Bot::new(config).await;
/// bot.start().await;
/// # }
/// ```
pub struct Bot {
    /// Routes each session to its command
    dispatcher: Arc<Dispatcher>,

    /// Reporter of the top-level scope
    reporter: Reporter,

    /// Console user and session time-to-live
    console: config::Console,
}

impl Bot {
    /// Creates the bot and loads every configured command.
    ///
    /// Error records are written to the `log` crate through [`ErrorLogSink`].
    /// Commands that fail to load are registered as unavailable, so creating
    /// the bot never fails.
    ///
    /// # Arguments
    ///
    /// * `config` - The bot configuration, including the command entries
    ///
    /// # Returns
    ///
    /// A bot ready to [`start`](Bot::start).
    pub async fn new(config: Config) -> Self {
        Bot::with_sink(config, Arc::new(ErrorLogSink)).await
    }

    /// Same as [`Bot::new`], writing error records into `sink`.
    async fn with_sink(config: Config, sink: Arc<dyn LogSink>) -> Self {
        let ids = IdentityContext::init();

        let escalation = Reporter::terminal(Scope::reporting(), sink, ids);
        let reporter = Reporter::new(Scope::top_level(), escalation);
        let loader = CommandLoader::new(Arc::new(StaticResolver::builtin()), &reporter);

        // The dispatcher only gets the registry once every command is loaded
        let registry = Arc::new(CommandRegistry::load(&loader, &config.commands).await);
        if registry.is_empty() {
            warn!("no command registered, every invocation will be unknown");
        } else {
            info!("commands ready: {}", registry.names().join(", "));
        }

        let dispatcher = Arc::new(Dispatcher::new(&config.bot, registry, reporter.clone()));

        Bot {
            dispatcher,
            reporter,
            console: config.console,
        }
    }

    /// Reads sessions from stdin until input ends or Ctrl-C.
    ///
    /// Every line becomes a session dispatched on its own task. On shutdown
    /// the bot stops reading and waits for the running sessions, so each of
    /// them still gets its reply.
    ///
    /// # Panics
    ///
    /// Never panics. A session task that panics is reported as
    /// `UNCAUGHT_PANIC` through the top-level reporter.
    pub async fn start(self) {
        let ttl = Duration::from_secs(self.console.session_ttl);
        let mut lines = BufReader::new(io::stdin()).lines();
        let mut sessions = JoinSet::new();

        let shutdown = signal::ctrl_c();
        tokio::pin!(shutdown);

        info!("listening on stdin");

        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        let inbound = ConsoleTransport::inbound(line, &self.console.user, ttl);
                        let dispatcher = Arc::clone(&self.dispatcher);
                        sessions.spawn(async move { dispatcher.dispatch(inbound).await });
                    }
                    Ok(None) => {
                        info!("input closed");
                        break;
                    }
                    Err(err) => {
                        error!("failed to read input: {}", err);
                        break;
                    }
                },
                Some(joined) = sessions.join_next() => self.on_session_end(joined).await,
                _ = &mut shutdown => {
                    info!("interrupted, stopping");
                    break;
                }
            }
        }

        // Let running sessions answer before exiting
        while let Some(joined) = sessions.join_next().await {
            self.on_session_end(joined).await;
        }

        info!("bye");
    }

    /// Logs how a session task ended and reports it if it panicked.
    async fn on_session_end(&self, joined: Result<Dispatch, JoinError>) {
        match joined {
            Ok(dispatch) => debug!("session ended: {:?}", dispatch),
            Err(err) if err.is_panic() => {
                let message = panic_message(err.into_panic().as_ref());
                self.reporter
                    .report(
                        keys::UNCAUGHT_PANIC,
                        Some(ReportOptions::new().arg(message)),
                    )
                    .await;
            }
            Err(err) => warn!("session task cancelled: {}", err),
        }
    }
}
