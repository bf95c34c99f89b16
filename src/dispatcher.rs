//! Routing inbound messages to registered commands.
//!
//! The dispatcher is the only place where an inbound message becomes a
//! [`Session`]. Handlers are already guarded by the loader, so their failures
//! are reported once, by the guard, and never caught again here.

use std::sync::Arc;

use command_parser::Parser;
use log::{debug, info};

use crate::{
    commands::{CommandRegistry, Invocation},
    config,
    reporting::{ReportOptions, Reporter, keys},
    session::{Inbound, Session},
};

/// What happened to an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a command invocation for this bot
    Ignored,
    /// No command registered under this name, `UNKNOWN_COMMAND` was reported
    Unknown(String),
    /// The command ran, successfully or not
    Executed(String),
}

/// Routes inbound messages to the commands of a complete registry.
///
/// The dispatcher is shared by every session task; it holds no mutable
/// state, so dispatching needs no lock.
///
/// # Examples
///
/// ```text
/// let dispatcher = Dispatcher::new(&config.bot, Arc::new(registry), reporter);
///
/// match dispatcher.dispatch(inbound).await {
///     Dispatch::Ignored => {}
///     Dispatch::Unknown(name) => debug!("{} is not a command", name),
///     Dispatch::Executed(name) => debug!("{} ran", name),
/// }
/// ```
pub struct Dispatcher {
    /// Parser for the configured prefix
    parser: Parser,
    /// Word addressing the bot after the prefix
    bot_name: String,
    registry: Arc<CommandRegistry>,
    /// Reporter of the top-level scope
    reporter: Reporter,
}

impl Dispatcher {
    /// Creates a dispatcher for the bot described by `bot`.
    ///
    /// # Arguments
    ///
    /// * `bot` - The bot section of the configuration, giving the prefix and name
    /// * `registry` - Every loaded command, fully populated
    /// * `reporter` - The top-level reporter, used for unknown commands
    pub fn new(bot: &config::Bot, registry: Arc<CommandRegistry>, reporter: Reporter) -> Self {
        Dispatcher {
            parser: Parser::new(bot.prefix, '-'),
            bot_name: bot.name.clone(),
            registry,
            reporter,
        }
    }

    /// Handles one inbound message.
    ///
    /// Messages that are not an invocation of this bot are ignored without
    /// any reply. An unknown command is reported as `UNKNOWN_COMMAND` on the
    /// new session, and no handler runs.
    ///
    /// # Arguments
    ///
    /// * `inbound` - The message, with its actor, group and transport
    ///
    /// # Returns
    ///
    /// What happened to the message. Failures of the command itself were
    /// already reported by its guard and only show as [`Dispatch::Executed`].
    pub async fn dispatch(&self, inbound: Inbound) -> Dispatch {
        let Some(invocation) = Invocation::parse(&self.parser, &self.bot_name, &inbound.body) else {
            return Dispatch::Ignored;
        };

        let name = invocation.name.clone();
        let session = Arc::new(Session::new(inbound, invocation));

        let Some(command) = self.registry.get(&name) else {
            debug!("unknown command {}", name);
            self.reporter
                .bind(session)
                .report(keys::UNKNOWN_COMMAND, Some(ReportOptions::new().arg(&name)))
                .await;
            return Dispatch::Unknown(name);
        };

        info!("{} runs {}", session.actor().name, name);

        // Guarded commands report their own failures
        if let Err(error) = command.execute(session).await {
            debug!("command {} returned an error after reporting: {}", name, error);
        }

        Dispatch::Executed(name)
    }
}
