//! Configuration file structures for the Parley bot.
//!
//! The configuration is read from a YAML file, then overridden by environment
//! variables prefixed with `PARLEY_`. Nested keys are separated by `__`, so
//! `PARLEY_BOT__NAME=herald` overrides `bot.name`.
//!
//! # Configuration File Format
//!
//! ```yaml
//! bot:
//!   # Word following the prefix that addresses the bot
//!   name: "parley"
//!   # Command prefix character
//!   prefix: "!"
//!
//! console:
//!   # Name of the user typing on the console
//!   user: "operator"
//!   # Seconds a console session can still be answered
//!   session_ttl: 900
//!
//! commands:
//!   - name: "ping"
//!     reference: "builtin:ping"
//!   - name: "say"
//!     reference: "builtin:say"
//! ```
//!
//! Every section is optional. A command entry may miss its name or its
//! reference; it is then registered as an unavailable command.

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

/// Root configuration structure for the Parley bot.
///
/// # Structure
///
/// The configuration is divided into three sections:
/// - [`Bot`] - How the bot is addressed in messages
/// - [`Console`] - Who types on the console and how long sessions last
/// - `commands` - The [`CommandEntry`] list loaded at startup
///
/// A missing section takes its default value, so an empty file is a valid
/// configuration running the built-in commands.
///
/// # Examples
///
/// ```no_run
/// # use parley::config::Config;
/// # fn main() -> Result<(), figment::Error> {
/// let config = Config::load("parley.yaml")?;
///
/// println!("Bot name: {}", config.bot.name);
/// println!("Commands: {}", config.commands.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    /// How the bot is addressed
    #[serde(default)]
    pub bot: Bot,

    /// Console session settings
    #[serde(default)]
    pub console: Console,

    /// Command registrations, in priority order
    #[serde(default = "default_commands")]
    pub commands: Vec<CommandEntry>,
}

impl Config {
    /// Loads the configuration from `path` and the environment.
    ///
    /// Values from `PARLEY_*` environment variables take precedence over the
    /// file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    ///
    /// # Returns
    ///
    /// The configuration, or the figment error naming the invalid or
    /// unreadable value.
    pub fn load(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("PARLEY_").split("__"))
            .extract()
    }
}

/// How users address the bot.
///
/// # YAML Section
///
/// ```yaml
/// bot:
///   name: "parley"
///   prefix: "!"
/// ```
#[derive(Debug, Deserialize)]
pub struct Bot {
    /// Word following the prefix, e.g. `parley` in `!parley ping`
    #[serde(default = "default_name")]
    pub name: String,

    /// Character starting every invocation
    #[serde(default = "default_prefix")]
    pub prefix: char,
}

impl Default for Bot {
    fn default() -> Self {
        Bot {
            name: default_name(),
            prefix: default_prefix(),
        }
    }
}

/// Console session settings.
///
/// # YAML Section
///
/// ```yaml
/// console:
///   user: "operator"
///   session_ttl: 900
/// ```
#[derive(Debug, Deserialize)]
pub struct Console {
    /// Name of the user typing on the console, used in error contexts
    #[serde(default = "default_user")]
    pub user: String,

    /// Seconds after which a console session expires
    #[serde(default = "default_session_ttl")]
    pub session_ttl: u64,
}

impl Default for Console {
    fn default() -> Self {
        Console {
            user: default_user(),
            session_ttl: default_session_ttl(),
        }
    }
}

/// One command registration.
///
/// Both fields are optional so that a broken entry still deserializes; the
/// loader registers it as an unavailable command and logs why.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandEntry {
    /// Name the command is invoked with
    pub name: Option<String>,

    /// Reference resolved by the command resolver, e.g. `builtin:ping`
    pub reference: Option<String>,
}

impl CommandEntry {
    pub fn new(name: &str, reference: &str) -> Self {
        CommandEntry {
            name: Some(name.to_owned()),
            reference: Some(reference.to_owned()),
        }
    }
}

fn default_name() -> String {
    "parley".to_owned()
}

fn default_prefix() -> char {
    '!'
}

fn default_user() -> String {
    "operator".to_owned()
}

fn default_session_ttl() -> u64 {
    900
}

fn default_commands() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("ping", "builtin:ping"),
        CommandEntry::new("say", "builtin:say"),
    ]
}
