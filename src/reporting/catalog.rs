//! Message and reply catalogs.
//!
//! A [`Scope`] pairs a [`MessageCatalog`] (operator-facing text, formatted from
//! arguments) with a [`ReplyCatalog`] (user-facing reply text). The bot itself,
//! the command loader, the reporter and every command own their own scope.

use std::{collections::HashMap, fmt};

/// Formats an operator-facing message from positional arguments.
pub type Formatter = fn(&[String]) -> String;

/// Reply sent to the user when the scope has no reply for an error key.
pub const DEFAULT_REPLY: &str = "❌ An error occurred while executing this command";

/// Error keys known to the core.
///
/// Commands may define their own keys in their scope.
pub mod keys {
    /// `report` was called with nothing to report
    pub const EMPTY_ERROR: &str = "EMPTY_ERROR";
    /// A reply was required but no session was available
    pub const NO_INTERACTION: &str = "NO_INTERACTION";
    /// The session expired before the error reply could be sent
    pub const EXPIRED_INTERACTION: &str = "EXPIRED_INTERACTION";
    /// The error reply could not be delivered
    pub const FAILED_REPLY: &str = "FAILED_REPLY";
    /// A failure was reported together with report options
    pub const TOO_MANY_ARGUMENTS: &str = "TOO_MANY_ARGUMENTS";
    /// A command registration has no name
    pub const MISSING_NAME: &str = "MISSING_NAME";
    /// A command registration has no reference
    pub const MISSING_PATH: &str = "MISSING_PATH";
    /// The resolved command has no execution entry point
    pub const MISSING_EXECUTE: &str = "MISSING_EXECUTE";
    /// The command reference could not be resolved
    pub const LOAD_FAILED: &str = "LOAD_FAILED";
    /// The session named a command that is not registered
    pub const UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
    /// A session task panicked outside of any command guard
    pub const UNCAUGHT_PANIC: &str = "UNCAUGHT_PANIC";
}

/// Returns the first argument, or an empty string.
pub fn first(args: &[String]) -> &str {
    args.first().map(String::as_str).unwrap_or_default()
}

/// Maps error keys to message formatters.
#[derive(Clone, Default)]
pub struct MessageCatalog {
    formatters: HashMap<&'static str, Formatter>,
}

impl MessageCatalog {
    /// Formats the message for `key`.
    ///
    /// Keys without a formatter fall back to the arguments joined with `", "`.
    pub fn format(&self, key: &str, args: &[String]) -> String {
        match self.formatters.get(key) {
            Some(formatter) => formatter(args),
            None => args.join(", "),
        }
    }
}

/// Maps error keys to user-facing replies, with a default.
#[derive(Clone)]
pub struct ReplyCatalog {
    replies: HashMap<&'static str, String>,
    default: String,
}

impl Default for ReplyCatalog {
    fn default() -> Self {
        ReplyCatalog {
            replies: HashMap::new(),
            default: DEFAULT_REPLY.to_owned(),
        }
    }
}

impl ReplyCatalog {
    /// Returns the reply for `key`, or the default reply.
    pub fn reply_for(&self, key: Option<&str>) -> &str {
        key.and_then(|key| self.replies.get(key))
            .map(String::as_str)
            .unwrap_or(self.default.as_str())
    }
}

/// A named pair of message and reply catalogs.
///
/// # Examples
///
/// ```text
/// let scope = Scope::new("say")
///     .message("MISSING_TEXT", |_| "nothing to repeat".to_owned())
///     .reply("MISSING_TEXT", "❌ Nothing to say");
/// ```
#[derive(Clone)]
pub struct Scope {
    name: String,
    messages: MessageCatalog,
    replies: ReplyCatalog,
}

impl Scope {
    /// Creates an empty scope. Every lookup falls back to the defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Scope {
            name: name.into(),
            messages: MessageCatalog::default(),
            replies: ReplyCatalog::default(),
        }
    }

    /// Registers the message formatter for `key`.
    pub fn message(mut self, key: &'static str, formatter: Formatter) -> Self {
        self.messages.formatters.insert(key, formatter);
        self
    }

    /// Registers the user reply for `key`.
    pub fn reply(mut self, key: &'static str, reply: impl Into<String>) -> Self {
        self.replies.replies.insert(key, reply.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn messages(&self) -> &MessageCatalog {
        &self.messages
    }

    pub fn reply_for(&self, key: Option<&str>) -> &str {
        self.replies.reply_for(key)
    }

    /// Scope of the escalation reporter: failures about reporting itself.
    pub fn reporting() -> Self {
        Scope::new("reporter")
            .message(keys::NO_INTERACTION, |_| {
                "No interaction was passed when attempting to reply about an error.".to_owned()
            })
            .message(keys::EXPIRED_INTERACTION, |_| {
                "Interaction is expired. Attempt to reply user about error failed.".to_owned()
            })
            .message(keys::EMPTY_ERROR, |_| "Attempt to send empty error".to_owned())
            .message(keys::FAILED_REPLY, |_| {
                "Attempt to reply user about error failed.".to_owned()
            })
            .message(keys::TOO_MANY_ARGUMENTS, |_| {
                "Error and options cannot be specified at the same time.".to_owned()
            })
    }

    /// Scope of the command loader.
    pub fn loading() -> Self {
        Scope::new("loader")
            .message(keys::MISSING_NAME, |args| format!("Missing name. {}", first(args)))
            .message(keys::MISSING_PATH, |args| format!("Missing path. {}", first(args)))
            .message(keys::MISSING_EXECUTE, |args| {
                format!("Command {} is missing execute function", first(args))
            })
            .message(keys::LOAD_FAILED, |args| {
                format!("Failed to load command: {}", first(args))
            })
            .reply(
                keys::MISSING_NAME,
                "⚠️ This command is temporarily unavailable (missing name)",
            )
            .reply(
                keys::MISSING_PATH,
                "⚠️ This command is temporarily unavailable (missing path)",
            )
            .reply(
                keys::MISSING_EXECUTE,
                "⚠️ This command is temporarily unavailable (missing execute function)",
            )
            .reply(
                keys::LOAD_FAILED,
                "⚠️ This command is temporarily unavailable (load failed)",
            )
    }

    /// Scope of the bot itself.
    pub fn top_level() -> Self {
        Scope::new("bot")
            .message(keys::UNKNOWN_COMMAND, |args| {
                format!("Attempted to call unknown command: {}", first(args))
            })
            .message(keys::UNCAUGHT_PANIC, |args| {
                format!("Uncaught panic: {}", first(args))
            })
            .reply(
                keys::UNKNOWN_COMMAND,
                "⚠️ This command does not exist or not loaded yet.",
            )
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut messages: Vec<_> = self.messages.formatters.keys().collect();
        messages.sort();
        let mut replies: Vec<_> = self.replies.replies.keys().collect();
        replies.sort();
        f.debug_struct("Scope")
            .field("name", &self.name)
            .field("messages", &messages)
            .field("replies", &replies)
            .finish()
    }
}
