//! Parley - command dispatch and error reporting for an interactive chat bot.
//!
//! Parley reads command invocations such as `!parley say hello`, routes them to
//! registered commands and answers on the same session. Every failure is
//! turned into an identified error record, logged once and answered with the
//! reply that fits the session's state.
//!
//! # Features
//!
//! - **Command Registry**: Commands are loaded in parallel at startup; a command
//!   that cannot be loaded stays registered and explains why it is unavailable
//! - **Scoped Error Replies**: Each command carries its own error messages and replies
//! - **Three-State Replies**: Sessions are answered with a reply, an edit of a
//!   deferred reply or a follow-up, depending on what was already sent
//! - **Bounded Escalation**: Failures while reporting are escalated through a
//!   fixed chain that always terminates
//! - **YAML Configuration**: Simple configuration file format with environment variable support
//!
//! # Configuration
//!
//! ```yaml
//! bot:
//!   name: "parley"
//!   prefix: "!"
//!
//! console:
//!   user: "operator"
//!   session_ttl: 900
//!
//! commands:
//!   - name: "ping"
//!     reference: "builtin:ping"
//!   - name: "say"
//!     reference: "builtin:say"
//! ```
//!
//! # Environment Variable Overrides
//!
//! ```bash
//! export PARLEY_BOT__NAME="herald"
//! export PARLEY_CONSOLE__SESSION_TTL="60"
//! ```
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug parley --config config.yaml
//! ```

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{bot::Bot, config::Config};

mod bot;
mod commands;
mod config;
mod console;
mod dispatcher;
mod reporting;
mod session;
#[cfg(test)]
mod testing;

/// Command-line arguments for the Parley bot.
///
/// # Examples
///
/// ```bash
/// parley --config config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// Every value can be overridden with a `PARLEY_` environment variable,
    /// nested keys separated by `__`.
    #[arg(short, long)]
    config: String,
}

/// Main entry point for the Parley bot.
///
/// Logging defaults to the `info` level and can be changed with `RUST_LOG`.
/// A configuration that cannot be read or parsed is logged and the bot exits
/// without starting.
#[tokio::main]
async fn main() {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting parley {}...", env!("CARGO_PKG_VERSION"));

    // Parse command line arguments
    let args = Args::parse();

    // Load configuration from YAML file and environment
    let config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return;
        }
    };

    let bot = Bot::new(config).await;
    bot.start().await;
}
