//! Built-in commands.
//!
//! Each command is exposed as a factory building its [`CommandModule`]: the
//! handler together with the scope its failures are reported through.
//!
//! # Available Commands
//!
//! - [`ping`] - Acknowledge, then answer with the round trip time
//! - [`say`] - Repeat the given text

mod ping;
mod say;

pub use crate::commands::actions::{ping::ping, say::say};
