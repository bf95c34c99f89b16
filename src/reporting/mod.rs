//! Error reporting.
//!
//! Every failure observed by the bot becomes an [`ErrorRecord`] with a
//! process-wide identifier, is written once to a [`LogSink`] and, when a
//! session is attached, answered with the reply of the reporter's [`Scope`].
//!
//! # Module Organization
//!
//! - [`identity`] - atomic identifier allocation
//! - [`catalog`] - error keys, message formatters and reply texts
//! - [`record`] - error records and report options
//! - [`sink`] - where formatted lines go
//! - [`reporter`] - the reporter and its bounded escalation chain

mod catalog;
mod identity;
mod record;
mod reporter;
mod sink;

pub use crate::reporting::{
    catalog::{Scope, first, keys},
    identity::IdentityContext,
    record::{ErrorRecord, ReportOptions},
    reporter::{Reporter, panic_message},
    sink::{ErrorLogSink, LogSink},
};
