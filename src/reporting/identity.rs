//! Process-wide identity allocation for error records.
//!
//! Every [`ErrorRecord`](crate::reporting::ErrorRecord) receives an identifier
//! from the [`IdentityContext`] its reporter was built with. The bot initializes
//! the context once and hands it to the escalation chain, so causes and primary
//! errors logged by different reporters can be cross-referenced by id.

use std::sync::{
    OnceLock,
    atomic::{AtomicU64, Ordering},
};

static CONTEXT: OnceLock<IdentityContext> = OnceLock::new();

/// Allocator for error record identifiers.
///
/// Identifiers start at 1 and are unique for the lifetime of the process.
#[derive(Debug)]
pub struct IdentityContext {
    /// Last identifier handed out
    last: AtomicU64,
}

impl IdentityContext {
    pub(crate) fn new() -> Self {
        IdentityContext {
            last: AtomicU64::new(0),
        }
    }

    /// Initializes the process-wide context and returns it.
    ///
    /// Called by the bot at startup before any reporter exists. Records never
    /// reach the context on their own: reporters receive it at construction.
    /// Later calls return the same context.
    pub fn init() -> &'static IdentityContext {
        CONTEXT.get_or_init(IdentityContext::new)
    }

    /// Allocates the next identifier.
    pub fn allocate(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }
}
