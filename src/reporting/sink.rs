//! Destination of formatted error lines.

use log::error;

/// Accepts one formatted error line at a time.
///
/// Implementations are best effort and must not panic.
pub trait LogSink: Send + Sync {
    fn write(&self, line: &str);
}

/// Sink writing error lines through the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorLogSink;

impl LogSink for ErrorLogSink {
    fn write(&self, line: &str) {
        error!(target: "parley::report", "{}", line);
    }
}
