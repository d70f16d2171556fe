//! The output seam between the dispatch pipeline and the sender.
//!
//! Every raw line arrives paired with a sink, and every response the
//! dispatcher produces for that line is written back through it. Control
//! modules may also write free-form report lines directly to the sink of
//! the command they are handling; the settings-persistence path exploits
//! this by temporarily swapping a command's sink for a file-backed one.
//!
//! Concrete implementations (console, file, in-memory recording) live in
//! `gantry-host::infrastructure::stream`.

use thiserror::Error;

/// Error type for sink writes.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The underlying writer failed.
    #[error("sink I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The sink is no longer usable (e.g. its lock was poisoned).
    #[error("sink is closed")]
    Closed,
}

/// A destination for response lines and free-form reports.
///
/// Text is written verbatim; callers supply their own line endings, since
/// the response protocol mixes `\r\n`-terminated acknowledgments with
/// `\n`-terminated status comments.
pub trait OutputSink: Send + Sync {
    /// Writes `text` to the sink.
    fn write(&self, text: &str) -> Result<(), SinkError>;
}

/// A sink that discards everything written to it.
///
/// Stands in for a real sink when output must be swallowed, such as when a
/// settings-capture file cannot be opened but the command still has to be
/// dispatched.
#[derive(Debug, Default)]
pub struct NullSink;

impl NullSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for NullSink {
    fn write(&self, _text: &str) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_accepts_writes() {
        let sink = NullSink::new();
        assert!(sink.write("ok\r\n").is_ok());
    }
}
