//! Console-backed output sink.

use std::io::Write;

use gantry_core::{OutputSink, SinkError};

/// Writes responses to stdout, flushing after every write.
///
/// The response protocol is request/reply over a line channel: the sender
/// will not transmit its next line until it has seen the acknowledgment, so
/// buffering a response would stall the whole stream.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl OutputSink for ConsoleSink {
    fn write(&self, text: &str) -> Result<(), SinkError> {
        let mut out = std::io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
