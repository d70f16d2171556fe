//! In-memory recording sink for tests.
//!
//! Lets tests assert on the exact byte sequence the dispatcher wrote,
//! including line endings and response ordering, without touching stdout.

use std::sync::Mutex;

use gantry_core::{OutputSink, SinkError};

/// An [`OutputSink`] that accumulates everything written to it.
#[derive(Debug, Default)]
pub struct BufferSink {
    buffer: Mutex<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything written so far.
    pub fn contents(&self) -> String {
        self.buffer.lock().expect("lock poisoned").clone()
    }

    /// Returns the accumulated output split into newline-terminated
    /// fragments, terminators included.
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .split_inclusive('\n')
            .map(|l| l.to_string())
            .collect()
    }

    /// Clears the buffer and returns what it held.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.buffer.lock().expect("lock poisoned"))
    }
}

impl OutputSink for BufferSink {
    fn write(&self, text: &str) -> Result<(), SinkError> {
        self.buffer.lock().map_err(|_| SinkError::Closed)?.push_str(text);
        Ok(())
    }
}
