//! Mock line source for unit testing.
//!
//! Allows tests to inject synthetic [`ConsoleLine`]s without a terminal or
//! serial bridge attached.

use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};

use gantry_core::OutputSink;

use super::{ChannelError, ConsoleLine, LineSource};

/// A mock implementation of [`LineSource`] that allows tests to inject
/// lines.
pub struct MockLineSource {
    sink: Arc<dyn OutputSink>,
    sender: Mutex<Option<Sender<ConsoleLine>>>,
}

impl MockLineSource {
    /// Creates a mock source whose injected lines respond through `sink`.
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self {
            sink,
            sender: Mutex::new(None),
        }
    }

    /// Injects a raw line, as if received from the transport.
    ///
    /// Panics if `start()` has not been called or if `stop()` has been
    /// called.
    pub fn inject_line(&self, text: &str) {
        let guard = self.sender.lock().expect("lock poisoned");
        match guard.as_ref() {
            Some(sender) => sender
                .send(ConsoleLine {
                    text: text.to_string(),
                    sink: Arc::clone(&self.sink),
                })
                .expect("receiver has been dropped; call start() first"),
            None => panic!("MockLineSource::inject_line called before start()"),
        }
    }
}

impl LineSource for MockLineSource {
    fn start(&self) -> Result<mpsc::Receiver<ConsoleLine>, ChannelError> {
        let (tx, rx) = mpsc::channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Drop the sender to close the channel.
        *self.sender.lock().expect("lock poisoned") = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::stream::BufferSink;

    #[test]
    fn test_mock_source_delivers_injected_lines_in_order() {
        // Arrange
        let sink = Arc::new(BufferSink::new());
        let source = MockLineSource::new(sink);
        let rx = source.start().expect("start should succeed");

        // Act
        source.inject_line("G28");
        source.inject_line("G1 X10");

        // Assert
        assert_eq!(rx.recv().expect("line").text, "G28");
        assert_eq!(rx.recv().expect("line").text, "G1 X10");
    }

    #[test]
    fn test_mock_source_stop_closes_channel() {
        // Arrange
        let sink = Arc::new(BufferSink::new());
        let source = MockLineSource::new(sink);
        let rx = source.start().expect("start should succeed");

        // Act
        source.stop();

        // Assert – channel should be disconnected
        assert!(rx.recv().is_err(), "channel should be closed after stop()");
    }

    #[test]
    fn test_injected_lines_share_the_source_sink() {
        // Arrange
        let sink = Arc::new(BufferSink::new());
        let source = MockLineSource::new(Arc::clone(&sink) as Arc<dyn OutputSink>);
        let rx = source.start().expect("start should succeed");

        // Act
        source.inject_line("M105");
        let line = rx.recv().expect("line");
        line.sink.write("ok\r\n").expect("write");

        // Assert
        assert_eq!(sink.contents(), "ok\r\n");
    }
}
