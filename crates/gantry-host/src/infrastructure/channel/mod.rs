//! Line-channel infrastructure: where raw command lines come from.
//!
//! A channel delivers one [`ConsoleLine`] per received line: the raw text
//! (terminator already stripped by the transport framing) paired with the
//! sink its responses must be written to. Lines are handed over an `mpsc`
//! channel and consumed by the host's pump loop, one at a time: the
//! dispatch pipeline finishes a line completely before the next is taken.
//!
//! Multiple channels (e.g. several serial ports) may run concurrently, each
//! with its own dispatcher and therefore its own sequence and upload state.
//!
//! # Testability
//!
//! The [`LineSource`] trait lets tests inject synthetic lines without a
//! terminal attached; see [`mock::MockLineSource`].

use std::sync::mpsc;
use std::sync::Arc;

use gantry_core::OutputSink;

pub mod mock;
pub mod stdin;

/// One raw line plus the sink for its responses, delivered as a unit.
#[derive(Clone)]
pub struct ConsoleLine {
    /// The raw line text, without its terminator.
    pub text: String,
    /// Where every response for this line is written.
    pub sink: Arc<dyn OutputSink>,
}

/// A source of raw command lines.
pub trait LineSource {
    /// Starts the source and returns the receiving end of its line channel.
    fn start(&self) -> Result<mpsc::Receiver<ConsoleLine>, ChannelError>;

    /// Stops the source; the receiver disconnects once in-flight lines
    /// drain.
    fn stop(&self);
}

/// Error type for channel operations.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("failed to start line source: {0}")]
    StartFailed(String),
}
