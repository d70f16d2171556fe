//! Stdin-backed line source.
//!
//! Reads lines from standard input on a dedicated reader thread and
//! forwards them as [`ConsoleLine`]s. This is the channel used when the
//! host sits behind a serial-to-stdio bridge or is driven interactively.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

use gantry_core::OutputSink;
use tracing::{debug, warn};

use super::{ChannelError, ConsoleLine, LineSource};

/// A [`LineSource`] reading from the process's standard input.
pub struct StdinLineSource {
    sink: Arc<dyn OutputSink>,
    running: Arc<AtomicBool>,
}

impl StdinLineSource {
    /// Creates a source whose lines respond through `sink`.
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self {
            sink,
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl LineSource for StdinLineSource {
    fn start(&self) -> Result<mpsc::Receiver<ConsoleLine>, ChannelError> {
        let (tx, rx) = mpsc::channel();
        let sink = Arc::clone(&self.sink);
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::Relaxed);

        std::thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    if !running.load(Ordering::Relaxed) {
                        break;
                    }
                    match line {
                        Ok(text) => {
                            let unit = ConsoleLine {
                                text,
                                sink: Arc::clone(&sink),
                            };
                            if tx.send(unit).is_err() {
                                // Receiver dropped; the host is shutting down.
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("stdin read failed: {e}");
                            break;
                        }
                    }
                }
                debug!("stdin reader finished");
            })
            .map_err(|e| ChannelError::StartFailed(e.to_string()))?;

        Ok(rx)
    }

    fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}
