//! Lifecycle of the persisted settings-override artifact.
//!
//! The override artifact holds settings that supersede compiled-in
//! defaults. This store only creates, removes, probes, and hands out a
//! write sink for it; the contents are produced by subscribed control
//! modules during an M500 dispatch and consumed elsewhere at boot. Nothing
//! here parses them.

use std::path::{Path, PathBuf};

use gantry_core::SinkError;
use tracing::{debug, warn};

use crate::infrastructure::stream::FileSink;

/// Owns the path of the settings-override artifact.
#[derive(Debug, Clone)]
pub struct OverrideStore {
    path: PathBuf,
}

impl OverrideStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Location of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the artifact currently exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Removes the artifact if present.
    ///
    /// A missing artifact is not an error; any other failure is logged and
    /// swallowed, since the caller always continues with its response line.
    pub fn remove(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "override artifact removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), "failed to remove override artifact: {e}"),
        }
    }

    /// Creates a fresh artifact and returns a sink writing into it.
    pub fn create_sink(&self) -> Result<FileSink, SinkError> {
        FileSink::create(&self.path)
    }
}
