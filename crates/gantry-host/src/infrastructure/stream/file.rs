//! File-backed output sink.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gantry_core::{OutputSink, SinkError};

/// A sink that appends everything written to it to a file.
///
/// Used by the settings-persistence path: the dispatcher swaps a command's
/// sink for a `FileSink` pointed at a fresh override artifact, dispatches,
/// and drops the sink again, capturing whatever the subscribed modules
/// reported.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    /// Creates (truncating) `path` and returns a sink writing to it.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileSink {
    fn write(&self, text: &str) -> Result<(), SinkError> {
        let mut file = self.file.lock().map_err(|_| SinkError::Closed)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }
}
