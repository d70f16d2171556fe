//! The file-upload state machine.
//!
//! `M28 <path>` switches a channel from dispatching commands to streaming
//! them into a file; `M29` switches it back. In between, every token is
//! appended to the destination with a trailing newline and acknowledged
//! like a normal command, so the sender needs no special flow control for
//! uploads.
//!
//! Failure handling follows the wire protocol rather than the file system:
//! once a write fails, the destination handle is dropped but the channel
//! *stays* in upload mode, silently discarding (and still acknowledging)
//! further tokens until `M29` arrives, since the sender has already queued
//! the rest of the file and cannot be stopped mid-stream.
//!
//! A live session exists only in the `Uploading` state; `Idle` is the
//! absence of a session on the owning dispatcher.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Acknowledgment for a completed upload.
pub const DONE_SAVING: &str = "Done saving file.\r\n";

/// Response for a failed mid-upload write.
pub const WRITE_ERROR: &str = "Error:error writing to file.\r\n";

/// Response for a successfully opened destination.
pub fn writing_to(path: &Path) -> String {
    format!("Writing to file: {}\r\n", path.display())
}

/// Response for a destination that could not be opened.
pub fn open_failed(path: &Path) -> String {
    format!("open failed, File: {}.\r\n", path.display())
}

/// Outcome of feeding one token to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Token written to the destination.
    Written,
    /// Session is degraded; token silently discarded.
    Discarded,
    /// The write failed just now; the session is degraded from here on.
    Failed,
}

/// An active upload: destination handle plus the refresh counter.
///
/// The counter lives on the session record, so concurrent channels each
/// refresh their own destination independently.
pub struct UploadSession {
    path: PathBuf,
    /// `None` once the session has degraded after a write failure.
    file: Option<File>,
    written_since_reopen: usize,
    reopen_threshold: usize,
}

impl UploadSession {
    /// Opens `path` for writing and starts a session.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the destination cannot be
    /// created; the caller reports it to the sender and stays idle.
    pub fn begin(path: PathBuf, reopen_threshold: usize) -> Result<Self, std::io::Error> {
        let file = File::create(&path)?;
        info!(path = %path.display(), "upload started");
        Ok(Self {
            path,
            file: Some(file),
            written_since_reopen: 0,
            reopen_threshold,
        })
    }

    /// The upload destination.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a write failure has already been reported for this session.
    pub fn is_degraded(&self) -> bool {
        self.file.is_none()
    }

    /// Appends `token` plus a newline to the destination.
    pub fn write_token(&mut self, token: &str) -> WriteOutcome {
        let Some(file) = self.file.as_mut() else {
            return WriteOutcome::Discarded;
        };

        let result = file
            .write_all(token.as_bytes())
            .and_then(|()| file.write_all(b"\n"));
        if let Err(e) = result {
            warn!(path = %self.path.display(), "upload write failed: {e}");
            self.file = None;
            return WriteOutcome::Failed;
        }

        self.written_since_reopen += token.len() + 1;
        if self.written_since_reopen > self.reopen_threshold {
            self.refresh_handle();
        }
        WriteOutcome::Written
    }

    /// Closes the destination and ends the session.
    ///
    /// Returns the destination path for the completion log line.
    pub fn finish(self) -> PathBuf {
        info!(path = %self.path.display(), "upload finished");
        self.path
    }

    /// Closes and reopens the destination in append mode.
    ///
    /// Works around buffered-write corruption observed on some embedded
    /// platforms once a threshold of payload has passed through one handle.
    /// The reopened handle continues at the end of the file, so the
    /// destination bytes are identical whether or not a refresh happened.
    fn refresh_handle(&mut self) {
        self.file = None;
        self.written_since_reopen = 0;
        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => self.file = Some(file),
            Err(e) => {
                // Degraded from here on, same as a failed write.
                warn!(path = %self.path.display(), "handle refresh failed: {e}");
            }
        }
    }
}
