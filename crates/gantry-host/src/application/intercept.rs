//! Commands the dispatcher executes locally before generic dispatch.
//!
//! A handful of `M` codes change the dispatcher's own behaviour and must be
//! caught before any module sees them:
//!
//! | Code | Action                                            | Falls through? |
//! |------|---------------------------------------------------|----------------|
//! | M28  | start a file upload                               | no             |
//! | M500 | capture live settings into the override artifact  | no             |
//! | M501 | delete the override artifact                      | no             |
//! | M503 | report whether an override artifact exists        | yes            |
//!
//! M503 deliberately continues into generic dispatch so subscribed modules
//! can report their live settings after the status comment.

use std::path::PathBuf;
use std::sync::Arc;

use gantry_core::{CommandRecord, NullSink};
use tracing::{info, warn};

use crate::application::bus::HandlerRegistry;
use crate::application::dispatch::write_response;
use crate::application::upload::{self, UploadSession};
use crate::infrastructure::storage::OverrideStore;

/// What the dispatcher should do with the token after interception.
pub enum InterceptOutcome {
    /// Not an intercepted command; continue with generic dispatch.
    PassThrough,
    /// Fully handled here; the response has been written.
    Consumed,
    /// `M28` opened a destination; the dispatcher enters upload mode.
    StartUpload(UploadSession),
}

/// Recognizes and executes the reserved command codes.
pub struct CommandInterceptor {
    override_store: OverrideStore,
    upload_root: PathBuf,
    reopen_threshold: usize,
}

impl CommandInterceptor {
    pub fn new(override_store: OverrideStore, upload_root: PathBuf, reopen_threshold: usize) -> Self {
        Self {
            override_store,
            upload_root,
            reopen_threshold,
        }
    }

    /// Gives the reserved codes first refusal on `record`.
    ///
    /// Only runs while the channel is not uploading; `M28`/`M500`/`M501`
    /// consume the token, `M503` and everything else fall through.
    pub fn intercept(
        &self,
        record: &mut CommandRecord,
        registry: &HandlerRegistry,
    ) -> InterceptOutcome {
        if !record.has_m {
            return InterceptOutcome::PassThrough;
        }
        match record.m {
            28 => self.start_upload(record),
            500 => self.persist_settings(record, registry),
            501 => self.delete_override(record),
            503 => {
                self.report_override(record);
                InterceptOutcome::PassThrough
            }
            _ => InterceptOutcome::PassThrough,
        }
    }

    /// `M28 <path>`: open the upload destination.
    fn start_upload(&self, record: &CommandRecord) -> InterceptOutcome {
        let destination = self.upload_root.join(destination_argument(record.text()));
        match UploadSession::begin(destination.clone(), self.reopen_threshold) {
            Ok(session) => {
                write_response(&record.sink, &upload::writing_to(session.path()));
                InterceptOutcome::StartUpload(session)
            }
            Err(e) => {
                warn!(path = %destination.display(), "upload destination rejected: {e}");
                write_response(&record.sink, &upload::open_failed(&destination));
                InterceptOutcome::Consumed
            }
        }
    }

    /// `M500`: re-dispatch the command with its sink pointed at a fresh
    /// override artifact, so every module writes its current values there.
    fn persist_settings(
        &self,
        record: &mut CommandRecord,
        registry: &HandlerRegistry,
    ) -> InterceptOutcome {
        self.override_store.remove();

        let reply_sink = Arc::clone(&record.sink);
        record.sink = match self.override_store.create_sink() {
            Ok(capture) => Arc::new(capture),
            Err(e) => {
                // Capture is lost but the dispatch still has to happen; give
                // the modules somewhere harmless to write.
                warn!(
                    path = %self.override_store.path().display(),
                    "could not open override artifact for capture: {e}"
                );
                Arc::new(NullSink::new())
            }
        };
        registry.publish(record);
        // Dropping the record discards the capture sink; nothing to restore.

        info!(path = %self.override_store.path().display(), "settings captured");
        write_response(
            &reply_sink,
            &format!(
                "Settings Stored to {}\r\nok\r\n",
                self.override_store.path().display()
            ),
        );
        InterceptOutcome::Consumed
    }

    /// `M501`: drop back to compiled-in defaults at next boot.
    fn delete_override(&self, record: &CommandRecord) -> InterceptOutcome {
        self.override_store.remove();
        write_response(
            &record.sink,
            &format!(
                "config override file deleted {}, reboot needed\r\nok\r\n",
                self.override_store.path().display()
            ),
        );
        InterceptOutcome::Consumed
    }

    /// `M503`: status comment, then let the modules report live settings.
    fn report_override(&self, record: &CommandRecord) {
        let status = if self.override_store.exists() {
            format!(
                "; config override present: {}\n",
                self.override_store.path().display()
            )
        } else {
            "; No config override\n".to_string()
        };
        write_response(&record.sink, &status);
    }
}

/// Extracts the destination path from an `M28` token: everything after the
/// command code, trimmed.
fn destination_argument(token: &str) -> &str {
    let after_m = match token.find('M') {
        Some(i) => &token[i + 1..],
        None => token,
    };
    let code_end = after_m
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after_m.len());
    after_m[code_end..].trim()
}
