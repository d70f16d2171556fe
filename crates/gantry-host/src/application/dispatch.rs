//! The per-channel dispatcher: one raw line in, one response per token out.
//!
//! Pipeline for every received line:
//!
//! ```text
//! raw line ──► LineValidator ──► split_commands ──► per token:
//!                │                                   ├─ uploading?  append to file
//!                │                                   ├─ intercepted? execute locally
//!                └─ reject ► "rs N<seq>"             └─ publish on the bus, respond
//! ```
//!
//! The pipeline is single-threaded and run-to-completion: a line is fully
//! processed, responses and all, before the next line is taken off the
//! channel. Tokens never reorder and every token produces exactly one
//! response line on the sink of its originating line.

use std::path::PathBuf;
use std::sync::Arc;

use gantry_core::protocol::response;
use gantry_core::{split_commands, CommandRecord, LineValidator, LineVerdict, OutputSink};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::bus::{ChannelId, HandlerRegistry};
use crate::application::intercept::{CommandInterceptor, InterceptOutcome};
use crate::application::upload::{self, UploadSession, WriteOutcome};
use crate::infrastructure::storage::{AppConfig, OverrideStore};

/// Writes `text` to `sink`, logging instead of propagating on failure.
///
/// A sink that cannot be written to leaves no way to report the problem to
/// the sender, so the dispatch path carries on regardless.
pub(crate) fn write_response(sink: &Arc<dyn OutputSink>, text: &str) {
    if let Err(e) = sink.write(text) {
        warn!("failed to write response: {e}");
    }
}

/// Session state and orchestration for one input channel.
///
/// Channels are fully independent: each has its own sequence counter and
/// upload state, and dispatchers never share anything but the (read-only)
/// handler registry.
pub struct Dispatcher {
    channel_id: ChannelId,
    validator: LineValidator,
    registry: Arc<HandlerRegistry>,
    interceptor: CommandInterceptor,
    upload: Option<UploadSession>,
    flag_unclaimed: bool,
}

impl Dispatcher {
    /// Creates a dispatcher for one channel.
    ///
    /// The unclaimed-diagnostic switch is read from `config` once, here;
    /// changing the configuration later does not affect a live channel.
    pub fn new(
        registry: Arc<HandlerRegistry>,
        config: &AppConfig,
        override_path: PathBuf,
    ) -> Self {
        Self {
            channel_id: Uuid::new_v4(),
            validator: LineValidator::new(),
            interceptor: CommandInterceptor::new(
                OverrideStore::new(override_path),
                config.upload.root_dir.clone(),
                config.upload.reopen_threshold_bytes,
            ),
            upload: None,
            flag_unclaimed: config.dispatch.flag_unclaimed_commands,
            registry,
        }
    }

    /// This channel's identifier in log output.
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Whether the channel is currently in upload mode.
    pub fn is_uploading(&self) -> bool {
        self.upload.is_some()
    }

    /// Runs one raw line through the pipeline.
    pub fn handle_line(&mut self, text: &str, sink: &Arc<dyn OutputSink>) {
        match self.validator.validate(text) {
            LineVerdict::Accepted { body } => self.dispatch_body(&body, sink),
            LineVerdict::SequenceReset { sequence } => {
                debug!(channel = %self.channel_id, sequence, "sequence reset acknowledged");
                write_response(sink, response::OK);
            }
            LineVerdict::Rejected { resend } => {
                write_response(sink, &response::resend(resend));
            }
            LineVerdict::Comment => write_response(sink, response::OK),
            LineVerdict::Ignored => {}
        }
    }

    /// Tokenizes an accepted body and processes each token in order.
    fn dispatch_body(&mut self, body: &str, sink: &Arc<dyn OutputSink>) {
        for token in split_commands(body) {
            // Upload mode captures the token before it can become a command;
            // entering the mode mid-line redirects the rest of that line too.
            if self.is_uploading() {
                self.consume_upload_token(token, sink);
                continue;
            }

            let mut record = CommandRecord::new(token, Arc::clone(sink));
            match self.interceptor.intercept(&mut record, &self.registry) {
                InterceptOutcome::Consumed => continue,
                InterceptOutcome::StartUpload(session) => {
                    self.upload = Some(session);
                    continue;
                }
                InterceptOutcome::PassThrough => {}
            }

            debug!(channel = %self.channel_id, token, "dispatching");
            self.registry.publish(&mut record);
            self.respond(&mut record, sink);
        }
    }

    /// Writes the single response line for a dispatched token.
    fn respond(&self, record: &mut CommandRecord, sink: &Arc<dyn OutputSink>) {
        if record.wants_blank_line {
            write_response(sink, "\r\n");
        }
        if self.flag_unclaimed && !record.accepted {
            write_response(sink, response::UNCLAIMED);
        } else if !record.txt_after_ok.is_empty() {
            write_response(sink, &response::ok_with(&record.txt_after_ok));
            record.txt_after_ok.clear();
        } else {
            write_response(sink, response::OK);
        }
    }

    /// Feeds one token to the active upload session.
    fn consume_upload_token(&mut self, token: &str, sink: &Arc<dyn OutputSink>) {
        if token.starts_with("M29") {
            if let Some(session) = self.upload.take() {
                session.finish();
            }
            write_response(sink, upload::DONE_SAVING);
            return;
        }

        let Some(session) = self.upload.as_mut() else {
            return;
        };
        match session.write_token(token) {
            WriteOutcome::Written | WriteOutcome::Discarded => {
                write_response(sink, response::OK);
            }
            WriteOutcome::Failed => write_response(sink, upload::WRITE_ERROR),
        }
    }
}
