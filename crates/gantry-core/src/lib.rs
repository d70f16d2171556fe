//! # gantry-core
//!
//! Shared library for Gantry containing the line reliability protocol,
//! command tokenization, and the command model handed to control modules.
//!
//! This crate is consumed by the host application (`gantry-host`). It has
//! zero dependencies on OS APIs, file systems, or I/O channels: everything
//! here operates on text already framed into lines by the transport.
//!
//! # Protocol overview
//!
//! Gantry ingests the line-oriented command language spoken by CNC and
//! 3D-printer control software. One line of input looks like:
//!
//! ```text
//! N42 G1 X10 Y-2.5 M104 S200*93
//! ^^^                        ^^^
//! sequence number            XOR checksum
//! ```
//!
//! The `N<seq>…*<checksum>` framing (the *reliability envelope*) provides
//! in-order delivery detection and corruption detection over channels that
//! guarantee neither, such as raw serial links. A corrupted or out-of-order
//! line is discarded whole and the sender is asked to retransmit, starting
//! at the next expected sequence number.
//!
//! This crate defines:
//!
//! - **`protocol`** – envelope validation ([`protocol::validator`]), line
//!   tokenization ([`protocol::splitter`]), and the textual response frames
//!   written back to the sender ([`protocol::response`]).
//!
//! - **`command`** – the [`command::record::CommandRecord`]: the structured,
//!   mutable view of one command token that is published to subscribed
//!   control modules.
//!
//! - **`stream`** – the [`stream::OutputSink`] seam through which every
//!   response and free-form report reaches the sender. Real sinks (console,
//!   file) live in the host crate.

pub mod command;
pub mod protocol;
pub mod stream;

// Re-export the most-used types at the crate root so callers can write
// `gantry_core::CommandRecord` instead of the full module path.
pub use command::record::CommandRecord;
pub use protocol::splitter::{split_commands, strip_comment};
pub use protocol::validator::{LineValidator, LineVerdict, SEQUENCE_UNSET};
pub use stream::{NullSink, OutputSink, SinkError};
