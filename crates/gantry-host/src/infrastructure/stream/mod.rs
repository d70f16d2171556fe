//! Output sink implementations.
//!
//! The [`gantry_core::OutputSink`] trait is the seam between the dispatch
//! pipeline and whatever is listening on the other end of the channel. The
//! host provides three implementations:
//!
//! - [`console::ConsoleSink`] – locked stdout, used by the interactive and
//!   serial-bridge deployments.
//! - [`file::FileSink`] – a file-backed sink; the settings-persistence path
//!   swaps a command's sink for one of these so that subscribed modules
//!   write their current values into the override artifact.
//! - [`mock::BufferSink`] – in-memory recording sink for unit and
//!   integration tests.

pub mod console;
pub mod file;
pub mod mock;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use mock::BufferSink;
