//! Infrastructure layer: everything that touches an OS resource.
//!
//! - `channel` – where raw lines come from (stdin, test injection).
//! - `stream` – where response lines go ([`gantry_core::OutputSink`] impls).
//! - `storage` – TOML application config and the settings-override artifact.

pub mod channel;
pub mod storage;
pub mod stream;
