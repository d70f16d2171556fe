//! Command model: the structured view of one command token.

pub mod record;

pub use record::{scan_letter_value, CommandRecord};
