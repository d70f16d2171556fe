//! Response-protocol framing.
//!
//! One response line per token, written to the sink of the originating
//! line:
//!
//! - `ok\r\n` – accepted, nothing further to report.
//! - `ok <text>\r\n` – accepted, a module attached human-readable text.
//! - `ok (command unclaimed)\r\n` – no module claimed the command and the
//!   unclaimed diagnostic is enabled.
//! - `rs N<seq>\r\n` – checksum or sequence mismatch; `<seq>` is the next
//!   expected sequence number.

/// Bare positive acknowledgment.
pub const OK: &str = "ok\r\n";

/// Diagnostic acknowledgment for commands no module claimed.
pub const UNCLAIMED: &str = "ok (command unclaimed)\r\n";

/// Positive acknowledgment with attached module text.
pub fn ok_with(text: &str) -> String {
    format!("ok {text}\r\n")
}

/// Resend request naming the next expected sequence number.
///
/// # Examples
///
/// ```rust
/// use gantry_core::protocol::response;
///
/// assert_eq!(response::resend(7), "rs N7\r\n");
/// ```
pub fn resend(sequence: i64) -> String {
    format!("rs N{sequence}\r\n")
}
