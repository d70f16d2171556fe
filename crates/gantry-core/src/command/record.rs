//! The [`CommandRecord`]: one command token parsed into structured fields.
//!
//! A token such as `"G1 X10 Y-2.5"` is parsed exactly once, up front, into a
//! letter→value map plus cached family flags (`has_g`/`has_m`/`has_t` and
//! their integer codes). Control modules receiving the record read parameters
//! through [`CommandRecord::value`] and mark the outcome of handling through
//! the mutable result fields.
//!
//! Lifetime: exactly one record exists per token, created when the token is
//! about to be dispatched and dropped once its response line has been
//! written. Records are never shared across tokens.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::stream::OutputSink;

/// Reads a decimal number from the start of `s`.
///
/// Accepts an optional sign, digits, and an optional fractional part
/// (`10`, `-2.5`, `1.`, `.5`). Returns `None` when `s` does not start with
/// a number.
fn read_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(|b| b.is_ascii_digit()) {
        end += 1;
    }
    let int_len = end - int_start;
    let mut frac_len = 0;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut p = frac_start;
        while bytes.get(p).is_some_and(|b| b.is_ascii_digit()) {
            p += 1;
        }
        frac_len = p - frac_start;
        if int_len > 0 || frac_len > 0 {
            end = p;
        }
    }
    if int_len == 0 && frac_len == 0 {
        return None;
    }
    s[..end].parse().ok()
}

/// Scans `text` for the first occurrence of `letter` and reads the number
/// following it.
///
/// Returns `None` when the letter is absent and `Some(0.0)` when the letter
/// is present but not followed by a parseable number, the same sentinel the
/// full parse uses, so a missing numeric field is never a fault.
///
/// This is the lightweight probe used by the envelope validator, which needs
/// `N`, `*`, and `M` from a raw line without building a full record.
///
/// # Examples
///
/// ```rust
/// use gantry_core::command::scan_letter_value;
///
/// assert_eq!(scan_letter_value("N42 G1 X10*93", 'N'), Some(42.0));
/// assert_eq!(scan_letter_value("N42 G1 X10*93", '*'), Some(93.0));
/// assert_eq!(scan_letter_value("G1 X10", 'Z'), None);
/// ```
pub fn scan_letter_value(text: &str, letter: char) -> Option<f64> {
    let pos = text.find(letter)?;
    Some(read_number(&text[pos + letter.len_utf8()..]).unwrap_or(0.0))
}

/// Parses every parameter in `text` in a single pass.
///
/// Every ASCII uppercase letter and `*` introduces a parameter; the first
/// occurrence of a letter wins. A letter without a parseable number maps to
/// the `0.0` sentinel.
fn parse_params(text: &str) -> HashMap<char, f64> {
    let mut params = HashMap::new();
    for (i, b) in text.bytes().enumerate() {
        if b.is_ascii_uppercase() || b == b'*' {
            let value = read_number(&text[i + 1..]).unwrap_or(0.0);
            params.entry(b as char).or_insert(value);
        }
    }
    params
}

/// Structured, mutable view of one command token.
///
/// Constructed per token by the dispatcher; handed by mutable reference to
/// each subscribed control module in turn. Modules claim the command by
/// setting [`accepted`](Self::accepted), attach human-readable text to the
/// acknowledgment via [`txt_after_ok`](Self::txt_after_ok), or request a
/// blank separator line via [`wants_blank_line`](Self::wants_blank_line).
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use gantry_core::{CommandRecord, NullSink};
///
/// let record = CommandRecord::new("G1 X10 Y-2.5", Arc::new(NullSink::new()));
/// assert!(record.has_g);
/// assert_eq!(record.g, 1);
/// assert_eq!(record.value('X'), 10.0);
/// assert_eq!(record.value('Y'), -2.5);
/// assert_eq!(record.value('Z'), 0.0); // absent fields read as the sentinel
/// ```
pub struct CommandRecord {
    text: String,
    params: HashMap<char, f64>,

    /// `true` when the token carries a `G` command letter.
    pub has_g: bool,
    /// `true` when the token carries an `M` command letter.
    pub has_m: bool,
    /// `true` when the token carries a `T` command letter.
    pub has_t: bool,
    /// Integer code following `G`, zero when absent.
    pub g: u32,
    /// Integer code following `M`, zero when absent.
    pub m: u32,
    /// Integer code following `T`, zero when absent.
    pub t: u32,

    /// Set by any module that claims the command.
    pub accepted: bool,
    /// Text appended to the positive acknowledgment, cleared after use.
    pub txt_after_ok: String,
    /// Request for a blank separator line before the acknowledgment.
    pub wants_blank_line: bool,

    /// The sink of the originating line. The settings-persistence path swaps
    /// this for a file-backed sink for the duration of one dispatch.
    pub sink: Arc<dyn OutputSink>,
}

impl CommandRecord {
    /// Parses `text` into a record bound to `sink`.
    ///
    /// Parsing never fails: unparseable numeric fields resolve to `0.0`.
    pub fn new(text: impl Into<String>, sink: Arc<dyn OutputSink>) -> Self {
        let text = text.into();
        let params = parse_params(&text);
        let value_of = |letter: char| params.get(&letter).copied().unwrap_or(0.0);
        Self {
            has_g: params.contains_key(&'G'),
            has_m: params.contains_key(&'M'),
            has_t: params.contains_key(&'T'),
            g: value_of('G') as u32,
            m: value_of('M') as u32,
            t: value_of('T') as u32,
            accepted: false,
            txt_after_ok: String::new(),
            wants_blank_line: false,
            sink,
            params,
            text,
        }
    }

    /// The raw token text this record was parsed from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether `letter` appears anywhere in the token.
    pub fn has_letter(&self, letter: char) -> bool {
        self.params.contains_key(&letter)
    }

    /// The numeric value following `letter`, or `0.0` when the letter is
    /// absent or not followed by a number.
    pub fn value(&self, letter: char) -> f64 {
        self.params.get(&letter).copied().unwrap_or(0.0)
    }
}

impl fmt::Debug for CommandRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRecord")
            .field("text", &self.text)
            .field("has_g", &self.has_g)
            .field("has_m", &self.has_m)
            .field("has_t", &self.has_t)
            .field("g", &self.g)
            .field("m", &self.m)
            .field("t", &self.t)
            .field("accepted", &self.accepted)
            .field("txt_after_ok", &self.txt_after_ok)
            .finish()
    }
}
