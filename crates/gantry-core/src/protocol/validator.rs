//! Line-level reliability validation: checksum and sequence numbers.
//!
//! Serial links guarantee neither integrity nor ordering, so senders wrap
//! each line in the `N<seq>…*<checksum>` envelope. The [`LineValidator`]
//! owns the per-channel `expected_sequence` counter and turns each raw line
//! into a [`LineVerdict`]:
//!
//! - the whole line is accepted and its dispatch-ready body extracted, or
//! - the whole line is rejected and a resend is requested. There is no
//!   partial acceptance, so a garbled line can never leak half its commands
//!   into the dispatch path.
//!
//! The checksum is the XOR fold of every byte before the first `*`
//! (including the leading `N<seq>` digits), masked to 8 bits. Unnumbered
//! `G`/`M`/`T` lines are assumed trusted: they skip both gates and do not
//! advance the sequence.
//!
//! Rejection never mutates `expected_sequence`, which makes the resend
//! request a pure function of validator state: a sender may ask for the same
//! retransmission any number of times and the protocol self-corrects.

use crate::command::record::scan_letter_value;
use crate::protocol::splitter::strip_comment;

/// Sentinel for a channel that has not yet accepted a numbered line.
///
/// The first acceptable sequence number is `SEQUENCE_UNSET + 1`, i.e. `N0`;
/// senders conventionally open with `M110 N0` to pin this down explicitly.
pub const SEQUENCE_UNSET: i64 = -1;

/// Characters forming the `N<seq>` prefix stripped from numbered lines.
const LINE_NUMBER_PREFIX: &str = "N0123456789.,- ";

/// Command code that resets the expected sequence number.
const SET_LINE_NUMBER_CODE: i64 = 110;

/// Outcome of validating one raw line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineVerdict {
    /// Line passed both gates. `body` is checksum-stripped,
    /// line-number-stripped, and comment-stripped: ready for tokenization.
    Accepted { body: String },

    /// The line carried `M110` (set current line number); the sequence was
    /// reset to `sequence` unconditionally. One positive acknowledgment,
    /// zero tokens.
    SequenceReset { sequence: i64 },

    /// Checksum or sequence mismatch. The entire line is discarded and the
    /// sender must retransmit starting at `resend`.
    Rejected { resend: i64 },

    /// The line opens with a comment marker or blank; acknowledge and move
    /// on without tokenizing.
    Comment,

    /// Nothing recognizable; produce no response at all.
    Ignored,
}

/// Per-channel validator state.
///
/// One instance per input channel; channels never share sequence state.
///
/// # Examples
///
/// ```rust
/// use gantry_core::{LineValidator, LineVerdict};
///
/// let mut validator = LineValidator::new();
/// assert_eq!(
///     validator.validate("N0 G1 X10*81"),
///     LineVerdict::Accepted { body: "G1 X10".to_string() },
/// );
/// // A gap in the numbering is rejected and the resend names the next
/// // expected sequence number.
/// assert_eq!(
///     validator.validate("N5 G1 X20*99"),
///     LineVerdict::Rejected { resend: 1 },
/// );
/// ```
#[derive(Debug)]
pub struct LineValidator {
    expected: i64,
}

impl LineValidator {
    /// Creates a validator with the sequence at [`SEQUENCE_UNSET`].
    pub fn new() -> Self {
        Self {
            expected: SEQUENCE_UNSET,
        }
    }

    /// The last accepted sequence number, or [`SEQUENCE_UNSET`].
    pub fn expected_sequence(&self) -> i64 {
        self.expected
    }

    /// The sequence number the next numbered line must carry.
    pub fn next_expected(&self) -> i64 {
        self.expected + 1
    }

    /// Validates one raw line and updates sequence state accordingly.
    pub fn validate(&mut self, raw: &str) -> LineVerdict {
        let first = match raw.chars().next() {
            Some(c) => c,
            None => return LineVerdict::Ignored,
        };
        match first {
            'G' | 'M' | 'T' | 'N' => {}
            ';' | '(' | ' ' | '\r' | '\n' => return LineVerdict::Comment,
            _ => return LineVerdict::Ignored,
        }

        // M110 resets the sequence before any checksum gate, whether the
        // line is numbered (`N5 M110`) or bare (`M110 N5`). The sender uses
        // it precisely when the two sides disagree about numbering, so a
        // checksum-validated sequence reset would deadlock recovery. The
        // scan stops at the comment marker; a commented-out M110 does not
        // declare the command.
        let commands = strip_comment(raw);
        if let Some(m) = scan_letter_value(commands, 'M') {
            if m as i64 == SET_LINE_NUMBER_CODE {
                let sequence = scan_letter_value(commands, 'N').unwrap_or(0.0) as i64;
                tracing::debug!(sequence, "sequence counter reset");
                self.expected = sequence;
                return LineVerdict::SequenceReset { sequence };
            }
        }

        let mut body = raw.to_string();
        let (checksum_ok, line_number) = if first == 'N' {
            let line_number = scan_letter_value(raw, 'N').unwrap_or(0.0) as i64;
            let mut checksum_ok = true;
            if let Some(star) = body.find('*') {
                let declared = scan_letter_value(&body, '*').unwrap_or(0.0) as i64;
                let folded = body.as_bytes()[..star]
                    .iter()
                    .fold(0u8, |acc, b| acc ^ b);
                checksum_ok = i64::from(folded) == declared;
                body.truncate(star);
            }
            let prefix_end = body
                .find(|c: char| !LINE_NUMBER_PREFIX.contains(c))
                .unwrap_or(body.len());
            body.drain(..prefix_end);
            (checksum_ok, line_number)
        } else {
            // Unnumbered lines are trusted: checksum forced valid, sequence
            // forced to the expected next value.
            (true, self.expected + 1)
        };

        let body = strip_comment(&body).to_string();

        let next = self.expected + 1;
        if checksum_ok && line_number == next {
            if first == 'N' {
                self.expected = next;
            }
            LineVerdict::Accepted { body }
        } else {
            tracing::warn!(
                line_number,
                expected = next,
                checksum_ok,
                "line rejected, requesting resend"
            );
            LineVerdict::Rejected { resend: next }
        }
    }
}

impl Default for LineValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(body: &str) -> LineVerdict {
        LineVerdict::Accepted {
            body: body.to_string(),
        }
    }

    #[test]
    fn test_unnumbered_line_is_trusted_and_does_not_advance_sequence() {
        // Arrange
        let mut v = LineValidator::new();

        // Act
        let verdict = v.validate("G1 X10");

        // Assert
        assert_eq!(verdict, accepted("G1 X10"));
        assert_eq!(v.expected_sequence(), SEQUENCE_UNSET);
    }

    #[test]
    fn test_numbered_line_with_valid_checksum_advances_sequence() {
        let mut v = LineValidator::new();

        let verdict = v.validate("N0 G1 X10*81");

        assert_eq!(verdict, accepted("G1 X10"));
        assert_eq!(v.expected_sequence(), 0);
    }

    #[test]
    fn test_consecutive_numbered_lines_accepted_in_order() {
        let mut v = LineValidator::new();

        assert_eq!(v.validate("N0 G1 X10*81"), accepted("G1 X10"));
        assert_eq!(v.validate("N1 G1 X10*80"), accepted("G1 X10"));
        assert_eq!(v.expected_sequence(), 1);
    }

    #[test]
    fn test_single_flipped_byte_fails_checksum() {
        let mut v = LineValidator::new();

        // "N0 G1 X10*81" is valid; corrupt the X into a Y in transit.
        let verdict = v.validate("N0 G1 Y10*81");

        assert_eq!(verdict, LineVerdict::Rejected { resend: 0 });
        assert_eq!(
            v.expected_sequence(),
            SEQUENCE_UNSET,
            "rejection must not advance the sequence"
        );
    }

    #[test]
    fn test_sequence_gap_is_rejected_with_expected_resend() {
        let mut v = LineValidator::new();
        assert_eq!(v.validate("N0 G1 X10*81"), accepted("G1 X10"));

        // N2 arrives where N1 was expected; checksum itself is fine.
        let verdict = v.validate("N2 T0*56");

        assert_eq!(verdict, LineVerdict::Rejected { resend: 1 });
        assert_eq!(v.expected_sequence(), 0);
    }

    #[test]
    fn test_resend_request_is_idempotent() {
        let mut v = LineValidator::new();
        assert_eq!(v.validate("N0 G1 X10*81"), accepted("G1 X10"));

        let first = v.validate("N5 G92 E0*66");
        let second = v.validate("N5 G92 E0*66");

        assert_eq!(first, LineVerdict::Rejected { resend: 1 });
        assert_eq!(second, LineVerdict::Rejected { resend: 1 });
    }

    #[test]
    fn test_duplicate_line_is_rejected() {
        let mut v = LineValidator::new();
        assert_eq!(v.validate("N0 G1 X10*81"), accepted("G1 X10"));

        // Retransmission of an already-accepted line must not be replayed.
        let verdict = v.validate("N0 G1 X10*81");

        assert_eq!(verdict, LineVerdict::Rejected { resend: 1 });
    }

    #[test]
    fn test_numbered_line_without_checksum_passes_the_gate() {
        let mut v = LineValidator::new();

        let verdict = v.validate("N0 G28");

        assert_eq!(verdict, accepted("G28"));
        assert_eq!(v.expected_sequence(), 0);
    }

    #[test]
    fn test_m110_resets_sequence_on_numbered_line() {
        let mut v = LineValidator::new();

        let verdict = v.validate("N5 M110");

        assert_eq!(verdict, LineVerdict::SequenceReset { sequence: 5 });
        assert_eq!(v.expected_sequence(), 5);
    }

    #[test]
    fn test_m110_resets_sequence_on_bare_line() {
        let mut v = LineValidator::new();

        let verdict = v.validate("M110 N5");

        assert_eq!(verdict, LineVerdict::SequenceReset { sequence: 5 });
        assert_eq!(v.expected_sequence(), 5);
    }

    #[test]
    fn test_m110_ignores_checksum_and_trailing_content() {
        let mut v = LineValidator::new();

        // Deliberately bogus checksum; the reset must still take effect and
        // nothing after M110 may be tokenized (SequenceReset carries no body).
        let verdict = v.validate("N3 M110 G1 X10*1");

        assert_eq!(verdict, LineVerdict::SequenceReset { sequence: 3 });
        assert_eq!(v.expected_sequence(), 3);
    }

    #[test]
    fn test_commented_out_m110_does_not_reset_sequence() {
        let mut v = LineValidator::new();

        let verdict = v.validate("G1 X10 ; M110 N9");

        assert_eq!(verdict, accepted("G1 X10 "));
        assert_eq!(v.expected_sequence(), SEQUENCE_UNSET);
    }

    #[test]
    fn test_sequence_continues_after_reset() {
        let mut v = LineValidator::new();
        assert_eq!(
            v.validate("M110 N5"),
            LineVerdict::SequenceReset { sequence: 5 }
        );

        let verdict = v.validate("N6 G1 X5*99");

        assert_eq!(verdict, accepted("G1 X5"));
        assert_eq!(v.expected_sequence(), 6);
    }

    #[test]
    fn test_comment_and_blank_first_characters_are_acknowledged() {
        let mut v = LineValidator::new();

        assert_eq!(v.validate("; just a comment"), LineVerdict::Comment);
        assert_eq!(v.validate("(header block)"), LineVerdict::Comment);
        assert_eq!(v.validate("   "), LineVerdict::Comment);
    }

    #[test]
    fn test_empty_and_unrecognized_lines_are_ignored() {
        let mut v = LineValidator::new();

        assert_eq!(v.validate(""), LineVerdict::Ignored);
        assert_eq!(v.validate("hello"), LineVerdict::Ignored);
        assert_eq!(v.validate("@reset"), LineVerdict::Ignored);
    }

    #[test]
    fn test_comment_suffix_is_stripped_from_accepted_body() {
        let mut v = LineValidator::new();

        let verdict = v.validate("G1 X10 ; rapid move");

        assert_eq!(verdict, accepted("G1 X10 "));
    }

    #[test]
    fn test_unnumbered_checksum_text_is_left_in_body() {
        // Only numbered lines carry the envelope; a stray `*` on a trusted
        // line is an ordinary parameter.
        let mut v = LineValidator::new();

        let verdict = v.validate("G1 X10*99");

        assert_eq!(verdict, accepted("G1 X10*99"));
    }

    #[test]
    fn test_checksum_folds_the_line_number_prefix() {
        let mut v = LineValidator::new();

        // 15 is the XOR fold of "G1 X10" alone; the correct value over
        // "N0 G1 X10" is 81, so folding must start before the prefix strip.
        let verdict = v.validate("N0 G1 X10*15");

        assert_eq!(verdict, LineVerdict::Rejected { resend: 0 });
    }
}
