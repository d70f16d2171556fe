//! Integration tests for the line reliability protocol.
//!
//! Exercises validation, tokenization, and the command model together
//! through the public crate API, the way the host dispatcher drives them.

use std::sync::Arc;

use gantry_core::{
    split_commands, CommandRecord, LineValidator, LineVerdict, NullSink, SEQUENCE_UNSET,
};

/// Computes the reliability checksum the way a sender would.
fn checksum(line: &str) -> u8 {
    line.bytes().fold(0u8, |acc, b| acc ^ b)
}

fn frame(sequence: i64, body: &str) -> String {
    let unframed = format!("N{sequence} {body}");
    let cs = checksum(&unframed);
    format!("{unframed}*{cs}")
}

// ── Validation ────────────────────────────────────────────────────────────────

#[test]
fn test_sender_framed_stream_is_accepted_in_order() {
    let mut validator = LineValidator::new();
    let bodies = ["G28", "G1 X10 Y10 F1500", "M104 S200", "T0"];

    for (i, body) in bodies.iter().enumerate() {
        let line = frame(i as i64, body);
        match validator.validate(&line) {
            LineVerdict::Accepted { body: got } => assert_eq!(&got, body),
            other => panic!("line {line:?} not accepted: {other:?}"),
        }
    }

    assert_eq!(validator.expected_sequence(), 3);
}

#[test]
fn test_every_single_byte_flip_is_detected() {
    // Flip each payload byte in turn; the validator must reject every
    // corrupted variant. Flips that land inside the framing digits are
    // covered by the sequence gate instead, so only the body is mutated.
    let line = frame(0, "G1 X10 Y-2.5");
    let star = line.find('*').expect("framed line has a checksum");

    for i in 3..star {
        let mut corrupted = line.clone().into_bytes();
        corrupted[i] ^= 0x01;
        let corrupted = String::from_utf8(corrupted).expect("ascii stays ascii");

        let mut validator = LineValidator::new();
        assert_eq!(
            validator.validate(&corrupted),
            LineVerdict::Rejected { resend: 0 },
            "flip at byte {i} of {line:?} must be caught"
        );
        assert_eq!(validator.expected_sequence(), SEQUENCE_UNSET);
    }
}

#[test]
fn test_dropped_line_recovery_via_resend() {
    let mut validator = LineValidator::new();
    assert!(matches!(
        validator.validate(&frame(0, "G28")),
        LineVerdict::Accepted { .. }
    ));

    // Line 1 is lost in transit; line 2 arrives and is refused.
    let verdict = validator.validate(&frame(2, "G1 X5"));
    assert_eq!(verdict, LineVerdict::Rejected { resend: 1 });

    // The sender retransmits from the requested number and the stream heals.
    assert!(matches!(
        validator.validate(&frame(1, "G1 X1")),
        LineVerdict::Accepted { .. }
    ));
    assert!(matches!(
        validator.validate(&frame(2, "G1 X5")),
        LineVerdict::Accepted { .. }
    ));
}

// ── Validation + tokenization ─────────────────────────────────────────────────

#[test]
fn test_multi_command_line_round_trip() {
    let mut validator = LineValidator::new();

    let verdict = validator.validate(&frame(0, "G1 X1 M104 S200"));
    let body = match verdict {
        LineVerdict::Accepted { body } => body,
        other => panic!("expected acceptance, got {other:?}"),
    };

    assert_eq!(split_commands(&body), vec!["G1 X1 ", "M104 S200"]);
}

#[test]
fn test_comment_suffix_never_reaches_tokens() {
    let mut validator = LineValidator::new();

    let body = match validator.validate("G1 X1 ; M104 would be a command") {
        LineVerdict::Accepted { body } => body,
        other => panic!("expected acceptance, got {other:?}"),
    };
    let tokens = split_commands(&body);

    assert_eq!(tokens, vec!["G1 X1 "]);
}

// ── Tokenization + command model ──────────────────────────────────────────────

#[test]
fn test_tokens_parse_into_independent_records() {
    let tokens = split_commands("G1 X1 M104 S200");
    let records: Vec<CommandRecord> = tokens
        .iter()
        .map(|t| CommandRecord::new(*t, Arc::new(NullSink::new())))
        .collect();

    assert!(records[0].has_g);
    assert_eq!(records[0].g, 1);
    assert_eq!(records[0].value('X'), 1.0);
    assert!(!records[0].has_m);

    assert!(records[1].has_m);
    assert_eq!(records[1].m, 104);
    assert_eq!(records[1].value('S'), 200.0);
    assert!(!records[1].has_g);
}
