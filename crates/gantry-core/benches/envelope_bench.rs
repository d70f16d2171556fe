//! Criterion benchmarks for reliability-envelope validation.
//!
//! Measures per-line validation latency; the ingestion path runs once per
//! received serial line, so this bounds sustainable line throughput.
//!
//! Run with:
//! ```bash
//! cargo bench --package gantry-core --bench envelope_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gantry_core::LineValidator;

// ── Line fixtures ─────────────────────────────────────────────────────────────

fn numbered_valid() -> String {
    "N0 G1 X10*81".to_string()
}

fn numbered_corrupt() -> String {
    "N0 G1 Y10*81".to_string()
}

fn unnumbered() -> String {
    "G1 X12.5 Y-3.25 F1500".to_string()
}

fn sequence_reset() -> String {
    "M110 N0".to_string()
}

fn commented() -> String {
    "G1 X10 ; outline pass".to_string()
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    let fixtures: Vec<(&str, String)> = vec![
        ("numbered_valid", numbered_valid()),
        ("numbered_corrupt", numbered_corrupt()),
        ("unnumbered", unnumbered()),
        ("sequence_reset", sequence_reset()),
        ("commented", commented()),
    ];

    for (name, line) in &fixtures {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| {
                // Fresh validator per iteration so sequence state never
                // drifts into permanent rejection.
                let mut validator = LineValidator::new();
                black_box(validator.validate(black_box(line)))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate);
criterion_main!(benches);
