//! Criterion benchmarks for line tokenization.
//!
//! Run with:
//! ```bash
//! cargo bench --package gantry-core --bench splitter_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gantry_core::{split_commands, strip_comment};

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split_commands");

    let fixtures: [(&str, &str); 4] = [
        ("single", "G28"),
        ("typical", "G1 X10.5 Y-3.2 E0.42 F1500"),
        ("packed", "G90G21G1 X5 Y5M104 S200M106 S255T0"),
        ("no_commands", "X5 Y10 Z15"),
    ];

    for (name, body) in fixtures {
        group.bench_with_input(BenchmarkId::from_parameter(name), body, |b, body| {
            b.iter(|| black_box(split_commands(black_box(body))))
        });
    }

    group.finish();
}

fn bench_strip_comment(c: &mut Criterion) {
    c.bench_function("strip_comment", |b| {
        b.iter(|| black_box(strip_comment(black_box("G1 X10 Y20 ; perimeter, layer 3"))))
    });
}

criterion_group!(benches, bench_split, bench_strip_comment);
criterion_main!(benches);
