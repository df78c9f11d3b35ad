//! Benchmarks for document rendering.

use adfless::adf::Document;
use adfless::convert::Converter;
use adfless::ids::SequentialIds;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn sample() -> Document {
    let md = include_str!("../tests/fixtures/sample.md").repeat(20);
    Converter::new().from_markdown(&md, &mut SequentialIds::default())
}

fn bench_display_lines(c: &mut Criterion) {
    let converter = Converter::new();
    let doc = sample();
    c.bench_function("display_lines", |b| {
        b.iter(|| converter.display_lines(black_box(&doc)))
    });
}

fn bench_to_markdown(c: &mut Criterion) {
    let converter = Converter::new();
    let doc = sample();
    c.bench_function("to_markdown", |b| {
        b.iter(|| converter.to_markdown(black_box(&doc)))
    });
}

criterion_group!(benches, bench_display_lines, bench_to_markdown);
criterion_main!(benches);
