//! Benchmarks for docnorm normalization performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic documents built in memory.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docnorm::{
    AnomalyAction, ConservativeDecisions, Document, Normalizer, Paragraph, Run, ScanOptions,
    ScriptedDecisions, StripPreset, StyleTarget,
};

/// Creates a document with `paragraph_count` paragraphs, each holding
/// a few plain runs and one single-character bold run.
fn create_test_document(paragraph_count: usize) -> Document {
    let mut doc = Document::new();
    for i in 0..paragraph_count {
        let mut p = Paragraph::with_style(if i % 5 == 0 { "Heading1" } else { "Normal" });
        p.add_text(format!("Paragraph {} opens with plain text and ", i + 1));
        p.add_run(Run::bold("X"));
        p.add_run(Run::italic(" some emphasis "));
        p.add_text("before closing.");
        doc.add_paragraph(p);
    }
    doc
}

/// Benchmark format detection on serialized packages.
fn bench_format_detection(c: &mut Criterion) {
    let data = docnorm::to_bytes(&create_test_document(10)).unwrap();
    let non_docx = b"Not a package at all, just random text content";

    c.bench_function("detect_valid_docx", |b| {
        b.iter(|| docnorm::detect_format_from_bytes(black_box(&data)).unwrap());
    });

    c.bench_function("detect_non_docx", |b| {
        b.iter(|| docnorm::detect_format_from_bytes(black_box(non_docx)).is_err());
    });
}

/// Benchmark the full pipeline at various sizes.
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for paragraph_count in [10, 100, 1000].iter() {
        let doc = create_test_document(*paragraph_count);

        group.bench_function(format!("{}_paragraphs_conservative", paragraph_count), |b| {
            let normalizer = Normalizer::new().preset(StripPreset::Aggressive);
            b.iter(|| {
                let mut doc = doc.clone();
                normalizer
                    .run(black_box(&mut doc), &mut ConservativeDecisions)
                    .unwrap()
            });
        });

        group.bench_function(format!("{}_paragraphs_scripted", paragraph_count), |b| {
            let normalizer = Normalizer::new();
            b.iter(|| {
                let mut doc = doc.clone();
                let mut decisions = ScriptedDecisions::new()
                    .with_language("en-US")
                    .with_style("Heading 1", StyleTarget::Heading2)
                    .with_review(std::iter::repeat(AnomalyAction::Revert).take(*paragraph_count))
                    .with_scrub();
                normalizer.run(black_box(&mut doc), &mut decisions).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark the read-only anomaly scan.
fn bench_find_anomalies(c: &mut Criterion) {
    let doc = create_test_document(1000);
    let options = ScanOptions::default();

    c.bench_function("find_anomalies_1000", |b| {
        b.iter(|| docnorm::find_anomalies(black_box(&doc), &options));
    });
}

/// Benchmark package round trip.
fn bench_round_trip(c: &mut Criterion) {
    let data = docnorm::to_bytes(&create_test_document(100)).unwrap();

    c.bench_function("round_trip_100", |b| {
        b.iter(|| {
            let doc = docnorm::open_bytes(black_box(&data)).unwrap();
            docnorm::to_bytes(&doc).unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_normalize,
    bench_find_anomalies,
    bench_round_trip,
);
criterion_main!(benches);
