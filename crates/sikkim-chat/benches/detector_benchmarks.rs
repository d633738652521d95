//! Benchmarks for keyword intent detection.
//!
//! Detection runs once per submitted message, scanning every keyword of
//! every intent in the worst case, so the no-match path is the slowest.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sikkim_chat::LanguageCatalog;

const SAMPLES: &[&str] = &[
    "What is the best time to visit?",
    "Which permit do foreigners need for Nathula?",
    "मुझे स्थानीय भोजन के बारे में बताइए",
    "Can you recommend a homestay near Pelling",
    "Tell me about the yak trails in the north",
];

fn bench_detect(c: &mut Criterion) {
    let catalog = LanguageCatalog::builtin();
    let detector = catalog.detector();

    c.bench_function("detect_mixed_samples", |b| {
        b.iter(|| {
            for text in SAMPLES {
                black_box(detector.detect(black_box(text)));
            }
        })
    });

    let long_miss = "the yak trails in the north ".repeat(40);
    c.bench_function("detect_long_no_match", |b| {
        b.iter(|| black_box(detector.detect(black_box(&long_miss))))
    });
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
