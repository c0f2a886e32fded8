//! Segmenter Benchmarks
//!
//! Segment resolution runs on every render of every visible field, so it is
//! the service's hot path. These benches size it against a long prose field
//! with a realistically dense highlight set.
//!
//! Run with: `cargo bench --bench segmenter`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use marginalia_server::annotations::types::{Highlight, HighlightColor};
use marginalia_server::render::{segments, to_html};

/// Build a long field of repeating prose with distinct anchor phrases
fn build_field(paragraphs: usize) -> String {
    let mut text = String::new();
    for i in 0..paragraphs {
        text.push_str(&format!(
            "Paragraph {} argues that maritime trade networks concentrated \
             wealth in port cities, and that anchor-phrase-{} marks the \
             evidentiary turn of the claim. ",
            i, i
        ));
    }
    text
}

/// One highlight per anchor phrase, in creation order
fn build_highlights(count: usize) -> Vec<Highlight> {
    (0..count)
        .map(|i| Highlight::new(format!("anchor-phrase-{}", i), HighlightColor::Yellow))
        .collect()
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmenter");
    group.measurement_time(Duration::from_secs(10));

    let field = build_field(100);
    let few = build_highlights(5);
    let many = build_highlights(50);

    group.bench_function("segment_100_paragraphs_5_highlights", |b| {
        b.iter(|| segments(black_box(&field), black_box(&few)))
    });

    group.bench_function("segment_100_paragraphs_50_highlights", |b| {
        b.iter(|| segments(black_box(&field), black_box(&many)))
    });

    // Repeated needle: every highlight shares one text, forcing the
    // occurrence scan to walk past claimed ranges
    let repeated: Vec<Highlight> = (0..50)
        .map(|_| Highlight::new("trade", HighlightColor::Yellow))
        .collect();
    group.bench_function("segment_repeated_needle_50_highlights", |b| {
        b.iter(|| segments(black_box(&field), black_box(&repeated)))
    });

    group.finish();
}

fn bench_html_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("html");

    let field = build_field(100);
    let many = build_highlights(50);
    let segs = segments(&field, &many);

    group.bench_function("to_html_100_paragraphs_50_highlights", |b| {
        b.iter(|| to_html(black_box(&segs), black_box(&many)))
    });

    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_html_emission);
criterion_main!(benches);
