//! This bench extracts requirements from a large synthetic regulation with
//! wrapped clause bodies and nested sub-clauses.

#![allow(missing_docs)]

use std::{fmt::Write, hint::black_box};

use criterion::{Criterion, criterion_group, criterion_main};
use reqex::{Extractor, Segmenter};

/// Generates a document with `parts` headed sections of numbered clauses.
fn synthetic_document(parts: usize) -> String {
    let mut text = String::new();
    for part in 1..=parts {
        writeln!(text, "PART {part}").unwrap();
        writeln!(text, "General provisions").unwrap();
        for clause in 1..=10 {
            let n = (part - 1) * 10 + clause;
            writeln!(text, "{n}.—(1) The operator of a regulated site").unwrap();
            writeln!(text, "must ensure that the site is maintained").unwrap();
            writeln!(text, "in accordance with this Part.").unwrap();
            for sub in 2..=4 {
                writeln!(text, "({sub}) A notice under paragraph (1)").unwrap();
                writeln!(text, "should be given in writing and").unwrap();
                writeln!(text, "may be served by post.").unwrap();
            }
        }
    }
    text
}

fn segment(c: &mut Criterion) {
    let text = synthetic_document(100);
    let segmenter = Segmenter::default();

    c.bench_function("segment 1000 clauses", |b| {
        b.iter(|| segmenter.segment(black_box(&text)));
    });
}

fn extract(c: &mut Criterion) {
    let text = synthetic_document(100);
    let extractor = Extractor::default();

    c.bench_function("extract 1000 clauses", |b| {
        b.iter(|| extractor.extract(black_box(&text)));
    });
}

criterion_group!(benches, segment, extract);
criterion_main!(benches);
