use chirpy::services::chirps::clean_chirp_body;
use chirpy::services::content_filter::mask_profanity;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn benchmark_mask_profanity(c: &mut Criterion) {
    // A full-length chirp with no denylisted words, and one full of them
    let clean = "the quick brown fox jumps over the lazy dog again and again ".repeat(2);
    let dirty = "kerfuffle sharbert fornax Kerfuffle SHARBERT fornax! ".repeat(2);

    let mut group = c.benchmark_group("content_filter");

    group.bench_function("mask_clean_chirp", |b| {
        b.iter(|| mask_profanity(black_box(&clean)))
    });

    group.bench_function("mask_profane_chirp", |b| {
        b.iter(|| mask_profanity(black_box(&dirty)))
    });

    group.bench_function("clean_chirp_body_max_length", |b| {
        let body = "a".repeat(140);
        b.iter(|| clean_chirp_body(black_box(&body)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_mask_profanity);
criterion_main!(benches);
