use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use bibsync_merge::{detect_conflicts, merge_record_sets};
use bibsync_model::{Record, RecordSet};

fn database(size: usize, edit_every: usize, tag: &str) -> RecordSet {
    (0..size)
        .map(|i| {
            let record = Record::new("article")
                .with_key(&format!("key{i}"))
                .with_field("title", &format!("Title {i}"))
                .with_field("year", "2020");
            if edit_every > 0 && i % edit_every == 0 {
                record.with_field("note", tag)
            } else {
                record
            }
        })
        .collect()
}

fn benchmark_semantic_merge(c: &mut Criterion) {
    let base = database(2_000, 0, "");
    let local = database(2_000, 7, "local");
    let remote = database(2_000, 11, "remote");

    let mut group = c.benchmark_group("semantic_merge");

    group.bench_function("detect_conflicts", |b| {
        b.iter(|| detect_conflicts(black_box(&base), black_box(&local), black_box(&remote)))
    });

    group.bench_function("merge_record_sets", |b| {
        b.iter(|| merge_record_sets(black_box(&base), black_box(&local), black_box(&remote)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_semantic_merge);
criterion_main!(benches);
