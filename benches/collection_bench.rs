//! Benchmark for Collection vs standard Vec.
//!
//! Compares orderly's eager Collection against plain iterator chains over a
//! `Vec` for the common transformation and aggregate operations.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use orderly::{Collection, collect};
use std::hint::black_box;

// =============================================================================
// Construction Benchmark
// =============================================================================

fn benchmark_construction(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("construction");

    for size in [100, 1000, 10000] {
        group.bench_with_input(
            BenchmarkId::new("Collection", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| black_box(collect(0..black_box(size))));
            },
        );

        group.bench_with_input(BenchmarkId::new("Vec", size), &size, |bencher, &size| {
            bencher.iter(|| black_box((0..black_box(size)).collect::<Vec<_>>()));
        });
    }

    group.finish();
}

// =============================================================================
// push Benchmark
// =============================================================================

fn benchmark_push(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("push");

    // push scans for the next free key, so sizes stay small.
    for size in [10, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("Collection", size),
            &size,
            |bencher, &size| {
                bencher.iter(|| {
                    let mut collection = Collection::new();
                    for index in 0..size {
                        collection.push(black_box(index));
                    }
                    black_box(collection)
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// map / filter Benchmark
// =============================================================================

fn benchmark_map_filter(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("map_filter");

    for size in [100, 1000, 10000] {
        let collection = collect(0..size);
        let vector: Vec<i64> = (0..size).collect();

        group.bench_with_input(
            BenchmarkId::new("Collection", size),
            &collection,
            |bencher, collection| {
                bencher.iter(|| {
                    black_box(
                        collection
                            .map(|value, _| value * 2)
                            .filter(|value, _| value % 3 == 0),
                    )
                });
            },
        );

        group.bench_with_input(BenchmarkId::new("Vec", size), &vector, |bencher, vector| {
            bencher.iter(|| {
                black_box(
                    vector
                        .iter()
                        .map(|value| value * 2)
                        .filter(|value| value % 3 == 0)
                        .collect::<Vec<_>>(),
                )
            });
        });
    }

    group.finish();
}

// =============================================================================
// group_by Benchmark
// =============================================================================

fn benchmark_group_by(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("group_by");

    for size in [100, 1000, 10000] {
        let collection = collect((0..size).map(|value| format!("item-{}", value % 17)));

        group.bench_with_input(
            BenchmarkId::new("Collection", size),
            &collection,
            |bencher, collection| {
                bencher.iter(|| black_box(collection.group_by(|value, _| value.len())));
            },
        );
    }

    group.finish();
}

// =============================================================================
// sort Benchmark
// =============================================================================

fn benchmark_sort(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("sort");

    for size in [100, 1000, 10000] {
        let collection = collect((0..size).map(|value: i64| (value * 7919) % size));

        group.bench_with_input(
            BenchmarkId::new("Collection", size),
            &collection,
            |bencher, collection| {
                bencher.iter(|| black_box(collection.sort()));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Aggregate Benchmark
// =============================================================================

fn benchmark_aggregate(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("aggregate");

    for size in [100, 1000, 10000] {
        let collection = collect(0..size);

        group.bench_with_input(BenchmarkId::new("sum", size), &collection, |bencher, collection| {
            bencher.iter(|| black_box(collection.sum()));
        });

        group.bench_with_input(BenchmarkId::new("avg", size), &collection, |bencher, collection| {
            bencher.iter(|| black_box(collection.avg()));
        });

        group.bench_with_input(
            BenchmarkId::new("chunk", size),
            &collection,
            |bencher, collection| {
                bencher.iter(|| black_box(collection.chunk(black_box(16))));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_construction,
    benchmark_push,
    benchmark_map_filter,
    benchmark_group_by,
    benchmark_sort,
    benchmark_aggregate
);

criterion_main!(benches);
