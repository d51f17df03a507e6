//! Benchmark for LazyCollection pipelines.
//!
//! Measures the per-stage overhead of the boxed pull pipeline against an
//! equivalent std iterator chain, and the cost of replaying a remembered
//! pipeline.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use orderly::{LazyCollection, collect};
use std::hint::black_box;

// =============================================================================
// Pipeline Benchmark
// =============================================================================

fn benchmark_pipeline(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("lazy_pipeline");

    for size in [100_usize, 1000, 10000] {
        let pipeline = LazyCollection::make(|| 0_u64..)
            .map(|value, _| value * 3)
            .filter(|value, _| value % 2 == 0)
            .take(size);

        group.bench_with_input(
            BenchmarkId::new("LazyCollection", size),
            &pipeline,
            |bencher, pipeline| {
                bencher.iter(|| black_box(pipeline.sum()));
            },
        );

        group.bench_with_input(BenchmarkId::new("Iterator", size), &size, |bencher, &size| {
            bencher.iter(|| {
                black_box(
                    (0_u64..)
                        .map(|value| value * 3)
                        .filter(|value| value % 2 == 0)
                        .take(size)
                        .sum::<u64>(),
                )
            });
        });

        group.bench_with_input(BenchmarkId::new("Collection", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let eager = collect(0..size as u64 * 2)
                    .map(|value, _| value * 3)
                    .filter(|value, _| value % 2 == 0);
                black_box(eager.sum())
            });
        });
    }

    group.finish();
}

// =============================================================================
// Short-Circuit Benchmark
// =============================================================================

fn benchmark_first_where(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("lazy_first_where");

    for target in [10_u64, 1000, 100_000] {
        let naturals = LazyCollection::make(|| 0_u64..);

        group.bench_with_input(
            BenchmarkId::new("LazyCollection", target),
            &target,
            |bencher, &target| {
                bencher.iter(|| black_box(naturals.first_where(|value, _| *value == target)));
            },
        );
    }

    group.finish();
}

// =============================================================================
// remember Benchmark
// =============================================================================

fn benchmark_remember(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("lazy_remember");

    for size in [100_usize, 1000, 10000] {
        let source = LazyCollection::make(move || (0..size).map(|value| value.to_string()));
        let remembered = source.remember();
        // Warm the cache so every measured iteration is a replay.
        let _ = remembered.count();

        group.bench_with_input(
            BenchmarkId::new("replay", size),
            &remembered,
            |bencher, remembered| {
                bencher.iter(|| black_box(remembered.count()));
            },
        );

        group.bench_with_input(BenchmarkId::new("rerun", size), &source, |bencher, source| {
            bencher.iter(|| black_box(source.count()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_pipeline,
    benchmark_first_where,
    benchmark_remember
);

criterion_main!(benches);
