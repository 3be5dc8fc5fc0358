//! Criterion benchmarks for sequential vs parallel radix sort.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use radix_sorting::dispatch::LocalPoolDispatcher;
use radix_sorting::parallel::ParallelSorter;
use radix_sorting::radix::radix_sort;

/// Generate reproducible test data of the given size.
fn generate_data(seed: u64, size: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| rng.gen_range(0..1_000_000_000)).collect()
}

fn bench_std_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("std sort");

    for size in [10_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || generate_data(42, size),
                |mut data| {
                    data.sort_unstable();
                    data
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_sequential_radix(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequential radix");

    for size in [10_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || generate_data(42, size),
                |mut data| {
                    radix_sort(black_box(&mut data));
                    data
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_parallel_radix(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel radix 1M");
    let size = 1_000_000;
    group.throughput(Throughput::Elements(size as u64));

    for workers in [2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::from_parameter(workers),
            &workers,
            |b, &workers| {
                let mut sorter =
                    ParallelSorter::new(LocalPoolDispatcher::new(workers).unwrap());
                b.iter_batched(
                    || generate_data(42, size),
                    |data| sorter.sort(black_box(data)).unwrap(),
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_std_sort,
    bench_sequential_radix,
    bench_parallel_radix
);
criterion_main!(benches);
