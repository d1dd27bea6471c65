//! Benchmarks for the threaded Gustavson kernel

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use gustavson::{gustavson_spgemm, reference_spgemm, SparseMatrixCSR, SpgemmConfig};
use std::hint::black_box;

/// Banded-with-scatter test matrix: `per_row` distinct columns per row
fn generate_sparse_matrix(n: usize, per_row: usize) -> SparseMatrixCSR<f64> {
    let mut row_ptr = vec![0];
    let mut col_idx = Vec::new();
    let mut values = Vec::new();

    for i in 0..n {
        let mut cols: Vec<usize> = (0..per_row).map(|j| (i + j * j * 13 + j) % n).collect();
        cols.sort_unstable();
        cols.dedup();
        for (j, col) in cols.into_iter().enumerate() {
            col_idx.push(col);
            values.push(1.0 + (i + j) as f64 * 0.01);
        }
        row_ptr.push(col_idx.len());
    }

    SparseMatrixCSR::new(n, n, row_ptr, col_idx, values)
}

fn bench_thread_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("thread_scaling");
    group.sample_size(10);

    let a = generate_sparse_matrix(20_000, 16);
    let max_threads = num_cpus::get().max(1);

    let mut n_threads = 1;
    while n_threads <= max_threads {
        let config = SpgemmConfig::with_threads(n_threads);
        group.bench_with_input(BenchmarkId::new("gustavson", n_threads), &config, |bench, config| {
            bench.iter(|| black_box(gustavson_spgemm(&a, &a, config).unwrap()))
        });
        n_threads *= 2;
    }

    group.finish();
}

fn bench_estimate_quality(c: &mut Criterion) {
    let mut group = c.benchmark_group("estimate_quality");
    group.sample_size(10);

    let a = generate_sparse_matrix(10_000, 24);
    let n_threads = num_cpus::get().clamp(1, 8);

    for (name, hint) in [("estimated", None), ("undersized", Some(1)), ("oversized", Some(2_000))] {
        let mut config = SpgemmConfig::with_threads(n_threads);
        if let Some(hint) = hint {
            config = config.nnz_per_row_hint(hint);
        }
        group.bench_function(name, |bench| {
            bench.iter(|| black_box(gustavson_spgemm(&a, &a, &config).unwrap()))
        });
    }

    group.finish();
}

fn bench_against_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("versus_reference");
    group.sample_size(10);

    for &n in &[1_000, 5_000] {
        let a = generate_sparse_matrix(n, 12);
        let config = SpgemmConfig::default();

        group.bench_with_input(BenchmarkId::new("gustavson", n), &a, |bench, a| {
            bench.iter(|| black_box(gustavson_spgemm(a, a, &config).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("reference", n), &a, |bench, a| {
            bench.iter(|| black_box(reference_spgemm(a, a)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_thread_scaling, bench_estimate_quality, bench_against_reference);
criterion_main!(benches);
