/// Benchmarks for the three CRS multiplication variants
///
/// Run with: cargo bench --bench crs_multiply
/// Larger sizes: BENCH_TIER=large cargo bench --bench crs_multiply
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use crsmul::{
    spgemm_distributed, spgemm_parallel, spgemm_seq, AccumulatorKind, MulConfig, SparseMatrixCRS,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use std::time::Duration;

fn bench_sizes() -> Vec<usize> {
    match std::env::var("BENCH_TIER").as_deref() {
        Ok("large") => vec![1_000, 4_000, 10_000],
        _ => vec![500, 1_000],
    }
}

/// Generate a sparse matrix with roughly `nnz_per_row` sorted entries per row
fn generate_bench_matrix(rows: usize, cols: usize, nnz_per_row: usize, seed: u64) -> SparseMatrixCRS<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut row_ptr = Vec::with_capacity(rows + 1);
    let mut col_idx = Vec::with_capacity(rows * nnz_per_row);
    let mut values = Vec::with_capacity(rows * nnz_per_row);

    row_ptr.push(0);

    for _ in 0..rows {
        let mut row_cols: Vec<usize> = (0..nnz_per_row).map(|_| rng.gen_range(0..cols)).collect();
        row_cols.sort_unstable();
        row_cols.dedup();

        for col in row_cols {
            col_idx.push(col);
            values.push(rng.gen_range(0.1..10.0));
        }

        row_ptr.push(col_idx.len());
    }

    SparseMatrixCRS::new(rows, cols, row_ptr, col_idx, values)
}

fn bench_accumulators(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulators");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    for n in bench_sizes() {
        let a = generate_bench_matrix(n, n, 10, 1);
        let b = generate_bench_matrix(n, n, 10, 2);

        for kind in [AccumulatorKind::DenseScan, AccumulatorKind::Dense] {
            group.bench_with_input(BenchmarkId::new(format!("{:?}", kind), n), &n, |bench, _| {
                bench.iter(|| spgemm_seq(black_box(&a), black_box(&b), kind))
            });
        }
    }

    group.finish();
}

fn bench_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("variants");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    let config = MulConfig::default();

    for n in bench_sizes() {
        let a = generate_bench_matrix(n, n, 10, 3);
        let b = generate_bench_matrix(n, n, 10, 4);

        group.bench_with_input(BenchmarkId::new("sequential", n), &n, |bench, _| {
            bench.iter(|| spgemm_seq(black_box(&a), black_box(&b), config.accumulator))
        });

        group.bench_with_input(BenchmarkId::new("rayon", n), &n, |bench, _| {
            bench.iter(|| spgemm_parallel(black_box(&a), black_box(&b), &config))
        });

        group.bench_with_input(BenchmarkId::new("worker_pool", n), &n, |bench, _| {
            bench.iter(|| spgemm_distributed(black_box(&a), black_box(&b), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_accumulators, bench_variants);
criterion_main!(benches);
