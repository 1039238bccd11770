use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use mlinalg_core::{GemmOptions, Matrix};
use mlinalg_lapack::{geqp3, getrf_blocked_with, getrf_with};
use num_complex::Complex64;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generate a random complex matrix
fn random_matrix(n: usize, m: usize, seed: u64) -> Matrix<Complex64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let data: Vec<Vec<Complex64>> = (0..n)
        .map(|_| {
            (0..m)
                .map(|_| Complex64::new(rng.random::<f64>(), rng.random::<f64>()))
                .collect()
        })
        .collect();
    Matrix::from_vec2d(data)
}

fn bench_lu(c: &mut Criterion) {
    let mut group = c.benchmark_group("lu_complex");

    for &size in &[32, 128, 256] {
        let a = random_matrix(size, size, 42);
        let opts = GemmOptions::blocked(64);

        group.bench_with_input(BenchmarkId::new("getrf", size), &a, |bench, a| {
            bench.iter_batched(
                || a.copy(),
                |mut lu| getrf_with(&mut lu, &opts).unwrap(),
                criterion::BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("getrf_blocked", size), &a, |bench, a| {
            bench.iter_batched(
                || a.copy(),
                |mut lu| getrf_blocked_with(&mut lu, &opts).unwrap(),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_pivoted_qr(c: &mut Criterion) {
    let mut group = c.benchmark_group("geqp3_complex");

    for &(m, n) in &[(64, 64), (200, 50), (128, 128)] {
        let a = random_matrix(m, n, 7);
        group.bench_with_input(BenchmarkId::new("geqp3", format!("{m}x{n}")), &a, |bench, a| {
            bench.iter(|| geqp3(a));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lu, bench_pivoted_qr);
criterion_main!(benches);
