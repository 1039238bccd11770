use approx::assert_abs_diff_eq;
use mlinalg_blas::{gemm, gemm_naive, gemm_with, gerc_nd, gerc_nd_direct};
use mlinalg_core::{GemmOptions, Matrix};
use num_complex::Complex64;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn random_complex(rng: &mut ChaCha8Rng) -> Complex64 {
    Complex64::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
}

fn random_matrix(m: usize, n: usize, rng: &mut ChaCha8Rng) -> Matrix<Complex64> {
    let rows = (0..m)
        .map(|_| (0..n).map(|_| random_complex(rng)).collect())
        .collect();
    Matrix::from_vec2d(rows)
}

#[test]
fn test_gemm_blocked_matches_naive_over_sizes() {
    let sizes = [1usize, 2, 5, 64, 65, 200];
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    // 7 divides none of the sizes
    let opts = GemmOptions::blocked(7);

    for &m in &sizes {
        for &k in &sizes {
            for &n in &sizes {
                let a = random_matrix(m, k, &mut rng);
                let b = random_matrix(k, n, &mut rng);
                let c0 = random_matrix(m, n, &mut rng);
                let alpha = random_complex(&mut rng);
                let beta = random_complex(&mut rng);

                let mut naive = c0.copy();
                gemm_naive(alpha, &a, m, k, &b, n, beta, &mut naive).unwrap();

                let mut blocked = c0.copy();
                gemm_with(alpha, &a, m, k, &b, n, beta, &mut blocked, &opts).unwrap();

                let tol = 1e-12 * (k as f64 + 1.0);
                assert_abs_diff_eq!(naive.max_abs_diff(&blocked), 0.0, epsilon = tol);
            }
        }
    }
}

#[test]
fn test_gemm_full_size_blocked_alpha_one() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let (m, k, n) = (200, 200, 200);
    let a = random_matrix(m, k, &mut rng);
    let b = random_matrix(k, n, &mut rng);
    let c0 = random_matrix(m, n, &mut rng);
    let one = Complex64::new(1.0, 0.0);

    let mut naive = c0.copy();
    gemm_naive(one, &a, m, k, &b, n, one, &mut naive).unwrap();

    let mut blocked = c0.copy();
    let opts = GemmOptions::blocked(48);
    gemm_with(one, &a, m, k, &b, n, one, &mut blocked, &opts).unwrap();

    assert_abs_diff_eq!(naive.max_abs_diff(&blocked), 0.0, epsilon = 1e-10);
}

#[test]
fn test_gemm_default_config_dispatches_by_volume() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    // 50^3 exceeds the default cutoff, 10^3 does not
    for n in [10usize, 50] {
        let a = random_matrix(n, n, &mut rng);
        let b = random_matrix(n, n, &mut rng);
        let (one, zero) = (Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0));
        let mut via_default = Matrix::zeros(n, n);
        gemm(one, &a, n, n, &b, n, zero, &mut via_default).unwrap();
        let reference = mlinalg_core::mat_mul(&a, &b);
        assert_abs_diff_eq!(via_default.max_abs_diff(&reference), 0.0, epsilon = 1e-11);
    }
}

#[test]
fn test_gerc_nd_matches_direct_on_random_vectors() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let xs: Vec<Complex64> = (0..6).map(|_| random_complex(&mut rng)).collect();
    let ys: Vec<Complex64> = (0..4).map(|_| random_complex(&mut rng)).collect();
    // x stored as a 1 x 6 row, y as a 1 x 1 x 4 paged vector
    let x = Matrix::from_row(&xs);
    let y = Matrix::from_flat(&[1, 1, 4], ys.clone()).unwrap();
    let c0 = random_matrix(6, 4, &mut rng);

    let mut c1 = c0.copy();
    let mut c2 = c0.copy();
    gerc_nd(&x, &y, &mut c1).unwrap();
    gerc_nd_direct(&x, &y, &mut c2).unwrap();
    assert_eq!(c1, c2);

    for i in 0..6 {
        for j in 0..4 {
            let expected = c0[[i, j]] + xs[i] * ys[j].conj();
            assert_abs_diff_eq!((c1[[i, j]] - expected).norm(), 0.0, epsilon = 1e-14);
        }
    }
}
