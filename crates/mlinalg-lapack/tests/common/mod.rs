use mlinalg_core::Matrix;
use num_complex::Complex64;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn random_complex(rng: &mut ChaCha8Rng) -> Complex64 {
    Complex64::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0))
}

pub fn random_matrix(m: usize, n: usize, rng: &mut ChaCha8Rng) -> Matrix<Complex64> {
    let rows = (0..m)
        .map(|_| (0..n).map(|_| random_complex(rng)).collect())
        .collect();
    Matrix::from_vec2d(rows)
}

#[allow(dead_code)]
pub fn identity_error(q: &Matrix<Complex64>) -> f64 {
    let qhq = mlinalg_core::mat_mul(&q.conj_transpose(), q);
    qhq.max_abs_diff(&Matrix::identity(q.nrows()))
}
