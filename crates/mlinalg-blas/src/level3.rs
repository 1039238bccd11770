//! BLAS Level 3: matrix-matrix multiply with naive/blocked dispatch.
//!
//! [`gemm`] picks between a plain triple loop and an `i/k/j` blocked loop
//! nest based on the `m * k * n` volume. The cutoff and block edge come from
//! [`mlinalg_core::BlockConfig`]; they change the cost, never the product.

use log::trace;
use mlinalg_core::{BlockConfig, GemmOptions, KernelError, Matrix, Result, Scalar};

/// Accumulate `A[ii..i_max, kk..k_max] * B[kk..k_max, jj..j_max]` into `r[ii..i_max, jj..j_max]`.
///
/// The target cells of `r` must already hold their starting values.
#[inline]
pub fn gemm_kernel<T: Scalar>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    r: &mut Matrix<T>,
    ii: usize,
    i_max: usize,
    jj: usize,
    j_max: usize,
    kk: usize,
    k_max: usize,
) {
    for i in ii..i_max {
        for l in kk..k_max {
            let ail = a[[i, l]];
            let b_row = &b.row(l)[jj..j_max];
            let r_row = &mut r.row_mut(i)[jj..j_max];
            for (rij, &blj) in r_row.iter_mut().zip(b_row.iter()) {
                T::mul_and_sum_to(rij, ail, blj);
            }
        }
    }
}

/// `C := alpha * A * B + beta * C` using the process-wide block configuration.
///
/// `a` is `m x k`, `b` is `k x n` and `c` is `m x n`.
///
/// # Errors
/// Returns `DimensionMismatch` if an operand does not have the declared shape.
pub fn gemm<T: Scalar>(
    alpha: T,
    a: &Matrix<T>,
    m: usize,
    k: usize,
    b: &Matrix<T>,
    n: usize,
    beta: T,
    c: &mut Matrix<T>,
) -> Result<()> {
    gemm_with(alpha, a, m, k, b, n, beta, c, &GemmOptions::default())
}

/// [`gemm`] forced onto the naive triple loop.
pub fn gemm_naive<T: Scalar>(
    alpha: T,
    a: &Matrix<T>,
    m: usize,
    k: usize,
    b: &Matrix<T>,
    n: usize,
    beta: T,
    c: &mut Matrix<T>,
) -> Result<()> {
    gemm_with(alpha, a, m, k, b, n, beta, c, &GemmOptions::naive())
}

fn check_shape<T: Scalar>(
    routine: &'static str,
    mat: &Matrix<T>,
    rows: usize,
    cols: usize,
) -> Result<()> {
    if mat.physical_rows() != rows || mat.ncols() != cols {
        return Err(KernelError::DimensionMismatch {
            routine,
            expected: (rows, cols),
            actual: (mat.physical_rows(), mat.ncols()),
        });
    }
    Ok(())
}

/// [`gemm`] with per-call overrides of the block size and naive/blocked cutoff.
///
/// # Errors
/// Returns `DimensionMismatch` on a shape mismatch and `InvalidBlockSize`
/// if `opts` carries a zero block size.
pub fn gemm_with<T: Scalar>(
    alpha: T,
    a: &Matrix<T>,
    m: usize,
    k: usize,
    b: &Matrix<T>,
    n: usize,
    beta: T,
    c: &mut Matrix<T>,
    opts: &GemmOptions,
) -> Result<()> {
    check_shape("gemm", a, m, k)?;
    check_shape("gemm", b, k, n)?;
    check_shape("gemm", c, m, n)?;
    let cfg = opts.resolve()?;

    if beta == T::zero() {
        c.as_mut_slice().fill(T::zero());
    } else if beta != T::one() {
        for v in c.as_mut_slice() {
            *v = beta * *v;
        }
    }

    if alpha != T::zero() && m > 0 && n > 0 && k > 0 {
        let volume = m.saturating_mul(k).saturating_mul(n);
        if volume <= cfg.block_threshold {
            trace!("gemm {m}x{k}x{n}: naive (volume {volume} <= {})", cfg.block_threshold);
            naive_product(alpha, a, b, c, m, k, n);
        } else {
            trace!(
                "gemm {m}x{k}x{n}: blocked (volume {volume} > {}), block size {}",
                cfg.block_threshold,
                cfg.block_size
            );
            blocked_product(alpha, a, b, c, m, k, n, cfg);
        }
    }

    c.set_type();
    Ok(())
}

fn naive_product<T: Scalar>(
    alpha: T,
    a: &Matrix<T>,
    b: &Matrix<T>,
    c: &mut Matrix<T>,
    m: usize,
    k: usize,
    n: usize,
) {
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for l in 0..k {
                T::mul_and_sum_to(&mut sum, a[[i, l]], b[[l, j]]);
            }
            T::mul_and_sum_to(&mut c[[i, j]], alpha, sum);
        }
    }
}

fn blocked_product<T: Scalar>(
    alpha: T,
    a: &Matrix<T>,
    b: &Matrix<T>,
    c: &mut Matrix<T>,
    m: usize,
    k: usize,
    n: usize,
    cfg: BlockConfig,
) {
    let bs = cfg.block_size;
    let run = |r: &mut Matrix<T>| {
        for ii in (0..m).step_by(bs) {
            let i_max = (ii + bs).min(m);
            for kk in (0..k).step_by(bs) {
                let k_max = (kk + bs).min(k);
                for jj in (0..n).step_by(bs) {
                    let j_max = (jj + bs).min(n);
                    gemm_kernel(a, b, r, ii, i_max, jj, j_max, kk, k_max);
                }
            }
        }
    };

    if alpha == T::one() {
        run(c);
        return;
    }
    let mut r = Matrix::zeros(m, n);
    run(&mut r);
    for (cij, &rij) in c.as_mut_slice().iter_mut().zip(r.as_slice()) {
        T::mul_and_sum_to(cij, alpha, rij);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlinalg_core::{mat_mul, Complex64, NumericClass};

    fn c64(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn sample(m: usize, n: usize, seed: f64) -> Matrix<Complex64> {
        let rows = (0..m)
            .map(|i| {
                (0..n)
                    .map(|j| c64((i as f64 + seed) * 0.5 - j as f64, (j as f64 * seed).sin()))
                    .collect()
            })
            .collect();
        Matrix::from_vec2d(rows)
    }

    #[test]
    fn test_gemm_matches_reference_product() {
        let a = sample(3, 4, 1.0);
        let b = sample(4, 2, 2.0);
        let mut c = Matrix::zeros(3, 2);
        gemm(c64(1.0, 0.0), &a, 3, 4, &b, 2, c64(0.0, 0.0), &mut c).unwrap();
        assert!(c.max_abs_diff(&mat_mul(&a, &b)) < 1e-12);
    }

    #[test]
    fn test_gemm_beta_zero_discards_nan() {
        let a = Matrix::from_vec2d(vec![vec![1.0, 2.0]]);
        let b = Matrix::from_vec2d(vec![vec![3.0], vec![4.0]]);
        let mut c = Matrix::from_vec2d(vec![vec![f64::NAN]]);
        gemm(1.0, &a, 1, 2, &b, 1, 0.0, &mut c).unwrap();
        assert_eq!(c[[0, 0]], 11.0);
    }

    #[test]
    fn test_gemm_alpha_zero_only_scales() {
        let a = Matrix::from_vec2d(vec![vec![f64::NAN]]);
        let b = Matrix::from_vec2d(vec![vec![1.0]]);
        let mut c = Matrix::from_vec2d(vec![vec![2.0]]);
        gemm(0.0, &a, 1, 1, &b, 1, 3.0, &mut c).unwrap();
        assert_eq!(c[[0, 0]], 6.0);
    }

    #[test]
    fn test_blocked_path_with_general_alpha_beta() {
        let a = sample(9, 7, 0.3);
        let b = sample(7, 11, 1.7);
        let c0 = sample(9, 11, 2.9);
        let alpha = c64(0.5, -1.25);
        let beta = c64(-2.0, 0.75);

        let mut naive = c0.copy();
        gemm_naive(alpha, &a, 9, 7, &b, 11, beta, &mut naive).unwrap();
        let mut blocked = c0.copy();
        let opts = GemmOptions::blocked(4);
        gemm_with(alpha, &a, 9, 7, &b, 11, beta, &mut blocked, &opts).unwrap();

        assert!(naive.max_abs_diff(&blocked) < 1e-10);
    }

    #[test]
    fn test_gemm_kernel_accumulates_one_block() {
        let a = Matrix::from_vec2d(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_vec2d(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        let mut r = Matrix::from_elem(2, 2, 10.0);
        // rows 1..2, cols 0..2, k 1..2
        gemm_kernel(&a, &b, &mut r, 1, 2, 0, 2, 1, 2);
        assert_eq!(r.as_slice(), &[10.0, 10.0, 10.0, 14.0]);
    }

    #[test]
    fn test_gemm_shape_mismatch() {
        let a = Matrix::<f64>::zeros(2, 3);
        let b = Matrix::<f64>::zeros(2, 2);
        let mut c = Matrix::<f64>::zeros(2, 2);
        let err = gemm(1.0, &a, 2, 3, &b, 2, 0.0, &mut c).unwrap_err();
        assert_eq!(
            err,
            KernelError::DimensionMismatch {
                routine: "gemm",
                expected: (3, 2),
                actual: (2, 2),
            }
        );
    }

    #[test]
    fn test_gemm_refreshes_class() {
        let a = Matrix::from_vec2d(vec![vec![c64(0.0, 1.0)]]);
        let b = Matrix::from_vec2d(vec![vec![c64(0.0, 1.0)]]);
        let mut c = Matrix::from_vec2d(vec![vec![c64(0.0, 5.0)]]);
        assert_eq!(c.class(), NumericClass::Complex);
        gemm(c64(1.0, 0.0), &a, 1, 1, &b, 1, c64(0.0, 0.0), &mut c).unwrap();
        assert_eq!(c[[0, 0]], c64(-1.0, 0.0));
        assert_eq!(c.class(), NumericClass::Real);
    }
}
