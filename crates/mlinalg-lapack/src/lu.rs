//! LU factorization with partial pivoting and the solvers built on it.
//!
//! Two blocked drivers produce the same factorization `P * A = L * U`:
//! - [`getrf`] updates the trailing matrix with [`mlinalg_blas::gemm`] on
//!   extracted sub-blocks.
//! - [`getrf_blocked`] updates it in place with [`gemm_blocked`] and reports
//!   the first singular column through `info`.
//!
//! Singular pivots never abort a factorization: the column is left without
//! multipliers and the driver moves on, the way LAPACK's `xGETRF` does.

use log::debug;
use mlinalg_blas::gemm_with;
use mlinalg_core::{default_block_size, GemmOptions, KernelError, Matrix, Result, Scalar};

use crate::triangular::trsm_left_lower_unit;

/// Swap count and first singular column (1-based, 0 if none) of a panel sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelStatus {
    pub swaps: usize,
    pub info: usize,
}

/// Pivot data of an in-place LU factorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LuPivots {
    /// `piv[k]` is the (0-based) row swapped with row `k` at step `k`
    pub piv: Vec<usize>,
    /// Number of actual row interchanges
    pub swaps: usize,
    /// First column with an exactly zero pivot, 1-based; 0 if nonsingular
    pub info: usize,
}

impl LuPivots {
    /// Whether a zero pivot was met.
    pub fn is_singular(&self) -> bool {
        self.info != 0
    }
}

/// Driver used by [`lu_factor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LuStrategy {
    /// [`getrf`]: trailing update through `gemm`
    Gemm,
    /// [`getrf_blocked`]: in-place hand-blocked trailing update
    #[default]
    Blocked,
}

/// Unblocked partial-pivoting LU of the panel `a[k.., k..k+panel_width]`.
///
/// Rows are swapped across all columns. Returns the number of swaps.
pub fn getf2<T: Scalar>(
    a: &mut Matrix<T>,
    k: usize,
    panel_width: usize,
    piv: &mut [usize],
) -> usize {
    let mut status = PanelStatus::default();
    getf2_unblocked(a, k, panel_width, piv, &mut status);
    status.swaps
}

/// [`getf2`] that also records the first singular column in `status.info`.
///
/// `status` accumulates across calls, so a driver can thread one value
/// through every panel.
pub fn getf2_unblocked<T: Scalar>(
    a: &mut Matrix<T>,
    k: usize,
    panel_width: usize,
    piv: &mut [usize],
    status: &mut PanelStatus,
) {
    let (m, n) = (a.nrows(), a.ncols());
    let panel_end = (k + panel_width).min(n);

    for i in k..panel_end.min(m) {
        let mut p = i;
        let mut best = a[[i, i]].abs_val();
        for r in (i + 1)..m {
            let v = a[[r, i]].abs_val();
            if v > best {
                best = v;
                p = r;
            }
        }
        piv[i] = p;
        if p != i {
            a.swap_rows(i, p);
            status.swaps += 1;
        }

        let pivot = a[[i, i]];
        if pivot.abs_val() == 0.0 {
            if status.info == 0 {
                status.info = i + 1;
                debug!("getf2: zero pivot in column {}", i + 1);
            }
            continue;
        }

        for r in (i + 1)..m {
            let l = a[[r, i]].rdiv(pivot);
            a[[r, i]] = l;
            if l == T::zero() {
                continue;
            }
            for j in (i + 1)..panel_end {
                let u = a[[i, j]];
                let cell = &mut a[[r, j]];
                *cell = *cell - l * u;
            }
        }
    }
}

fn first_zero_diagonal<T: Scalar>(a: &Matrix<T>) -> usize {
    let mn = a.nrows().min(a.ncols());
    (0..mn)
        .find(|&i| a[[i, i]].abs_val() == 0.0)
        .map_or(0, |i| i + 1)
}

/// Blocked LU using `gemm` for the trailing update, with the default block configuration.
///
/// # Errors
/// Propagates errors from the trailing `gemm` call.
pub fn getrf<T: Scalar>(a: &mut Matrix<T>) -> Result<LuPivots> {
    getrf_with(a, &GemmOptions::default())
}

/// [`getrf`] with a per-call block size and GEMM cutoff.
///
/// # Errors
/// Returns `InvalidBlockSize` for a zero block size in `opts`.
pub fn getrf_with<T: Scalar>(a: &mut Matrix<T>, opts: &GemmOptions) -> Result<LuPivots> {
    let cfg = opts.resolve()?;
    let (m, n) = (a.nrows(), a.ncols());
    let mn = m.min(n);
    let mut piv = vec![0; mn];
    let mut swaps = 0;

    for k in (0..mn).step_by(cfg.block_size) {
        let kb = cfg.block_size.min(mn - k);
        swaps += getf2(a, k, kb, &mut piv);

        let next = k + kb;
        if next < n {
            trsm_left_lower_unit(a, k, kb);
        }
        if next < m && next < n {
            let a21 = a.submatrix(next, m, k, next);
            let a12 = a.submatrix(k, next, next, n);
            let mut a22 = a.submatrix(next, m, next, n);
            gemm_with(
                -T::one(),
                &a21,
                m - next,
                kb,
                &a12,
                n - next,
                T::one(),
                &mut a22,
                opts,
            )?;
            a.set_submatrix(next, next, &a22);
        }
    }
    a.set_type();

    let info = first_zero_diagonal(a);
    if info != 0 {
        debug!("getrf: zero pivot in column {info}");
    }
    Ok(LuPivots { piv, swaps, info })
}

/// `a[i, j] -= Σ_l a[i, l] * a[l, j]` over the trailing block after the panel `k..k+kb`.
///
/// Cells are visited in `block_size x block_size` tiles; each cell takes the
/// full `l` sum over the panel at once.
pub fn gemm_blocked<T: Scalar>(a: &mut Matrix<T>, k: usize, kb: usize, block_size: usize) {
    let (m, n) = (a.nrows(), a.ncols());
    let start = k + kb;
    let bs = block_size.max(1);

    for ii in (start..m).step_by(bs) {
        let i_max = (ii + bs).min(m);
        for jj in (start..n).step_by(bs) {
            let j_max = (jj + bs).min(n);
            for i in ii..i_max {
                for j in jj..j_max {
                    let mut sum = T::zero();
                    for l in k..start {
                        T::mul_and_sum_to(&mut sum, a[[i, l]], a[[l, j]]);
                    }
                    let cell = &mut a[[i, j]];
                    *cell = *cell - sum;
                }
            }
        }
    }
}

/// Blocked LU with an in-place trailing update, using the default block size.
pub fn getrf_blocked<T: Scalar>(a: &mut Matrix<T>) -> LuPivots {
    blocked_driver(a, default_block_size())
}

/// [`getrf_blocked`] with a per-call block size.
///
/// # Errors
/// Returns `InvalidBlockSize` for a zero block size in `opts`.
pub fn getrf_blocked_with<T: Scalar>(a: &mut Matrix<T>, opts: &GemmOptions) -> Result<LuPivots> {
    let cfg = opts.resolve()?;
    Ok(blocked_driver(a, cfg.block_size))
}

fn blocked_driver<T: Scalar>(a: &mut Matrix<T>, block_size: usize) -> LuPivots {
    let (m, n) = (a.nrows(), a.ncols());
    let mn = m.min(n);
    let bs = block_size.max(1);
    let mut piv = vec![0; mn];
    let mut status = PanelStatus::default();

    for k in (0..mn).step_by(bs) {
        let kb = bs.min(mn - k);
        getf2_unblocked(a, k, kb, &mut piv, &mut status);
        if k + kb < n {
            trsm_left_lower_unit(a, k, kb);
            gemm_blocked(a, k, kb, bs);
        }
    }
    a.set_type();
    LuPivots {
        piv,
        swaps: status.swaps,
        info: status.info,
    }
}

/// Factor `a` in place with the chosen driver.
///
/// # Errors
/// Propagates errors from the selected driver.
pub fn lu_factor<T: Scalar>(a: &mut Matrix<T>, strategy: LuStrategy) -> Result<LuPivots> {
    match strategy {
        LuStrategy::Gemm => getrf(a),
        LuStrategy::Blocked => Ok(getrf_blocked(a)),
    }
}

fn check_square<T: Scalar>(routine: &'static str, a: &Matrix<T>) -> Result<usize> {
    let n = a.nrows();
    if a.ncols() != n || a.page_count() != 1 {
        return Err(KernelError::DimensionMismatch {
            routine,
            expected: (n, n),
            actual: (a.physical_rows(), a.ncols()),
        });
    }
    Ok(n)
}

/// Solve `A * X = B` from the factors of `A`, leaving `b` untouched.
///
/// A zero on the diagonal of `U` propagates `Inf`/`NaN` into `X`.
///
/// # Errors
/// Returns `DimensionMismatch` if `lu` is not square or `b` has the wrong
/// row count, `LengthMismatch` for a short `piv`, and `IndexOutOfBounds`
/// for a pivot outside the matrix.
pub fn getrs<T: Scalar>(lu: &Matrix<T>, piv: &[usize], b: &Matrix<T>) -> Result<Matrix<T>> {
    let n = check_square("getrs", lu)?;
    if b.physical_rows() != n {
        return Err(KernelError::DimensionMismatch {
            routine: "getrs",
            expected: (n, b.ncols()),
            actual: (b.physical_rows(), b.ncols()),
        });
    }
    if piv.len() != n {
        return Err(KernelError::LengthMismatch {
            routine: "getrs",
            expected: n,
            actual: piv.len(),
        });
    }

    let mut x = b.copy();
    let nrhs = x.ncols();
    for (i, &p) in piv.iter().enumerate() {
        if p >= n {
            return Err(KernelError::IndexOutOfBounds {
                routine: "getrs",
                index: p,
                bound: n,
            });
        }
        x.swap_rows(i, p);
    }

    // L y = P b
    for i in 0..n {
        for l in 0..i {
            let lil = lu[[i, l]];
            if lil == T::zero() {
                continue;
            }
            for j in 0..nrhs {
                let y = x[[l, j]];
                x[[i, j]] = x[[i, j]] - lil * y;
            }
        }
    }

    // U x = y
    for i in (0..n).rev() {
        for l in (i + 1)..n {
            let uil = lu[[i, l]];
            if uil == T::zero() {
                continue;
            }
            for j in 0..nrhs {
                let y = x[[l, j]];
                x[[i, j]] = x[[i, j]] - uil * y;
            }
        }
        let d = lu[[i, i]];
        for j in 0..nrhs {
            x[[i, j]] = x[[i, j]].rdiv(d);
        }
    }
    x.set_type();
    Ok(x)
}

/// Split packed factors into `(L, U, P)` with `P * A = L * U`.
///
/// For an `m x n` factorization `L` is `m x min(m, n)` unit lower, `U` is
/// `min(m, n) x n` upper and `P` is `m x m`.
pub fn lu_unpack<T: Scalar>(lu: &Matrix<T>, piv: &[usize]) -> (Matrix<T>, Matrix<T>, Matrix<T>) {
    let (m, n) = (lu.nrows(), lu.ncols());
    let mn = m.min(n);

    let mut l = Matrix::zeros(m, mn);
    let mut u = Matrix::zeros(mn, n);
    for i in 0..m {
        for j in 0..mn.min(i) {
            l[[i, j]] = lu[[i, j]];
        }
        if i < mn {
            l[[i, i]] = T::one();
            for j in i..n {
                u[[i, j]] = lu[[i, j]];
            }
        }
    }

    let mut perm: Vec<usize> = (0..m).collect();
    for (i, &p) in piv.iter().enumerate() {
        perm.swap(i, p);
    }
    let mut p = Matrix::zeros(m, m);
    for (i, &src) in perm.iter().enumerate() {
        p[[i, src]] = T::one();
    }

    l.set_type();
    u.set_type();
    (l, u, p)
}

/// Determinant from the blocked LU of a copy of `a`.
///
/// # Errors
/// Returns `DimensionMismatch` if `a` is not square.
pub fn det<T: Scalar>(a: &Matrix<T>) -> Result<T> {
    let n = check_square("det", a)?;
    let mut lu = a.copy();
    let pivots = getrf_blocked(&mut lu);
    let mut d = T::one();
    for i in 0..n {
        d = d * lu[[i, i]];
    }
    if pivots.swaps % 2 == 1 {
        d = -d;
    }
    Ok(d)
}

/// Solve `A * X = B` for square `A`, leaving both inputs untouched.
///
/// # Errors
/// Returns `DimensionMismatch` if `a` is not square or `b` does not have
/// as many rows as `a`.
pub fn gesv<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    check_square("gesv", a)?;
    let mut lu = a.copy();
    let pivots = getrf_blocked(&mut lu);
    getrs(&lu, &pivots.piv, b)
}

/// Inverse of a square matrix via [`gesv`] against the identity.
///
/// # Errors
/// Returns `DimensionMismatch` if `a` is not square.
pub fn inv<T: Scalar>(a: &Matrix<T>) -> Result<Matrix<T>> {
    let n = check_square("inv", a)?;
    gesv(a, &Matrix::identity(n))
}
