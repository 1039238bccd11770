//! Householder reflector generation and application.
//!
//! A reflector is `H = I - tau * v * v^H` with `v[0] == 1`. Generation follows
//! the ZLARFG convention:
//!
//! ```text
//! phi   = x0 / |x0|          (1 when x0 == 0)
//! alpha = -phi * ||x||
//! tau   = (alpha - x0) / alpha
//! v[i]  = x[i] / (x0 - alpha)   for i > 0
//! ```
//!
//! `tau` is real and lies in `[1, 2]`, so `H` is Hermitian and unitary. When
//! the tail of `x` is already zero, or `x` has a single entry, the reflector is
//! the identity: `tau == 0`, `v == e1`, `alpha == x0`, and every application
//! routine returns without touching its target.
//!
//! The `*_nd` variants generate from page 0 and apply the same reflector to
//! each page of a paged [`Matrix`] independently.

use mlinalg_blas::{dotc_col_range, dotc_row_range};
use mlinalg_core::{Matrix, PageView, Scalar};

/// Which side a reflector acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// `A := H * A`, annihilating a column tail.
    Left,
    /// `A := A * H`, annihilating a row tail.
    Right,
}

/// A generated Householder reflector.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflector<T> {
    /// Scalar factor; zero means `H == I`
    pub tau: T,
    /// Householder vector with `v[0] == 1`
    pub v: Vec<T>,
    /// Value left in the pivot position after the reflection
    pub alpha: T,
    /// Unit-modulus phase of the original pivot entry
    pub phi: T,
}

impl<T: Scalar> Reflector<T> {
    /// The identity reflector on a segment of length `len`, keeping `x0` in place.
    pub fn identity(len: usize, x0: T) -> Self {
        let mut v = vec![T::zero(); len.max(1)];
        v[0] = T::one();
        Self {
            tau: T::zero(),
            v,
            alpha: x0,
            phi: T::one(),
        }
    }

    /// Whether applying this reflector is a no-op.
    pub fn is_identity(&self) -> bool {
        self.tau == T::zero()
    }

    /// Build the reflector for `x` with `x0 = x[0]` and `sigma = Σ_{i>0} |x_i|^2`.
    fn from_segment(x0: T, sigma: T, tail: impl ExactSizeIterator<Item = T>) -> Self {
        let len = tail.len() + 1;
        if len == 1 || sigma == T::zero() {
            return Self::identity(len, x0);
        }
        let abs_x0 = x0.abs();
        let norm = (abs_x0 * abs_x0 + sigma).sqrt();
        let phi = if x0 == T::zero() {
            T::one()
        } else {
            x0.rdiv(abs_x0)
        };
        let alpha = -(phi * norm);
        let tau = (alpha - x0).rdiv(alpha);
        let denom = x0 - alpha;

        let mut v = Vec::with_capacity(len);
        v.push(T::one());
        v.extend(tail.map(|xi| xi.rdiv(denom)));
        Self { tau, v, alpha, phi }
    }
}

/// Reflector annihilating `a[k+1..m, k]`.
pub fn larfg_left<T: Scalar>(a: &Matrix<T>, m: usize, k: usize) -> Reflector<T> {
    let sigma = dotc_col_range(a, k, k, m);
    Reflector::from_segment(a[[k, k]], sigma, ((k + 1)..m).map(|i| a[[i, k]]))
}

/// Reflector annihilating `a[k, k+1..n]` from the right.
///
/// The reflector is generated for the conjugated row, so `row * H` leaves
/// `alpha` in position `k` and zeros after it.
pub fn larfg_right<T: Scalar>(a: &Matrix<T>, n: usize, k: usize) -> Reflector<T> {
    let sigma = dotc_row_range(a, k, k, n);
    let row = a.row(k);
    let mut refl = Reflector::from_segment(
        row[k].conj(),
        sigma,
        row[(k + 1)..n].iter().map(|x| x.conj()),
    );
    refl.alpha = refl.alpha.conj();
    refl
}

/// Dispatch to [`larfg_left`] or [`larfg_right`]; `extent` is `m` or `n` accordingly.
pub fn larfg<T: Scalar>(side: Side, a: &Matrix<T>, extent: usize, k: usize) -> Reflector<T> {
    match side {
        Side::Left => larfg_left(a, extent, k),
        Side::Right => larfg_right(a, extent, k),
    }
}

/// Generate the reflector for column (`Left`) or row (`Right`) `k` of page 0 and apply it.
///
/// The pivot entry receives `alpha`, the annihilated tail is written as exact
/// zeros and the rest of the trailing block is transformed. Nothing is touched
/// when `tau == 0`.
pub fn larfg_apply<T: Scalar>(side: Side, a: &mut Matrix<T>, k: usize) -> Reflector<T> {
    match side {
        Side::Left => {
            let m = a.nrows();
            let refl = larfg_left(a, m, k);
            if !refl.is_identity() {
                a[[k, k]] = refl.alpha;
                for i in (k + 1)..m {
                    a[[i, k]] = T::zero();
                }
                larf_left(a, &refl.v, refl.tau, k, k + 1);
            }
            refl
        }
        Side::Right => {
            let n = a.ncols();
            let refl = larfg_right(a, n, k);
            if !refl.is_identity() {
                let row = a.row_mut(k);
                row[k] = refl.alpha;
                row[(k + 1)..].fill(T::zero());
                larf_right(a, &refl.v, refl.tau, k + 1, k);
            }
            refl
        }
    }
}

/// `A := H * A` on rows `[row_start, row_start + v.len())` and columns `>= col_start`.
pub fn larf_left<T: Scalar>(
    a: &mut Matrix<T>,
    v: &[T],
    tau: T,
    row_start: usize,
    col_start: usize,
) {
    let n = a.ncols();
    larf_left_block(a, v, tau, row_start, col_start, n);
}

/// [`larf_left`] restricted to columns `[col_start, col_end)`, clamped to the matrix.
pub fn larf_left_block<T: Scalar>(
    a: &mut Matrix<T>,
    v: &[T],
    tau: T,
    row_start: usize,
    col_start: usize,
    col_end: usize,
) {
    if tau == T::zero() {
        return;
    }
    let col_end = col_end.min(a.ncols());
    for j in col_start.min(col_end)..col_end {
        let mut dot = T::zero();
        for (i, &vi) in v.iter().enumerate() {
            T::mul_and_sum_to(&mut dot, vi.conj(), a[[row_start + i, j]]);
        }
        let s = tau * dot;
        if s == T::zero() {
            continue;
        }
        for (i, &vi) in v.iter().enumerate() {
            let cell = &mut a[[row_start + i, j]];
            *cell = *cell - vi * s;
        }
    }
}

/// `A := A * H` on physical rows `[row_start, row_end)` and on columns
/// `[col_start, col_start + v.len())`.
fn larf_right_rows<T: Scalar>(
    a: &mut Matrix<T>,
    v: &[T],
    tau: T,
    row_start: usize,
    row_end: usize,
    col_start: usize,
) {
    if tau == T::zero() {
        return;
    }
    for i in row_start..row_end {
        let row = &mut a.row_mut(i)[col_start..col_start + v.len()];
        let mut dot = T::zero();
        for (&aij, &vj) in row.iter().zip(v) {
            T::mul_and_sum_to(&mut dot, aij, vj);
        }
        let s = tau * dot;
        if s == T::zero() {
            continue;
        }
        for (aij, &vj) in row.iter_mut().zip(v) {
            *aij = *aij - s * vj.conj();
        }
    }
}

/// `A := A * H` on rows `row_start..` of page 0 and columns `[col_start, col_start + v.len())`.
pub fn larf_right<T: Scalar>(
    a: &mut Matrix<T>,
    v: &[T],
    tau: T,
    row_start: usize,
    col_start: usize,
) {
    let m = a.nrows();
    larf_right_rows(a, v, tau, row_start, m, col_start);
}

/// Dispatch to [`larf_left`] or [`larf_right`].
pub fn larf<T: Scalar>(
    side: Side,
    a: &mut Matrix<T>,
    v: &[T],
    tau: T,
    row_start: usize,
    col_start: usize,
) {
    match side {
        Side::Left => larf_left(a, v, tau, row_start, col_start),
        Side::Right => larf_right(a, v, tau, row_start, col_start),
    }
}

/// [`larf_left`] applied to every page, `row_start` counted within a page.
pub fn larf_left_nd<T: Scalar>(
    a: &mut Matrix<T>,
    v: &[T],
    tau: T,
    row_start: usize,
    col_start: usize,
) {
    let view = a.pages();
    for page in 0..view.page_count {
        larf_left(a, v, tau, view.physical_row(page, row_start), col_start);
    }
}

/// [`larf_right`] applied to every page, `row_start` counted within a page.
pub fn larf_right_nd<T: Scalar>(
    a: &mut Matrix<T>,
    v: &[T],
    tau: T,
    row_start: usize,
    col_start: usize,
) {
    let view = a.pages();
    for page in 0..view.page_count {
        let rows = view.page_rows(page);
        larf_right_rows(a, v, tau, rows.start + row_start, rows.end, col_start);
    }
}

/// Dispatch to [`larf_left_nd`] or [`larf_right_nd`].
pub fn larf_nd<T: Scalar>(
    side: Side,
    a: &mut Matrix<T>,
    v: &[T],
    tau: T,
    row_start: usize,
    col_start: usize,
) {
    match side {
        Side::Left => larf_left_nd(a, v, tau, row_start, col_start),
        Side::Right => larf_right_nd(a, v, tau, row_start, col_start),
    }
}

fn clamp_extent(view: &PageView, side: Side, extent: usize) -> usize {
    match side {
        Side::Left => extent.min(view.rows),
        Side::Right => extent.min(view.cols),
    }
}

/// Generate from column `k` of page 0 (rows `k..m`) and apply `H` to columns `>= k` of every page.
pub fn larfg_left_nd<T: Scalar>(a: &mut Matrix<T>, m: usize, k: usize) -> Reflector<T> {
    let m = clamp_extent(&a.pages(), Side::Left, m);
    let refl = larfg_left(a, m, k);
    larf_left_nd(a, &refl.v, refl.tau, k, k);
    refl
}

/// Generate from row `k` of page 0 (columns `k..n`) and apply `H` to rows `>= k` of every page.
pub fn larfg_right_nd<T: Scalar>(a: &mut Matrix<T>, n: usize, k: usize) -> Reflector<T> {
    let n = clamp_extent(&a.pages(), Side::Right, n);
    let refl = larfg_right(a, n, k);
    larf_right_nd(a, &refl.v, refl.tau, k, k);
    refl
}

/// Dispatch to [`larfg_left_nd`] or [`larfg_right_nd`].
pub fn larfg_nd<T: Scalar>(side: Side, a: &mut Matrix<T>, extent: usize, k: usize) -> Reflector<T> {
    match side {
        Side::Left => larfg_left_nd(a, extent, k),
        Side::Right => larfg_right_nd(a, extent, k),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlinalg_core::{scalar_tests, Complex64};

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_larfg_left_convention() {
        let a = Matrix::from_vec2d(vec![vec![c(3.0, 4.0)], vec![c(0.0, 0.0)], vec![c(12.0, 0.0)]]);
        let r = larfg_left(&a, 3, 0);
        // |x| = 13, phi = (3+4i)/5
        let phi = c(0.6, 0.8);
        assert!((r.phi - phi).norm() < 1e-14);
        assert!((r.alpha - phi * -13.0).norm() < 1e-12);
        assert!((r.tau - c(18.0 / 13.0, 0.0)).norm() < 1e-14);
        assert_eq!(r.v.len(), 3);
        assert_eq!(r.v[0], c(1.0, 0.0));
    }

    #[test]
    fn test_larfg_degenerate_cases() {
        let a = Matrix::from_vec2d(vec![vec![c(2.0, 1.0)], vec![c(0.0, 0.0)]]);
        let r = larfg_left(&a, 2, 0);
        assert!(r.is_identity());
        assert_eq!(r.v, vec![c(1.0, 0.0), c(0.0, 0.0)]);
        assert_eq!(r.alpha, c(2.0, 1.0));

        let r = larfg_left(&a, 1, 0);
        assert!(r.is_identity());
        assert_eq!(r.v.len(), 1);
    }

    fn check_left_annihilates<T: Scalar>() {
        let mut a = Matrix::from_vec2d(vec![
            vec![T::from_f64(1.0), T::from_f64(2.0)],
            vec![T::from_f64(-2.0), T::from_f64(0.5)],
            vec![T::from_f64(2.0), T::from_f64(4.0)],
        ]);
        let original = a.copy();
        let r = larfg_left(&a, 3, 0);
        larf_left(&mut a, &r.v, r.tau, 0, 0);
        assert!((a[[0, 0]] - r.alpha).abs_val() < 1e-12);
        assert!(a[[1, 0]].abs_val() < 1e-12);
        assert!(a[[2, 0]].abs_val() < 1e-12);
        // |alpha| == ||x||
        assert!((r.alpha.abs_val() - 3.0).abs() < 1e-12);
        // H is unitary: column norms are preserved
        assert!((a.norm_fro() - original.norm_fro()).abs() < 1e-12);
    }

    scalar_tests!(test_left_annihilates, check_left_annihilates);

    #[test]
    fn test_larfg_right_annihilates_row() {
        let mut a = Matrix::from_vec2d(vec![
            vec![c(1.0, 1.0), c(0.0, 2.0), c(-1.0, 0.5)],
            vec![c(2.0, 0.0), c(1.0, -1.0), c(0.0, 1.0)],
        ]);
        let r = larfg_right(&a, 3, 0);
        larf_right(&mut a, &r.v, r.tau, 0, 0);
        assert!((a[[0, 0]] - r.alpha).norm() < 1e-12);
        assert!(a[[0, 1]].norm() < 1e-12);
        assert!(a[[0, 2]].norm() < 1e-12);
    }

    #[test]
    fn test_larfg_apply_both_sides() {
        let base = Matrix::from_vec2d(vec![
            vec![c(1.0, 0.0), c(2.0, 1.0), c(0.0, 1.0)],
            vec![c(0.0, -1.0), c(3.0, 0.0), c(1.0, 1.0)],
            vec![c(4.0, 0.0), c(1.0, 0.0), c(2.0, -2.0)],
        ]);

        let mut a = base.copy();
        let r = larfg_apply(Side::Left, &mut a, 0);
        let mut expected = base.copy();
        larf(Side::Left, &mut expected, &r.v, r.tau, 0, 0);
        assert!(a.max_abs_diff(&expected) < 1e-12);
        assert_eq!(a[[1, 0]], c(0.0, 0.0));

        let mut a = base.copy();
        let r = larfg_apply(Side::Right, &mut a, 0);
        let mut expected = base.copy();
        larf(Side::Right, &mut expected, &r.v, r.tau, 0, 0);
        assert!(a.max_abs_diff(&expected) < 1e-12);
        assert_eq!(a[[0, 2]], c(0.0, 0.0));
    }

    #[test]
    fn test_larf_left_block_clamps_columns() {
        let mut a = Matrix::from_vec2d(vec![
            vec![c(1.0, 0.0), c(5.0, 0.0)],
            vec![c(1.0, 0.0), c(7.0, 0.0)],
        ]);
        let r = larfg_left(&a, 2, 0);
        let before = a.copy();
        larf_left_block(&mut a, &r.v, r.tau, 0, 1, 10);
        assert_eq!(a[[0, 0]], before[[0, 0]]);
        assert!((a[[0, 1]] - before[[0, 1]]).norm() > 1e-6);
    }

    #[test]
    fn test_nd_applies_page_zero_reflector_to_every_page() {
        let page = vec![
            vec![c(1.0, 0.0), c(2.0, 0.0)],
            vec![c(2.0, 1.0), c(0.0, 1.0)],
        ];
        let mut a = Matrix::from_pages(vec![page.clone(), page.clone()]).unwrap();
        let r = larfg_nd(Side::Left, &mut a, 2, 0);

        let mut single = Matrix::from_vec2d(page);
        larf_left(&mut single, &r.v, r.tau, 0, 0);
        let view = a.pages();
        for p in 0..view.page_count {
            for i in 0..2 {
                for j in 0..2 {
                    assert!((a[[view.physical_row(p, i), j]] - single[[i, j]]).norm() < 1e-12);
                }
            }
        }

        let mut b = Matrix::from_pages(vec![
            vec![vec![c(1.0, 0.0), c(1.0, 0.0)]],
            vec![vec![c(3.0, 0.0), c(-1.0, 0.0)]],
        ])
        .unwrap();
        let r = larfg_nd(Side::Right, &mut b, 2, 0);
        assert!((b[[0, 0]] - r.alpha).norm() < 1e-12);
        assert!(b[[0, 1]].norm() < 1e-12);
        // second page row sees the same H: [3, -1] * H
        let expected0 = c(3.0, 0.0) - r.tau * (c(3.0, 0.0) + c(-1.0, 0.0) * r.v[1]);
        assert!((b[[1, 0]] - expected0).norm() < 1e-12);
    }
}
