//! Triangular shaping and triangular solves on panel blocks.

use mlinalg_core::{Matrix, Scalar};

/// Zero the strict lower triangle of every page, then refresh the numeric class.
pub fn triu_inplace<T: Scalar>(a: &mut Matrix<T>) {
    let view = a.pages();
    for page in 0..view.page_count {
        for i in 0..view.rows {
            let row = a.row_mut(view.physical_row(page, i));
            let end = i.min(view.cols);
            row[..end].fill(T::zero());
        }
    }
    a.set_type();
}

/// Zero the strict upper triangle of every page, then refresh the numeric class.
pub fn tril_inplace<T: Scalar>(a: &mut Matrix<T>) {
    let view = a.pages();
    for page in 0..view.page_count {
        for i in 0..view.rows {
            let row = a.row_mut(view.physical_row(page, i));
            let start = (i + 1).min(view.cols);
            row[start..].fill(T::zero());
        }
    }
    a.set_type();
}

/// Solve `U * X = B` in place by back substitution.
///
/// `U` is the upper triangle (diagonal included) of `a[k..k+kb, k..k+kb]` and
/// `B` is the block `a[k..k+kb, k+kb..]` to its right. A zero on the diagonal
/// yields `Inf`/`NaN` in the affected entries.
pub fn trsm_left_upper<T: Scalar>(a: &mut Matrix<T>, k: usize, kb: usize) {
    let n = a.ncols();
    for j in (k + kb)..n {
        for i in (k..k + kb).rev() {
            let mut x = a[[i, j]];
            for l in (i + 1)..(k + kb) {
                x = x - a[[i, l]] * a[[l, j]];
            }
            a[[i, j]] = x.rdiv(a[[i, i]]);
        }
    }
}

/// Solve `L * X = B` in place by forward substitution.
///
/// `L` is the unit lower triangle of `a[k..k+kb, k..k+kb]` (its diagonal is
/// taken as one and never read) and `B` is `a[k..k+kb, k+kb..]`. This turns
/// `A12` into `U12` after a panel factorization.
pub fn trsm_left_lower_unit<T: Scalar>(a: &mut Matrix<T>, k: usize, kb: usize) {
    let n = a.ncols();
    for j in (k + kb)..n {
        for i in k..k + kb {
            let mut x = a[[i, j]];
            for l in k..i {
                x = x - a[[i, l]] * a[[l, j]];
            }
            a[[i, j]] = x;
        }
    }
}
