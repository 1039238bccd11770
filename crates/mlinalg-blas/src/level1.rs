//! BLAS Level 1: vector-vector operations.
//!
//! Column and row segments are addressed inside a [`Matrix`] by offsets, the
//! way the LAPACK routines consume them.

use mlinalg_core::{Matrix, Scalar};

/// Scale the column segment `a[start_row..end_row, col]` by `alpha` in place.
///
/// `alpha == 0` zero-fills the segment (so `NaN`/`Inf` entries do not survive)
/// and `alpha == 1` returns without touching it.
pub fn scal<T: Scalar>(alpha: T, a: &mut Matrix<T>, start_row: usize, end_row: usize, col: usize) {
    if alpha == T::one() {
        return;
    }
    if alpha == T::zero() {
        for i in start_row..end_row {
            a[[i, col]] = T::zero();
        }
        return;
    }
    for i in start_row..end_row {
        a[[i, col]] = alpha * a[[i, col]];
    }
}

/// `Σ conj(a[i, col]) * a[i, col]` for `i` in `(start_row, end_row)`.
///
/// The row `start_row` itself is excluded.
pub fn dotc_col_range<T: Scalar>(a: &Matrix<T>, col: usize, start_row: usize, end_row: usize) -> T {
    let mut acc = T::zero();
    for i in (start_row + 1)..end_row {
        let x = a[[i, col]];
        T::mul_and_sum_to(&mut acc, x.conj(), x);
    }
    acc
}

/// Hermitian self dot product of the tail of column `col` strictly below `start_row`
/// (page 0 extent).
pub fn dotc_col<T: Scalar>(a: &Matrix<T>, col: usize, start_row: usize) -> T {
    dotc_col_range(a, col, start_row, a.nrows())
}

/// `Σ conj(a[row, j]) * a[row, j]` for `j` in `(start_col, end_col)`.
pub fn dotc_row_range<T: Scalar>(a: &Matrix<T>, row: usize, start_col: usize, end_col: usize) -> T {
    let mut acc = T::zero();
    for &x in &a.row(row)[(start_col + 1).min(end_col)..end_col] {
        T::mul_and_sum_to(&mut acc, x.conj(), x);
    }
    acc
}

/// Hermitian self dot product of the tail of physical row `row` strictly right of `start_col`.
pub fn dotc_row<T: Scalar>(a: &Matrix<T>, row: usize, start_col: usize) -> T {
    dotc_row_range(a, row, start_col, a.ncols())
}

/// Conjugated dot product `x^H y` over the common length.
pub fn dotc<T: Scalar>(x: &[T], y: &[T]) -> T {
    let mut acc = T::zero();
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        T::mul_and_sum_to(&mut acc, xi.conj(), yi);
    }
    acc
}

/// `y := alpha * x + y` over the common length.
pub fn axpy<T: Scalar>(alpha: T, x: &[T], y: &mut [T]) {
    if alpha == T::zero() {
        return;
    }
    for (yi, &xi) in y.iter_mut().zip(x.iter()) {
        T::mul_and_sum_to(yi, alpha, xi);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlinalg_core::Complex64;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_scal_zero_clears_nan() {
        let mut a = Matrix::from_vec2d(vec![vec![f64::NAN], vec![2.0], vec![3.0]]);
        scal(0.0, &mut a, 0, 2, 0);
        assert_eq!(a[[0, 0]], 0.0);
        assert_eq!(a[[1, 0]], 0.0);
        assert_eq!(a[[2, 0]], 3.0);
    }

    #[test]
    fn test_scal_one_is_noop() {
        let mut a = Matrix::from_vec2d(vec![vec![f64::NAN], vec![2.0]]);
        scal(1.0, &mut a, 0, 2, 0);
        assert!(a[[0, 0]].is_nan());
        assert_eq!(a[[1, 0]], 2.0);
    }

    #[test]
    fn test_scal_complex() {
        let mut a = Matrix::from_vec2d(vec![
            vec![c(1.0, 1.0), c(5.0, 0.0)],
            vec![c(0.0, 2.0), c(6.0, 0.0)],
        ]);
        scal(c(0.0, 1.0), &mut a, 0, 2, 0);
        assert_eq!(a[[0, 0]], c(-1.0, 1.0));
        assert_eq!(a[[1, 0]], c(-2.0, 0.0));
        assert_eq!(a[[0, 1]], c(5.0, 0.0));
    }

    #[test]
    fn test_dotc_col_skips_start() {
        let a = Matrix::from_vec2d(vec![
            vec![c(100.0, 0.0)],
            vec![c(3.0, 4.0)],
            vec![c(0.0, 1.0)],
        ]);
        let s = dotc_col(&a, 0, 0);
        assert_eq!(s, c(26.0, 0.0));
    }

    #[test]
    fn test_dotc_row_skips_start() {
        let a = Matrix::from_vec2d(vec![vec![c(7.0, 0.0), c(1.0, -1.0), c(2.0, 0.0)]]);
        assert_eq!(dotc_row(&a, 0, 0), c(6.0, 0.0));
        assert_eq!(dotc_row(&a, 0, 2), c(0.0, 0.0));
    }

    #[test]
    fn test_dotc_and_axpy() {
        let x = [c(1.0, 1.0), c(0.0, 2.0)];
        let y = [c(2.0, 0.0), c(1.0, 0.0)];
        // conj(1+i)*2 + conj(2i)*1 = 2-2i - 2i
        assert_eq!(dotc(&x, &y), c(2.0, -4.0));

        let mut z = y;
        axpy(c(2.0, 0.0), &x, &mut z);
        assert_eq!(z, [c(4.0, 2.0), c(1.0, 4.0)]);
    }
}
