//! Column 2-norms used by the pivoted QR drivers.

use mlinalg_core::{Matrix, Scalar};

/// `Σ |r[i, col]|^2` for `i` in `[start_row, m)`, as a real-valued scalar.
pub fn nrm2sq<T: Scalar>(r: &Matrix<T>, col: usize, start_row: usize, m: usize) -> T {
    let sum: f64 = (start_row..m).map(|i| r[[i, col]].abs_sq()).sum();
    T::from_f64(sum)
}

/// Euclidean norm of `r[start_row..m, col]`.
pub fn nrm2<T: Scalar>(r: &Matrix<T>, col: usize, start_row: usize, m: usize) -> T {
    nrm2sq(r, col, start_row, m).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlinalg_core::Complex64;

    #[test]
    fn test_nrm2_complex_column() {
        let r = Matrix::from_vec2d(vec![
            vec![Complex64::new(100.0, 0.0)],
            vec![Complex64::new(3.0, 4.0)],
            vec![Complex64::new(0.0, 12.0)],
        ]);
        assert_eq!(nrm2sq(&r, 0, 1, 3), Complex64::new(169.0, 0.0));
        assert_eq!(nrm2(&r, 0, 1, 3), Complex64::new(13.0, 0.0));
        assert_eq!(nrm2(&r, 0, 3, 3), Complex64::new(0.0, 0.0));
    }
}
