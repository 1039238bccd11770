//! Row and column interchanges, identity and permutation matrices.

use mlinalg_core::{KernelError, Matrix, Result, Scalar};

/// Apply the row interchanges `k1..=k2` (1-based) recorded in `ipiv` to every page of `a`.
///
/// `incx > 0` walks the rows forward, `incx < 0` backward, reading `ipiv`
/// with stride `|incx|` as LAPACK's `xLASWP` does. `ipiv` is treated as
/// 0-based when it contains a zero entry and as 1-based otherwise.
/// `col_range` restricts the swaps to columns `[start, end)`.
///
/// # Errors
/// Returns `InvalidArgument` for `k1 == 0` or `incx == 0`, and
/// `IndexOutOfBounds` when a row, pivot or column falls outside `a`.
pub fn laswp<T: Scalar>(
    a: &mut Matrix<T>,
    k1: usize,
    k2: usize,
    ipiv: &[usize],
    incx: isize,
    col_range: Option<(usize, usize)>,
) -> Result<()> {
    if k1 == 0 {
        return Err(KernelError::InvalidArgument {
            routine: "laswp",
            message: "k1 is 1-based and must be at least 1".to_string(),
        });
    }
    if incx == 0 {
        return Err(KernelError::InvalidArgument {
            routine: "laswp",
            message: "incx must be non-zero".to_string(),
        });
    }
    if k2 < k1 {
        return Ok(());
    }

    let view = a.pages();
    if k2 > view.rows {
        return Err(KernelError::IndexOutOfBounds {
            routine: "laswp",
            index: k2,
            bound: view.rows,
        });
    }
    let (col_start, col_end) = col_range.unwrap_or((0, view.cols));
    if col_start > col_end || col_end > view.cols {
        return Err(KernelError::IndexOutOfBounds {
            routine: "laswp",
            index: col_end.max(col_start),
            bound: view.cols,
        });
    }

    let step = incx.unsigned_abs();
    let count = k2 - k1 + 1;
    let last_ix = (k1 - 1) + (count - 1) * step;
    if last_ix >= ipiv.len() {
        return Err(KernelError::IndexOutOfBounds {
            routine: "laswp",
            index: last_ix,
            bound: ipiv.len(),
        });
    }
    let offset = usize::from(!ipiv.contains(&0));

    // (row, ipiv index) pairs in application order
    let steps: Vec<(usize, usize)> = if incx > 0 {
        (0..count).map(|s| (k1 - 1 + s, k1 - 1 + s * step)).collect()
    } else {
        (0..count)
            .map(|s| (k2 - 1 - s, last_ix - s * step))
            .collect()
    };

    for (row, ix) in steps {
        let target = ipiv[ix] - offset;
        if target >= view.rows {
            return Err(KernelError::IndexOutOfBounds {
                routine: "laswp",
                index: ipiv[ix],
                bound: view.rows,
            });
        }
        if target == row {
            continue;
        }
        for page in 0..view.page_count {
            a.swap_rows_in(
                view.physical_row(page, row),
                view.physical_row(page, target),
                col_start,
                col_end,
            );
        }
    }
    Ok(())
}

/// Swap rows `r1` and `r2` (0-based, within each page) on every page.
pub fn laswp_rows<T: Scalar>(a: &mut Matrix<T>, r1: usize, r2: usize) -> Result<()> {
    if r2 >= a.nrows() {
        return Err(KernelError::IndexOutOfBounds {
            routine: "laswp_rows",
            index: r2,
            bound: a.nrows(),
        });
    }
    // 1-based pivots with no zero entry, so the detection cannot misfire
    let mut ipiv: Vec<usize> = (1..=r1 + 1).collect();
    ipiv[r1] = r2 + 1;
    laswp(a, r1 + 1, r1 + 1, &ipiv, 1, None)
}

/// Swap columns `c1` and `c2` across every physical row.
pub fn laswp_cols<T: Scalar>(a: &mut Matrix<T>, c1: usize, c2: usize) -> Result<()> {
    let bound = a.ncols();
    for c in [c1, c2] {
        if c >= bound {
            return Err(KernelError::IndexOutOfBounds {
                routine: "laswp_cols",
                index: c,
                bound,
            });
        }
    }
    a.swap_cols(c1, c2);
    Ok(())
}

/// Identity array of shape `dims`: every page carries ones on its diagonal.
pub fn eye<T: Scalar>(dims: &[usize]) -> Matrix<T> {
    let mut out = Matrix::zeros_nd(dims);
    let view = out.pages();
    for page in 0..view.page_count {
        for i in 0..view.rows.min(view.cols) {
            out[[view.physical_row(page, i), i]] = T::one();
        }
    }
    out
}

/// Permutation matrix `P` with `A * P == A[:, jpvt]`.
///
/// # Errors
/// Returns `IndexOutOfBounds` if an entry of `jpvt` is not below `jpvt.len()`.
pub fn lapmt_matrix<T: Scalar>(jpvt: &[usize]) -> Result<Matrix<T>> {
    let n = jpvt.len();
    let mut p = Matrix::zeros(n, n);
    for (j, &src) in jpvt.iter().enumerate() {
        if src >= n {
            return Err(KernelError::IndexOutOfBounds {
                routine: "lapmt_matrix",
                index: src,
                bound: n,
            });
        }
        p[[src, j]] = T::one();
    }
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_3x2() -> Matrix<f64> {
        Matrix::from_vec2d(vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]])
    }

    #[test]
    fn test_laswp_forward_zero_based() {
        let mut a = rows_3x2();
        // swap 0<->2, then 1<->0
        laswp(&mut a, 1, 2, &[2, 0], 1, None).unwrap();
        assert_eq!(a.column(0), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_laswp_one_based_detection() {
        let mut a = rows_3x2();
        laswp(&mut a, 1, 2, &[3, 3], 1, None).unwrap();
        assert_eq!(a.column(0), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_laswp_backward_undoes_forward() {
        let mut a = rows_3x2();
        let ipiv = [2, 2, 2];
        laswp(&mut a, 1, 3, &ipiv, 1, None).unwrap();
        laswp(&mut a, 1, 3, &ipiv, -1, None).unwrap();
        assert_eq!(a, rows_3x2());
    }

    #[test]
    fn test_laswp_column_window_and_pages() {
        let mut a = Matrix::from_pages(vec![
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![vec![5.0, 6.0], vec![7.0, 8.0]],
        ])
        .unwrap();
        laswp(&mut a, 1, 1, &[1], 1, Some((1, 2))).unwrap();
        // pivot [1] has no zero, so it reads as 1-based: row 0 with itself
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        laswp(&mut a, 1, 1, &[2], 1, Some((1, 2))).unwrap();
        assert_eq!(a.as_slice(), &[1.0, 4.0, 3.0, 2.0, 5.0, 8.0, 7.0, 6.0]);
    }

    #[test]
    fn test_laswp_rejects_bad_arguments() {
        let mut a = rows_3x2();
        assert!(matches!(
            laswp(&mut a, 0, 1, &[0], 1, None),
            Err(KernelError::InvalidArgument { .. })
        ));
        assert!(laswp(&mut a, 1, 1, &[0], 0, None).is_err());
        assert!(laswp(&mut a, 1, 4, &[0, 0, 0, 0], 1, None).is_err());
        assert!(laswp(&mut a, 1, 1, &[5], 1, None).is_err());
        assert!(laswp(&mut a, 1, 1, &[0], 1, Some((1, 3))).is_err());
    }

    #[test]
    fn test_laswp_rows_and_cols() {
        let mut a = rows_3x2();
        laswp_rows(&mut a, 0, 1).unwrap();
        assert_eq!(a.column(0), vec![2.0, 1.0, 3.0]);

        laswp_cols(&mut a, 0, 1).unwrap();
        assert_eq!(a.row(0), &[20.0, 2.0]);
        assert!(laswp_cols(&mut a, 0, 2).is_err());
    }

    #[test]
    fn test_eye_pages() {
        let e = eye::<f64>(&[2, 3, 2]);
        assert_eq!(e.dimension(), &[2, 3, 2]);
        assert_eq!(
            e.as_slice(),
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_lapmt_matrix_permutes_columns() {
        let a = Matrix::from_vec2d(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let p = lapmt_matrix::<f64>(&[2, 0, 1]).unwrap();
        let ap = mlinalg_core::mat_mul(&a, &p);
        assert_eq!(ap.row(0), &[3.0, 1.0, 2.0]);
        assert_eq!(ap.row(1), &[6.0, 4.0, 5.0]);
        assert!(lapmt_matrix::<f64>(&[0, 3]).is_err());
    }
}
