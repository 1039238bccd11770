//! BLAS Level 2: matrix-vector operations.
//!
//! - `geru` / `gerc`: rank-1 updates from plain slices
//! - `gerc_nd` / `gerc_nd_direct`: rank-1 updates from vector-shaped `Matrix` operands
//! - `gemv`: `y := alpha*A*x + beta*y` on a sub-block
//! - `ger`: `A += alpha*x*y^H` with x and y read from columns of other matrices

use mlinalg_core::{KernelError, Matrix, Result, Scalar};

/// Unconjugated rank-1 update `C += x * y^T`.
///
/// `c` must have at least `x.len()` rows and `y.len()` columns; no other
/// validation is done and the numeric class of `c` is left untouched.
pub fn geru<T: Scalar>(x: &[T], y: &[T], c: &mut Matrix<T>) {
    for (i, &xi) in x.iter().enumerate() {
        let row = c.row_mut(i);
        for (cij, &yj) in row.iter_mut().zip(y.iter()) {
            T::mul_and_sum_to(cij, xi, yj);
        }
    }
}

/// Conjugated rank-1 update `C += x * y^H`, then refresh the class of `c`.
pub fn gerc<T: Scalar>(x: &[T], y: &[T], c: &mut Matrix<T>) {
    for (i, &xi) in x.iter().enumerate() {
        let row = c.row_mut(i);
        for (cij, &yj) in row.iter_mut().zip(y.iter()) {
            T::mul_and_sum_to(cij, xi, yj.conj());
        }
    }
    c.set_type();
}

fn check_rank1_operands<T: Scalar>(
    routine: &'static str,
    x: &Matrix<T>,
    y: &Matrix<T>,
    c: &Matrix<T>,
) -> Result<(usize, usize)> {
    if !x.is_vector() {
        return Err(KernelError::InvalidArgument {
            routine,
            message: format!("x must be a vector, got dimensions {:?}", x.dimension()),
        });
    }
    if !y.is_vector() {
        return Err(KernelError::InvalidArgument {
            routine,
            message: format!("y must be a vector, got dimensions {:?}", y.dimension()),
        });
    }
    if c.page_count() != 1 {
        return Err(KernelError::InvalidArgument {
            routine,
            message: format!("C must be 2-D, got dimensions {:?}", c.dimension()),
        });
    }
    let (m, n) = (x.numel(), y.numel());
    if c.nrows() != m || c.ncols() != n {
        return Err(KernelError::DimensionMismatch {
            routine,
            expected: (m, n),
            actual: (c.nrows(), c.ncols()),
        });
    }
    Ok((m, n))
}

/// `C += x * y^H` for vector-shaped operands of any layout.
///
/// `x` and `y` are read in linear (column-major, page by page) order and
/// gathered into temporaries before the update.
///
/// # Errors
/// Returns `DimensionMismatch` if `c` is not `numel(x) x numel(y)`, and
/// `InvalidArgument` if an operand is not a vector or `c` has pages.
pub fn gerc_nd<T: Scalar>(x: &Matrix<T>, y: &Matrix<T>, c: &mut Matrix<T>) -> Result<()> {
    let (m, n) = check_rank1_operands("gerc_nd", x, y, c)?;
    let xs: Vec<T> = (0..m).map(|i| x.linear_get(i)).collect();
    let ys: Vec<T> = (0..n).map(|j| y.linear_get(j)).collect();
    gerc(&xs, &ys, c);
    Ok(())
}

/// Same as [`gerc_nd`] but reads `x` and `y` in place through linear addressing.
pub fn gerc_nd_direct<T: Scalar>(x: &Matrix<T>, y: &Matrix<T>, c: &mut Matrix<T>) -> Result<()> {
    let (m, n) = check_rank1_operands("gerc_nd_direct", x, y, c)?;
    for i in 0..m {
        let xi = x.linear_get(i);
        for j in 0..n {
            T::mul_and_sum_to(&mut c[[i, j]], xi, y.linear_get(j).conj());
        }
    }
    c.set_type();
    Ok(())
}

/// `y[row_y..row_y+m] := alpha * A[row_a.., col_a..] * x[row_x..row_x+n] + beta * y[..]`.
///
/// `beta == 0` overwrites `y` (stale `NaN`/`Inf` are not propagated) and
/// `beta == 1` skips the scaling pass.
pub fn gemv<T: Scalar>(
    a: &Matrix<T>,
    m: usize,
    n: usize,
    row_a: usize,
    col_a: usize,
    x: &[T],
    row_x: usize,
    y: &mut [T],
    row_y: usize,
    alpha: T,
    beta: T,
) {
    let y = &mut y[row_y..row_y + m];
    if beta == T::zero() {
        y.fill(T::zero());
    } else if beta != T::one() {
        for yi in y.iter_mut() {
            *yi = beta * *yi;
        }
    }
    if alpha == T::zero() {
        return;
    }

    let x = &x[row_x..row_x + n];
    for (i, yi) in y.iter_mut().enumerate() {
        let a_row = &a.row(row_a + i)[col_a..col_a + n];
        let mut sum = T::zero();
        for (&aij, &xj) in a_row.iter().zip(x.iter()) {
            T::mul_and_sum_to(&mut sum, aij, xj);
        }
        T::mul_and_sum_to(yi, alpha, sum);
    }
}

/// Rank-1 update `A[start_row.., col_start..] += alpha * x * y^H` on an `m x n` block.
///
/// `x` is column `x_col` of `x_src` starting at row `x_row`, `y` is column
/// `y_col` of `y_src` starting at `y_row`. When a vector lives inside `a`
/// itself, pass a copy as the source.
pub fn ger<T: Scalar>(
    a: &mut Matrix<T>,
    start_row: usize,
    col_start: usize,
    m: usize,
    n: usize,
    alpha: T,
    x_src: &Matrix<T>,
    x_row: usize,
    x_col: usize,
    y_src: &Matrix<T>,
    y_row: usize,
    y_col: usize,
) {
    for j in 0..n {
        let t = alpha * y_src[[y_row + j, y_col]].conj();
        if t == T::zero() {
            continue;
        }
        for i in 0..m {
            T::mul_and_sum_to(&mut a[[start_row + i, col_start + j]], x_src[[x_row + i, x_col]], t);
        }
    }
}
