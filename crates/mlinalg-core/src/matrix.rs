//! Dense, row-major, paged N-dimensional matrix.
//!
//! Dimensions beyond the second are stacked as 2-D pages along the row axis:
//! logical element `(page, row, col)` lives at physical row `page * rows + row`.
//! Kernels that care about pages go through [`PageView`] explicitly.

use std::ops::{Index, IndexMut};

use crate::error::{KernelError, Result};
use crate::scalar::Scalar;

/// Numeric class of a matrix, refreshed with [`Matrix::set_type`] after in-place updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericClass {
    Real,
    Complex,
    Logical,
}

/// Page layout of a [`Matrix`] over its flat buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    /// Rows per page
    pub rows: usize,
    /// Columns (shared by every page)
    pub cols: usize,
    /// Number of stacked pages
    pub page_count: usize,
    /// Physical rows between the starts of consecutive pages
    pub page_stride: usize,
}

impl PageView {
    /// Physical row of `row` within `page`.
    #[inline]
    pub fn physical_row(&self, page: usize, row: usize) -> usize {
        page * self.page_stride + row
    }

    /// Physical row range `[start, end)` covered by `page`.
    #[inline]
    pub fn page_rows(&self, page: usize) -> std::ops::Range<usize> {
        let start = page * self.page_stride;
        start..start + self.rows
    }
}

/// Dense matrix of [`Scalar`] values with paged N-D layout
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    dimension: Vec<usize>,
    class: NumericClass,
}

fn normalize_dims(dims: &[usize]) -> Vec<usize> {
    let mut dimension = dims.to_vec();
    while dimension.len() < 2 {
        dimension.push(1);
    }
    dimension
}

impl<T: Scalar> Matrix<T> {
    /// Create a `rows x cols` matrix filled with `elem`.
    pub fn from_elem(rows: usize, cols: usize, elem: T) -> Self {
        let mut m = Self {
            data: vec![elem; rows * cols],
            dimension: vec![rows, cols],
            class: NumericClass::Real,
        };
        m.set_type();
        m
    }

    /// Create a zeros matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![T::zero(); rows * cols],
            dimension: vec![rows, cols],
            class: NumericClass::Real,
        }
    }

    /// Create a zeros array with the given dimension vector (`[rows, cols, pages...]`).
    pub fn zeros_nd(dims: &[usize]) -> Self {
        let dimension = normalize_dims(dims);
        let len: usize = dimension.iter().product();
        Self {
            data: vec![T::zero(); len],
            dimension,
            class: NumericClass::Real,
        }
    }

    /// Create an identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[[i, i]] = T::one();
        }
        m
    }

    /// Create a matrix from a 2D vector (row-major). Short rows are zero-padded.
    pub fn from_vec2d(rows: Vec<Vec<T>>) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut m = Self::zeros(nrows, ncols);
        for (i, row) in rows.into_iter().enumerate() {
            for (j, v) in row.into_iter().take(ncols).enumerate() {
                m[[i, j]] = v;
            }
        }
        m.set_type();
        m
    }

    /// Stack equally sized 2-D pages into a `rows x cols x pages` array.
    pub fn from_pages(pages: Vec<Vec<Vec<T>>>) -> Result<Self> {
        let page_count = pages.len();
        let rows = pages.first().map_or(0, Vec::len);
        let cols = pages
            .first()
            .and_then(|p| p.first())
            .map_or(0, Vec::len);
        let mut data = Vec::with_capacity(page_count * rows * cols);
        for page in pages {
            if page.len() != rows {
                return Err(KernelError::LengthMismatch {
                    routine: "Matrix::from_pages",
                    expected: rows,
                    actual: page.len(),
                });
            }
            for row in page {
                if row.len() != cols {
                    return Err(KernelError::LengthMismatch {
                        routine: "Matrix::from_pages",
                        expected: cols,
                        actual: row.len(),
                    });
                }
                data.extend(row);
            }
        }
        let mut m = Self {
            data,
            dimension: vec![rows, cols, page_count],
            class: NumericClass::Real,
        };
        m.set_type();
        Ok(m)
    }

    /// Wrap a flat row-major buffer (pages stacked along rows).
    pub fn from_flat(dims: &[usize], data: Vec<T>) -> Result<Self> {
        let dimension = normalize_dims(dims);
        let expected: usize = dimension.iter().product();
        if data.len() != expected {
            return Err(KernelError::LengthMismatch {
                routine: "Matrix::from_flat",
                expected,
                actual: data.len(),
            });
        }
        let mut m = Self {
            data,
            dimension,
            class: NumericClass::Real,
        };
        m.set_type();
        Ok(m)
    }

    /// `n x 1` column vector.
    pub fn from_column(values: &[T]) -> Self {
        let mut m = Self {
            data: values.to_vec(),
            dimension: vec![values.len(), 1],
            class: NumericClass::Real,
        };
        m.set_type();
        m
    }

    /// `1 x n` row vector.
    pub fn from_row(values: &[T]) -> Self {
        let mut m = Self {
            data: values.to_vec(),
            dimension: vec![1, values.len()],
            class: NumericClass::Real,
        };
        m.set_type();
        m
    }

    /// Explicit deep copy.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Full dimension vector `[rows, cols, pages...]`.
    pub fn dimension(&self) -> &[usize] {
        &self.dimension
    }

    /// Rows per page.
    pub fn nrows(&self) -> usize {
        self.dimension[0]
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.dimension[1]
    }

    /// Number of stacked 2-D pages (product of trailing dimensions).
    pub fn page_count(&self) -> usize {
        self.dimension[2..].iter().product()
    }

    /// Total number of physical rows across all pages.
    pub fn physical_rows(&self) -> usize {
        self.nrows() * self.page_count()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Whether at most one dimension exceeds one.
    pub fn is_vector(&self) -> bool {
        self.dimension.iter().filter(|&&d| d != 1).count() <= 1
    }

    /// Page layout of this matrix.
    pub fn pages(&self) -> PageView {
        PageView {
            rows: self.nrows(),
            cols: self.ncols(),
            page_count: self.page_count(),
            page_stride: self.nrows(),
        }
    }

    /// Current numeric class.
    pub fn class(&self) -> NumericClass {
        self.class
    }

    /// Mark the matrix as logical (0/1 valued) until the next content change.
    pub fn set_logical(&mut self) {
        self.class = NumericClass::Logical;
    }

    /// Refresh the numeric class from the current contents.
    ///
    /// A logical matrix stays logical while every entry is a real 0 or 1.
    pub fn set_type(&mut self) {
        let is_complex = self.data.iter().any(|v| !v.is_real());
        self.class = if is_complex {
            NumericClass::Complex
        } else if self.class == NumericClass::Logical
            && self.data.iter().all(|v| {
                let re = v.real_to_number();
                re == 0.0 || re == 1.0
            })
        {
            NumericClass::Logical
        } else {
            NumericClass::Real
        };
    }

    /// Physical row `r` as a slice.
    #[inline]
    pub fn row(&self, r: usize) -> &[T] {
        let n = self.ncols();
        &self.data[r * n..(r + 1) * n]
    }

    /// Physical row `r` as a mutable slice.
    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [T] {
        let n = self.ncols();
        &mut self.data[r * n..(r + 1) * n]
    }

    /// Column `c` of page 0 as an owned vector.
    pub fn column(&self, c: usize) -> Vec<T> {
        (0..self.nrows()).map(|r| self[[r, c]]).collect()
    }

    /// Flat row-major buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Flat row-major buffer, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Swap two physical rows over all columns.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.swap_rows_in(a, b, 0, self.ncols());
    }

    /// Swap two physical rows restricted to columns `[col_start, col_end)`.
    pub fn swap_rows_in(&mut self, a: usize, b: usize, col_start: usize, col_end: usize) {
        if a == b {
            return;
        }
        let n = self.ncols();
        for j in col_start..col_end.min(n) {
            self.data.swap(a * n + j, b * n + j);
        }
    }

    /// Swap two columns across every physical row.
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let n = self.ncols();
        for r in 0..self.physical_rows() {
            self.data.swap(r * n + a, r * n + b);
        }
    }

    /// Map a MATLAB linear index (column-major inside a page, then pages) to
    /// a physical `(row, col)` position.
    pub fn linear_to_physical(&self, idx: usize) -> (usize, usize) {
        let rows = self.nrows().max(1);
        let page_len = rows * self.ncols();
        let (page, within) = if page_len == 0 {
            (0, idx)
        } else {
            (idx / page_len, idx % page_len)
        };
        (page * rows + within % rows, within / rows)
    }

    /// Inverse of [`Matrix::linear_to_physical`].
    pub fn physical_to_linear(&self, row: usize, col: usize) -> usize {
        let rows = self.nrows().max(1);
        let page = row / rows;
        page * rows * self.ncols() + col * rows + row % rows
    }

    /// Element at a MATLAB linear index.
    #[inline]
    pub fn linear_get(&self, idx: usize) -> T {
        let (r, c) = self.linear_to_physical(idx);
        self[[r, c]]
    }

    /// Copy the physical block `[r0, r1) x [c0, c1)` into a new 2-D matrix.
    pub fn submatrix(&self, r0: usize, r1: usize, c0: usize, c1: usize) -> Self {
        let mut out = Self::zeros(r1 - r0, c1 - c0);
        for i in r0..r1 {
            out.row_mut(i - r0).copy_from_slice(&self.row(i)[c0..c1]);
        }
        out.class = self.class;
        out
    }

    /// Write `block` back at physical offset `(r0, c0)`.
    pub fn set_submatrix(&mut self, r0: usize, c0: usize, block: &Matrix<T>) {
        let bc = block.ncols();
        for i in 0..block.physical_rows() {
            self.row_mut(r0 + i)[c0..c0 + bc].copy_from_slice(block.row(i));
        }
    }

    /// Transpose of a 2-D matrix.
    pub fn transpose(&self) -> Self {
        let (m, n) = (self.nrows(), self.ncols());
        let mut out = Self::zeros(n, m);
        for i in 0..m {
            for j in 0..n {
                out[[j, i]] = self[[i, j]];
            }
        }
        out.class = self.class;
        out
    }

    /// Conjugate transpose of a 2-D matrix.
    pub fn conj_transpose(&self) -> Self {
        let (m, n) = (self.nrows(), self.ncols());
        let mut out = Self::zeros(n, m);
        for i in 0..m {
            for j in 0..n {
                out[[j, i]] = self[[i, j]].conj();
            }
        }
        out.set_type();
        out
    }

    /// Frobenius norm over every page.
    pub fn norm_fro(&self) -> f64 {
        self.data.iter().map(|v| v.abs_sq()).sum::<f64>().sqrt()
    }

    /// Largest absolute elementwise difference to `other` (same shape assumed).
    pub fn max_abs_diff(&self, other: &Matrix<T>) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| (a - b).abs_val())
            .fold(0.0, f64::max)
    }
}

impl<T> Index<[usize; 2]> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, idx: [usize; 2]) -> &Self::Output {
        &self.data[idx[0] * self.dimension[1] + idx[1]]
    }
}

impl<T> IndexMut<[usize; 2]> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, idx: [usize; 2]) -> &mut Self::Output {
        &mut self.data[idx[0] * self.dimension[1] + idx[1]]
    }
}

/// Reference product `A * B` of two 2-D matrices.
pub fn mat_mul<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let m = a.nrows();
    let k = a.ncols();
    let n = b.ncols();
    assert_eq!(b.nrows(), k);

    let mut result = Matrix::zeros(m, n);
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for l in 0..k {
                T::mul_and_sum_to(&mut sum, a[[i, l]], b[[l, j]]);
            }
            result[[i, j]] = sum;
        }
    }
    result.set_type();
    result
}
