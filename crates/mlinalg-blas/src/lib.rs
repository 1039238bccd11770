//! BLAS-style kernels for the mlinalg workspace
//!
//! All routines are generic over [`mlinalg_core::Scalar`] and operate on
//! caller-owned [`mlinalg_core::Matrix`] values in place.
//!
//! - [`level1`]: column/row scaling and conjugated dot products
//! - [`level2`]: rank-1 updates and matrix-vector products
//! - [`level3`]: matrix-matrix multiply with naive/blocked dispatch
//!
//! # Example
//!
//! ```
//! use mlinalg_blas::gemm;
//! use mlinalg_core::Matrix;
//!
//! let a = Matrix::from_vec2d(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
//! let b = Matrix::<f64>::identity(2);
//! let mut c = Matrix::zeros(2, 2);
//! gemm(1.0, &a, 2, 2, &b, 2, 0.0, &mut c).unwrap();
//! assert_eq!(c, a);
//! ```
#![allow(clippy::too_many_arguments)]

pub mod level1;
pub mod level2;
pub mod level3;

pub use level1::{axpy, dotc, dotc_col, dotc_col_range, dotc_row, dotc_row_range, scal};
pub use level2::{gemv, ger, gerc, gerc_nd, gerc_nd_direct, geru};
pub use level3::{gemm, gemm_kernel, gemm_naive, gemm_with};
