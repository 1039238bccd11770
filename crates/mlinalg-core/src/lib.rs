//! Core types for the mlinalg dense linear-algebra kernels
//!
//! This crate provides the collaborators the BLAS and LAPACK crates are
//! written against:
//! - [`Scalar`]: the numeric contract (real or complex, native precision)
//! - [`Matrix`]: a dense row-major container whose trailing dimensions are
//!   stacked as pages along the row axis, with an explicit [`PageView`]
//! - [`KernelError`]: shape and argument contract violations
//! - Process-wide blocking defaults ([`BlockConfig`], [`GemmOptions`])
//!
//! # Example
//!
//! ```
//! use mlinalg_core::{Matrix, NumericClass};
//! use num_complex::Complex64;
//!
//! let mut m = Matrix::<Complex64>::zeros(2, 2);
//! m[[0, 1]] = Complex64::new(0.0, 1.0);
//! m.set_type();
//! assert_eq!(m.class(), NumericClass::Complex);
//! ```

pub mod error;
pub mod global_default;
pub mod matrix;
pub mod scalar;

pub use error::{KernelError, Result};
pub use global_default::{
    default_block_size, default_block_threshold, set_default_block_size,
    set_default_block_threshold, BlockConfig, GemmOptions, GlobalDefault,
    DEFAULT_BLOCK_SIZE, DEFAULT_BLOCK_THRESHOLD,
};
pub use matrix::{mat_mul, Matrix, NumericClass, PageView};
pub use num_complex::{Complex32, Complex64};
pub use scalar::Scalar;

#[doc(hidden)]
pub use paste;
