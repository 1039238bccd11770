//! Error types for the mlinalg kernels
//!
//! Only structural contract violations are errors. Numerical degeneracy
//! (zero pivots, zero Householder tails) is handled by the routines themselves.

use thiserror::Error;

/// Errors raised when a caller violates a kernel's shape or argument contract
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    /// Operand extents do not agree
    #[error(
        "{routine}: dimension mismatch: expected ({er}, {ec}), got ({ar}, {ac})",
        er = .expected.0,
        ec = .expected.1,
        ar = .actual.0,
        ac = .actual.1
    )]
    DimensionMismatch {
        routine: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Vector or pivot array has the wrong length
    #[error("{routine}: length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        routine: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Row, column or pivot index outside the operand
    #[error("{routine}: index {index} is out of bounds for extent {bound}")]
    IndexOutOfBounds {
        routine: &'static str,
        index: usize,
        bound: usize,
    },

    /// Invalid argument
    #[error("{routine}: {message}")]
    InvalidArgument {
        routine: &'static str,
        message: String,
    },

    /// Block size must be at least one
    #[error("Invalid block size: {0}. Block size must be at least 1.")]
    InvalidBlockSize(usize),
}

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, KernelError>;
