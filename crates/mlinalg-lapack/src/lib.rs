//! LAPACK-style factorizations for the mlinalg workspace
//!
//! This crate provides:
//! - [`permute`]: row interchanges (`laswp`), identity and permutation matrices
//! - [`norm`]: column 2-norms
//! - [`triangular`]: `triu`/`tril` and triangular solves on panel blocks
//! - [`householder`]: reflector generation and application, page-aware variants
//! - [`qr`]: `geqr2`, `geqp2`, `geqp3` and explicit `Q` via `orgqr`
//! - [`lu`]: `getf2`, the `getrf` drivers, `getrs` and the solvers built on them
//!
//! Routines that overwrite their input (`geqp2`, the `getrf` family) take
//! `&mut Matrix`; those that work on a copy (`geqr2`, `geqp3`, `getrs`) take
//! `&Matrix` and return the factors.
//!
//! # Example
//!
//! ```
//! use mlinalg_core::Matrix;
//! use mlinalg_lapack::{det, geqr2, orgqr};
//!
//! let a: Matrix<f64> = Matrix::from_vec2d(vec![
//!     vec![2.0, 1.0, -3.0],
//!     vec![3.0, 2.0, 4.0],
//!     vec![2.0, 5.0, -2.0],
//! ]);
//! assert!((det(&a).unwrap() + 67.0).abs() < 1e-12);
//!
//! let qr = geqr2(&a);
//! let q = orgqr(&qr.r, &qr.taus);
//! let back = mlinalg_core::mat_mul(&q, &qr.upper());
//! assert!(back.max_abs_diff(&a) < 1e-12);
//! ```

pub mod householder;
pub mod lu;
pub mod norm;
pub mod permute;
pub mod qr;
pub mod triangular;

pub use householder::{
    larf, larf_left, larf_left_block, larf_left_nd, larf_nd, larf_right, larf_right_nd, larfg,
    larfg_apply, larfg_left, larfg_left_nd, larfg_nd, larfg_right, larfg_right_nd, Reflector,
    Side,
};
pub use lu::{
    det, gemm_blocked, gesv, getf2, getf2_unblocked, getrf, getrf_blocked, getrf_blocked_with,
    getrf_with, getrs, inv, lu_factor, lu_unpack, LuPivots, LuStrategy, PanelStatus,
};
pub use norm::{nrm2, nrm2sq};
pub use permute::{eye, lapmt_matrix, laswp, laswp_cols, laswp_rows};
pub use qr::{geqp2, geqp3, geqr2, orgqr, PivotedQr, QrFactors, QrPivots};
pub use triangular::{tril_inplace, triu_inplace, trsm_left_lower_unit, trsm_left_upper};
