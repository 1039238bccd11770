//! Scalar contract shared by every kernel in the workspace.
//!
//! The BLAS and LAPACK routines are written against [`Scalar`] as a generic
//! parameter, so the real (`f64`, `f32`) and complex (`Complex64`, `Complex32`)
//! backends are monomorphized into the hot loops without dynamic dispatch.

use num_complex::{Complex, Complex32, Complex64};
use num_traits::{Float, One, Zero};
use std::fmt::Debug;

/// Element type of a [`Matrix`](crate::Matrix).
///
/// Values are `Copy`; every operation returns a new value and never mutates
/// its arguments, except [`Scalar::mul_and_sum_to`] which writes into the
/// accumulator it is explicitly handed.
pub trait Scalar:
    Clone
    + Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
    + std::ops::Neg<Output = Self>
    + Default
    + Send
    + Sync
    + 'static
{
    /// Complex conjugate of the value.
    fn conj(self) -> Self;

    /// Square of the absolute value (for complex numbers, |z|^2).
    fn abs_sq(self) -> f64;

    /// Absolute value as a real-valued `Self` (imaginary part zero).
    fn abs(self) -> Self;

    /// Absolute value as f64.
    fn abs_val(self) -> f64 {
        self.abs_sq().sqrt()
    }

    /// Principal square root.
    fn sqrt(self) -> Self;

    /// Division that follows IEEE semantics for a zero divisor.
    ///
    /// `x / 0` yields `±Inf` in every non-zero component of `x` and `0 / 0`
    /// yields `NaN`; it never panics.
    fn rdiv(self, rhs: Self) -> Self;

    /// Create from f64 value.
    fn from_f64(val: f64) -> Self;

    /// Real part as f64.
    fn real_to_number(self) -> f64;

    /// Imaginary part as f64 (zero for real types).
    fn imag_to_number(self) -> f64;

    /// Whether the imaginary part is exactly zero.
    fn is_real(self) -> bool {
        self.imag_to_number() == 0.0
    }

    /// Whether the real part is exactly zero.
    fn real_is_zero(self) -> bool {
        self.real_to_number() == 0.0
    }

    /// Check if value is NaN.
    fn is_nan(self) -> bool;

    /// Fused accumulate: `acc += a * b`.
    #[inline]
    fn mul_and_sum_to(acc: &mut Self, a: Self, b: Self) {
        *acc = *acc + a * b;
    }
}

impl Scalar for f64 {
    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self * self
    }

    #[inline]
    fn abs(self) -> Self {
        Float::abs(self)
    }

    #[inline]
    fn abs_val(self) -> f64 {
        Float::abs(self)
    }

    #[inline]
    fn sqrt(self) -> Self {
        Float::sqrt(self)
    }

    #[inline]
    fn rdiv(self, rhs: Self) -> Self {
        self / rhs
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val
    }

    #[inline]
    fn real_to_number(self) -> f64 {
        self
    }

    #[inline]
    fn imag_to_number(self) -> f64 {
        0.0
    }

    #[inline]
    fn is_nan(self) -> bool {
        Float::is_nan(self)
    }
}

impl Scalar for f32 {
    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        (self * self) as f64
    }

    #[inline]
    fn abs(self) -> Self {
        Float::abs(self)
    }

    #[inline]
    fn abs_val(self) -> f64 {
        Float::abs(self) as f64
    }

    #[inline]
    fn sqrt(self) -> Self {
        Float::sqrt(self)
    }

    #[inline]
    fn rdiv(self, rhs: Self) -> Self {
        self / rhs
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        val as f32
    }

    #[inline]
    fn real_to_number(self) -> f64 {
        self as f64
    }

    #[inline]
    fn imag_to_number(self) -> f64 {
        0.0
    }

    #[inline]
    fn is_nan(self) -> bool {
        Float::is_nan(self)
    }
}

/// Complex division with Smith's scaling and IEEE zero-divisor behavior.
fn complex_rdiv<F: Float>(a: Complex<F>, b: Complex<F>) -> Complex<F> {
    if b.im.is_zero() {
        // Real divisor: divide componentwise so `1/0` is `Inf`, not `NaN`.
        let im = if a.im.is_zero() { F::zero() } else { a.im / b.re };
        return Complex::new(a.re / b.re, im);
    }
    if b.re.abs() >= b.im.abs() {
        let r = b.im / b.re;
        let d = b.re + b.im * r;
        Complex::new((a.re + a.im * r) / d, (a.im - a.re * r) / d)
    } else {
        let r = b.re / b.im;
        let d = b.re * r + b.im;
        Complex::new((a.re * r + a.im) / d, (a.im * r - a.re) / d)
    }
}

impl Scalar for Complex64 {
    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self.norm_sqr()
    }

    #[inline]
    fn abs(self) -> Self {
        Complex64::new(self.norm(), 0.0)
    }

    #[inline]
    fn abs_val(self) -> f64 {
        self.norm()
    }

    #[inline]
    fn sqrt(self) -> Self {
        if self.im == 0.0 && self.re >= 0.0 {
            return Complex64::new(self.re.sqrt(), 0.0);
        }
        Complex64::sqrt(self)
    }

    #[inline]
    fn rdiv(self, rhs: Self) -> Self {
        complex_rdiv(self, rhs)
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        Complex64::new(val, 0.0)
    }

    #[inline]
    fn real_to_number(self) -> f64 {
        self.re
    }

    #[inline]
    fn imag_to_number(self) -> f64 {
        self.im
    }

    #[inline]
    fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

impl Scalar for Complex32 {
    #[inline]
    fn conj(self) -> Self {
        Complex32::conj(&self)
    }

    #[inline]
    fn abs_sq(self) -> f64 {
        self.norm_sqr() as f64
    }

    #[inline]
    fn abs(self) -> Self {
        Complex32::new(self.norm(), 0.0)
    }

    #[inline]
    fn abs_val(self) -> f64 {
        self.norm() as f64
    }

    #[inline]
    fn sqrt(self) -> Self {
        if self.im == 0.0 && self.re >= 0.0 {
            return Complex32::new(self.re.sqrt(), 0.0);
        }
        Complex32::sqrt(self)
    }

    #[inline]
    fn rdiv(self, rhs: Self) -> Self {
        complex_rdiv(self, rhs)
    }

    #[inline]
    fn from_f64(val: f64) -> Self {
        Complex32::new(val as f32, 0.0)
    }

    #[inline]
    fn real_to_number(self) -> f64 {
        self.re as f64
    }

    #[inline]
    fn imag_to_number(self) -> f64 {
        self.im as f64
    }

    #[inline]
    fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }
}

/// Expand one generic check into `#[test]` functions for `f64` and `Complex64`.
///
/// `scalar_tests!(test_det, check_det)` defines `test_det_f64` and
/// `test_det_c64`, each calling `check_det::<T>()`.
#[macro_export]
macro_rules! scalar_tests {
    ($name:ident, $test_fn:ident) => {
        $crate::paste::paste! {
            #[test]
            fn [<$name _f64>]() {
                $test_fn::<f64>();
            }

            #[test]
            fn [<$name _c64>]() {
                $test_fn::<$crate::Complex64>();
            }
        }
    };
}
