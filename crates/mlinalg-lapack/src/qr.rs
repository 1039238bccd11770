//! Householder QR, with and without column pivoting, and explicit Q.
//!
//! `geqr2` and `geqp3` work on a copy of their input and pack each reflector
//! below the diagonal as `tau * v[1..]`, which is what [`orgqr`] expects.
//! `geqp2` overwrites its input and packs the raw `v[1..]` instead.

use log::trace;
use mlinalg_core::{Matrix, Scalar};

use crate::householder::{larf_left, larfg_left};
use crate::norm::nrm2;
use crate::triangular::triu_inplace;

/// Result of [`geqr2`].
#[derive(Debug, Clone)]
pub struct QrFactors<T> {
    /// `R` on and above the diagonal, compact reflectors below it
    pub r: Matrix<T>,
    pub taus: Vec<T>,
    pub phis: Vec<T>,
}

impl<T: Scalar> QrFactors<T> {
    /// `R` with the packed reflectors cleared.
    pub fn upper(&self) -> Matrix<T> {
        let mut r = self.r.copy();
        triu_inplace(&mut r);
        r
    }
}

/// Reflector data returned by the in-place [`geqp2`].
#[derive(Debug, Clone)]
pub struct QrPivots<T> {
    pub taus: Vec<T>,
    pub phis: Vec<T>,
    /// `jpvt[j]` is the original column now at position `j`
    pub jpvt: Vec<usize>,
}

/// Result of [`geqp3`].
#[derive(Debug, Clone)]
pub struct PivotedQr<T> {
    pub r: Matrix<T>,
    pub taus: Vec<T>,
    pub phis: Vec<T>,
    pub jpvt: Vec<usize>,
}

impl<T: Scalar> PivotedQr<T> {
    /// `R` with the packed reflectors cleared.
    pub fn upper(&self) -> Matrix<T> {
        let mut r = self.r.copy();
        triu_inplace(&mut r);
        r
    }
}

/// Reduce column `k` of `r` with a left reflector and update columns `> k`.
///
/// Writes `alpha` on the diagonal and `scale * v[i]` below it, where `scale`
/// is `tau` for compact packing and one for raw packing.
fn reduce_column<T: Scalar>(r: &mut Matrix<T>, m: usize, k: usize, compact: bool) -> (T, T) {
    let refl = larfg_left(r, m, k);
    r[[k, k]] = refl.alpha;
    let scale = if compact { refl.tau } else { T::one() };
    for (i, &vi) in refl.v.iter().enumerate().skip(1) {
        r[[k + i, k]] = scale * vi;
    }
    larf_left(r, &refl.v, refl.tau, k, k + 1);
    (refl.tau, refl.phi)
}

fn argmax_from(norms: &[f64], k: usize) -> usize {
    let mut best = k;
    for (j, &v) in norms.iter().enumerate().skip(k + 1) {
        if v > norms[best] {
            best = j;
        }
    }
    best
}

/// Unpivoted Householder QR of a copy of `a`.
///
/// `a` is treated as a single `m x n` page.
pub fn geqr2<T: Scalar>(a: &Matrix<T>) -> QrFactors<T> {
    let mut r = a.copy();
    let (m, n) = (r.nrows(), r.ncols());
    let kmax = m.min(n);
    let mut taus = Vec::with_capacity(kmax);
    let mut phis = Vec::with_capacity(kmax);

    for k in 0..kmax {
        let (tau, phi) = reduce_column(&mut r, m, k, true);
        taus.push(tau);
        phis.push(phi);
    }
    r.set_type();
    QrFactors { r, taus, phis }
}

/// Column-pivoted Householder QR, overwriting `a` with `R` and raw reflectors.
///
/// Column norms are down-dated after each step and recomputed from scratch
/// once they drop to half of the last exactly computed value.
pub fn geqp2<T: Scalar>(a: &mut Matrix<T>) -> QrPivots<T> {
    let (m, n) = (a.nrows(), a.ncols());
    let kmax = m.min(n);
    let mut taus = Vec::with_capacity(kmax);
    let mut phis = Vec::with_capacity(kmax);
    let mut jpvt: Vec<usize> = (0..n).collect();
    let mut norms: Vec<f64> = (0..n).map(|j| nrm2(a, j, 0, m).real_to_number()).collect();
    let mut reference = norms.clone();

    for k in 0..kmax {
        let pvt = argmax_from(&norms, k);
        if pvt != k {
            a.swap_cols(k, pvt);
            jpvt.swap(k, pvt);
            norms.swap(k, pvt);
            reference.swap(k, pvt);
        }

        let (tau, phi) = reduce_column(a, m, k, false);
        taus.push(tau);
        phis.push(phi);

        for j in (k + 1)..n {
            if norms[j] == 0.0 {
                continue;
            }
            let ratio = a[[k, j]].abs_val() / norms[j];
            let updated = norms[j] * (1.0 - ratio * ratio).max(0.0).sqrt();
            if updated <= reference[j] / 2.0 {
                norms[j] = nrm2(a, j, k + 1, m).real_to_number();
                reference[j] = norms[j];
                trace!("geqp2: recomputed norm of column {j} at step {k}");
            } else {
                norms[j] = updated;
            }
        }
    }
    a.set_type();
    QrPivots { taus, phis, jpvt }
}

/// Column-pivoted Householder QR of a copy of `a`, with compact reflector packing.
///
/// Tracks partial norms in `vn1` and reference norms in `vn2`.
pub fn geqp3<T: Scalar>(a: &Matrix<T>) -> PivotedQr<T> {
    let mut r = a.copy();
    let (m, n) = (r.nrows(), r.ncols());
    let kmax = m.min(n);
    let mut taus = Vec::with_capacity(kmax);
    let mut phis = Vec::with_capacity(kmax);
    let mut jpvt: Vec<usize> = (0..n).collect();
    let mut vn1: Vec<f64> = (0..n).map(|j| nrm2(&r, j, 0, m).real_to_number()).collect();
    let mut vn2 = vn1.clone();

    for k in 0..kmax {
        let pvt = argmax_from(&vn1, k);
        if pvt != k {
            r.swap_cols(k, pvt);
            jpvt.swap(k, pvt);
            vn1.swap(k, pvt);
            vn2.swap(k, pvt);
        }

        let (tau, phi) = reduce_column(&mut r, m, k, true);
        taus.push(tau);
        phis.push(phi);

        for j in (k + 1)..n {
            if vn1[j] == 0.0 {
                continue;
            }
            let temp = r[[k, j]].abs_val() / vn1[j];
            let temp = (1.0 - temp * temp).max(0.0);
            let ratio = vn1[j] / vn2[j];
            // new norm <= vn2 / 2
            if temp * ratio * ratio <= 0.25 {
                vn1[j] = nrm2(&r, j, k + 1, m).real_to_number();
                vn2[j] = vn1[j];
                trace!("geqp3: recomputed norm of column {j} at step {k}");
            } else {
                vn1[j] *= temp.sqrt();
            }
        }
    }
    r.set_type();
    PivotedQr { r, taus, phis, jpvt }
}

/// Explicit `m x m` unitary `Q` from compact reflectors packed by [`geqr2`] or [`geqp3`].
///
/// Reflectors are applied to the identity as `H_0 * (H_1 * ... (H_{k-1} * I))`,
/// so `H_k` only has to touch columns `>= k`.
pub fn orgqr<T: Scalar>(r: &Matrix<T>, taus: &[T]) -> Matrix<T> {
    let m = r.nrows();
    let mut q = Matrix::identity(m);
    let kmax = taus.len().min(m).min(r.ncols());

    for k in (0..kmax).rev() {
        let tau = taus[k];
        if tau == T::zero() {
            continue;
        }
        let mut v = Vec::with_capacity(m - k);
        v.push(T::one());
        v.extend(((k + 1)..m).map(|i| r[[i, k]].rdiv(tau)));
        larf_left(&mut q, &v, tau, k, k);
    }
    q.set_type();
    q
}
