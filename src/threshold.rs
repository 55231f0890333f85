//! Proximal shrinkage operators.
//!
//! Soft-thresholding is the closed-form proximal operator of the L1 penalty;
//! applied to singular values it solves the nuclear-norm proximal subproblem.

use nalgebra::{DMatrix, DVector};

/// `sign(x) · max(|x| − λ, 0)`.
///
/// A non-positive `lambda` leaves the value untouched, and `|x| = λ` maps to
/// exactly zero.
pub fn soft_threshold(value: f64, lambda: f64) -> f64 {
    if lambda <= 0.0 {
        return value;
    }
    let shrunk = value.abs() - lambda;
    if shrunk > 0.0 {
        shrunk * value.signum()
    } else {
        0.0
    }
}

/// Elementwise soft-threshold; the proximal step for the sparse component.
pub fn soft_threshold_matrix(matrix: &DMatrix<f64>, lambda: f64) -> DMatrix<f64> {
    matrix.map(|v| soft_threshold(v, lambda))
}

/// Soft-threshold over singular values; the proximal step for the low-rank
/// component.
pub fn soft_threshold_singular_values(values: &DVector<f64>, lambda: f64) -> DVector<f64> {
    values.map(|v| soft_threshold(v, lambda))
}
