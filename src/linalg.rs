//! Dense linear-algebra glue over nalgebra.
//!
//! The solver needs a narrow contract from its linear-algebra backend:
//! checked subtraction, entrywise norms and a thin SVD. This module pins that
//! contract to nalgebra and normalizes its failure modes into [`RpcaError`].

use nalgebra::{DMatrix, DVector};

use crate::error::RpcaError;

/// Sweep cap for the SVD iteration. nalgebra's default path iterates without
/// bound; a finite cap turns pathological non-convergence into an error the
/// caller can see instead of a hang.
const SVD_MAX_SWEEPS: usize = 4096;

/// Thin SVD of a dense matrix: `A = U · diag(s) · Vᵗ`.
///
/// Recomputed every iteration and dropped at the end of it; never persisted.
#[derive(Debug, Clone)]
pub struct SvdResult {
    /// Left singular vectors (m × k, k = min(m, n)).
    pub u: DMatrix<f64>,
    /// Singular values in non-increasing order (length k).
    pub singular_values: DVector<f64>,
    /// Right singular vectors, transposed (k × n).
    pub v_t: DMatrix<f64>,
}

/// Compute the thin SVD of `matrix`.
pub fn svd(matrix: &DMatrix<f64>) -> Result<SvdResult, RpcaError> {
    let svd = matrix
        .clone()
        .try_svd(true, true, f64::EPSILON, SVD_MAX_SWEEPS)
        .ok_or(RpcaError::SvdDidNotConverge {
            sweeps: SVD_MAX_SWEEPS,
        })?;

    if svd.singular_values.iter().any(|v| !v.is_finite()) {
        return Err(RpcaError::SvdNonFinite);
    }

    // Both factors were requested from try_svd, so they are present.
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => return Err(RpcaError::SvdNonFinite),
    };

    Ok(SvdResult {
        u,
        singular_values: svd.singular_values,
        v_t,
    })
}

/// Sum of absolute values over all entries.
pub fn l1_norm(matrix: &DMatrix<f64>) -> f64 {
    matrix.iter().map(|v| v.abs()).sum()
}

/// Squared Frobenius norm.
pub fn frobenius_norm_squared(matrix: &DMatrix<f64>) -> f64 {
    matrix.norm_squared()
}

/// `a − b` with a dimension guard, `op` naming the call site for the error.
pub fn subtract_checked(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    op: &'static str,
) -> Result<DMatrix<f64>, RpcaError> {
    ensure_same_shape(a, b, op)?;
    Ok(a - b)
}

/// Dimension guard used before every subtraction in the iteration loop.
pub fn ensure_same_shape(
    a: &DMatrix<f64>,
    b: &DMatrix<f64>,
    op: &'static str,
) -> Result<(), RpcaError> {
    if a.shape() != b.shape() {
        return Err(RpcaError::ShapeMismatch {
            op,
            left_rows: a.nrows(),
            left_cols: a.ncols(),
            right_rows: b.nrows(),
            right_cols: b.ncols(),
        });
    }
    Ok(())
}
