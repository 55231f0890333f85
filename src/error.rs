//! Error types for the decomposition pipeline.

use thiserror::Error;

/// Errors surfaced by the solver and the series front-end.
///
/// Failures are terminal for the run: nothing retries, and a caller that
/// wants another attempt constructs a fresh run with different input or
/// penalties.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RpcaError {
    /// Two operands disagree on dimensions where the same shape is required.
    #[error("shape mismatch in {op}: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    ShapeMismatch {
        op: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// The input matrix has no rows or no columns.
    #[error("input matrix must have at least one row and one column")]
    EmptyMatrix,

    /// The input matrix contains a NaN or infinite entry.
    #[error("non-finite entry at ({row}, {col})")]
    NonFinite { row: usize, col: usize },

    /// The input has zero L1 mass, so the initial penalty step
    /// (m·n)/(4·‖X‖₁) is undefined.
    #[error("input is identically zero; initial mu is undefined")]
    DegenerateInput,

    /// Penalty multipliers must be non-negative.
    #[error("penalty multipliers must be non-negative, got lpenalty={l_penalty}, spenalty={s_penalty}")]
    InvalidPenalty { l_penalty: f64, s_penalty: f64 },

    /// The SVD iteration hit its sweep cap without converging.
    #[error("SVD did not converge within {sweeps} sweeps")]
    SvdDidNotConverge { sweeps: usize },

    /// The SVD produced a non-finite factorization.
    #[error("SVD produced non-finite values")]
    SvdNonFinite,

    /// The seasonal frequency must be positive.
    #[error("frequency must be positive")]
    InvalidFrequency,

    /// The series length is not a whole number of periods.
    #[error("series of length {len} is not divisible by frequency {frequency}")]
    UnevenSeries { len: usize, frequency: usize },
}
