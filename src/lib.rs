//! # rpca-rust: Robust Principal Component Analysis
//!
//! Decomposes a dense matrix `X` into a low-rank component `L`, a sparse
//! component `S` and a residual `E` by alternating proximal shrinkage,
//! trading off nuclear-norm (rank) cost, L1 (sparsity) cost and residual
//! energy. The same machinery backs a seasonal anomaly detector in the style
//! of Netflix's Surus RAD: reshape a series by its seasonal frequency,
//! decompose, and read anomalies off the sparse component.
//!
//! ```
//! use nalgebra::DMatrix;
//! use rpca_rust::{PenaltyConfig, RpcaSolver};
//!
//! let x = DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 3.0]);
//! let solver = RpcaSolver::new(PenaltyConfig::new(1.0, 1.0)?);
//! let decomposition = solver.solve(&x)?;
//! assert!(decomposition.converged);
//! # Ok::<(), rpca_rust::RpcaError>(())
//! ```

pub mod anomaly;
pub mod convergence;
pub mod error;
pub mod linalg;
pub mod penalty;
pub mod solver;
pub mod threshold;

pub use anomaly::{find_anomalies, Anomalies, AnomalyOptions};
pub use convergence::{ConvergenceTracker, Termination, MAX_ITERATIONS};
pub use error::RpcaError;
pub use linalg::SvdResult;
pub use penalty::{
    MedianAbsDevEstimator, PenaltyEstimator, PenaltyStrategy, StdDevEstimator, MU_FLOOR,
};
pub use solver::{Decomposition, PenaltyConfig, RpcaSolver};
