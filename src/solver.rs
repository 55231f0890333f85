//! The alternating-shrinkage RPCA solver.
//!
//! Each iteration updates the sparse component from the previous low-rank
//! estimate, the low-rank component from the fresh sparse estimate (via
//! singular-value shrinkage of `X − S`), re-derives the residual and the
//! adaptive penalty step, and checks the stopping rule. The update order
//! S → L → E is part of the algorithm's contract: swapping it changes the
//! convergence trajectory.

use log::{debug, trace};
use nalgebra::DMatrix;

use crate::convergence::{ConvergenceTracker, Termination};
use crate::error::RpcaError;
use crate::linalg::{self, SvdResult};
use crate::penalty::{PenaltyEstimator, PenaltyStrategy, MU_FLOOR};
use crate::threshold::{soft_threshold_matrix, soft_threshold_singular_values};

/// Non-negative multipliers for the nuclear-norm and L1 penalties, fixed for
/// the duration of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyConfig {
    /// Multiplier on the nuclear-norm (rank) penalty.
    pub l_penalty: f64,
    /// Multiplier on the L1 (sparsity) penalty.
    pub s_penalty: f64,
}

impl PenaltyConfig {
    /// Validated constructor; both multipliers must be non-negative.
    pub fn new(l_penalty: f64, s_penalty: f64) -> Result<Self, RpcaError> {
        if !(l_penalty >= 0.0) || !(s_penalty >= 0.0) {
            return Err(RpcaError::InvalidPenalty {
                l_penalty,
                s_penalty,
            });
        }
        Ok(Self {
            l_penalty,
            s_penalty,
        })
    }
}

/// Result of one decomposition run: `X = L + S + E`.
///
/// Owned by the caller once returned; the solver keeps nothing.
#[derive(Debug, Clone)]
pub struct Decomposition {
    /// Low-rank component L.
    pub low_rank: DMatrix<f64>,
    /// Sparse component S.
    pub sparse: DMatrix<f64>,
    /// Residual E = X − L − S, exact by construction.
    pub residual: DMatrix<f64>,
    /// Penalty step after the final iteration.
    pub mu: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the objective change reached the tolerance.
    pub converged: bool,
    /// Objective value after each iteration.
    pub objective_history: Vec<f64>,
    /// Absolute objective change after each iteration.
    pub diff_history: Vec<f64>,
    /// Penalty step chosen after each iteration.
    pub mu_history: Vec<f64>,
}

/// Alternating proximal-shrinkage solver.
///
/// A solver value holds only its configuration; every [`solve`] call owns its
/// working matrices, so independent decompositions never share mutable state.
///
/// [`solve`]: RpcaSolver::solve
pub struct RpcaSolver {
    config: PenaltyConfig,
    estimator: Box<dyn PenaltyEstimator>,
}

impl RpcaSolver {
    /// Solver with the default standard-deviation penalty estimator.
    pub fn new(config: PenaltyConfig) -> Self {
        Self::with_strategy(config, PenaltyStrategy::default())
    }

    /// Solver with an explicit penalty-estimation strategy.
    pub fn with_strategy(config: PenaltyConfig, strategy: PenaltyStrategy) -> Self {
        Self {
            config,
            estimator: strategy.estimator(),
        }
    }

    /// Solver with a caller-supplied estimator implementation.
    pub fn with_estimator(config: PenaltyConfig, estimator: Box<dyn PenaltyEstimator>) -> Self {
        Self { config, estimator }
    }

    /// Decompose `x` into low-rank, sparse and residual components.
    ///
    /// Runs until the objective change reaches the fixed tolerance or the
    /// iteration cap, whichever comes first.
    pub fn solve(&self, x: &DMatrix<f64>) -> Result<Decomposition, RpcaError> {
        validate_input(x)?;

        let (m, n) = x.shape();
        let l1_mass = linalg::l1_norm(x);
        if l1_mass == 0.0 {
            return Err(RpcaError::DegenerateInput);
        }

        let mut mu = ((m * n) as f64 / (4.0 * l1_mass)).max(MU_FLOOR);
        let mut low_rank = DMatrix::zeros(m, n);
        let mut sparse;
        let mut residual;

        let mut tracker = ConvergenceTracker::new(linalg::frobenius_norm_squared(x));
        let mut objective_history = Vec::new();
        let mut diff_history = Vec::new();
        let mut mu_history = Vec::new();

        debug!(
            "rpca solve start: {}x{}, mu0={:.6e}, tolerance={:.6e}",
            m,
            n,
            mu,
            tracker.tolerance()
        );

        let termination = loop {
            let s_step = self.config.s_penalty * mu;
            let l_step = self.config.l_penalty * mu;
            trace!("effective penalties: s={:.6e}, l={:.6e}", s_step, l_step);

            // S-update against the previous L.
            let without_low_rank = linalg::subtract_checked(x, &low_rank, "S-update")?;
            sparse = soft_threshold_matrix(&without_low_rank, s_step);
            let l1_term = linalg::l1_norm(&sparse) * s_step;

            // L-update against the fresh S: shrink the singular values of X − S.
            let without_sparse = linalg::subtract_checked(x, &sparse, "L-update")?;
            let SvdResult {
                u,
                singular_values,
                v_t,
            } = linalg::svd(&without_sparse)?;
            let shrunk = soft_threshold_singular_values(&singular_values, l_step);
            low_rank = &u * DMatrix::from_diagonal(&shrunk) * &v_t;
            let nuclear_term = shrunk.sum() * l_step;

            // Residual from the two fresh factors.
            residual = linalg::subtract_checked(
                &linalg::subtract_checked(x, &low_rank, "E-update")?,
                &sparse,
                "E-update",
            )?;
            let residual_half_energy = 0.5 * linalg::frobenius_norm_squared(&residual);

            let objective =
                ConvergenceTracker::objective(residual_half_energy, nuclear_term, l1_term);
            let diff = tracker.record(objective);
            mu = self.estimator.estimate(&residual);

            objective_history.push(objective);
            diff_history.push(diff);
            mu_history.push(mu);

            debug!(
                "iteration {}: objective={:.9e}, diff={:.3e}, mu={:.6e}",
                tracker.iteration(),
                objective,
                diff,
                mu
            );

            if let Some(termination) = tracker.termination(diff) {
                break termination;
            }
        };

        debug!(
            "rpca solve done: {:?} after {} iterations",
            termination,
            tracker.iteration()
        );

        Ok(Decomposition {
            low_rank,
            sparse,
            residual,
            mu,
            iterations: tracker.iteration(),
            converged: termination == Termination::Converged,
            objective_history,
            diff_history,
            mu_history,
        })
    }
}

fn validate_input(x: &DMatrix<f64>) -> Result<(), RpcaError> {
    if x.nrows() < 1 || x.ncols() < 1 {
        return Err(RpcaError::EmptyMatrix);
    }
    for j in 0..x.ncols() {
        for i in 0..x.nrows() {
            if !x[(i, j)].is_finite() {
                return Err(RpcaError::NonFinite { row: i, col: j });
            }
        }
    }
    Ok(())
}
