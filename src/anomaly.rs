//! Seasonal anomaly detection on univariate series.
//!
//! Reshapes a series into a frequency × periods matrix, optionally z-scores
//! it, runs the RPCA decomposition and reads anomalies off the sparse
//! component, in the manner of Netflix's Surus RAD detector.

use log::debug;
use nalgebra::DMatrix;

use crate::error::RpcaError;
use crate::penalty::PenaltyStrategy;
use crate::solver::{PenaltyConfig, RpcaSolver};

/// Options for [`find_anomalies`].
///
/// Defaults match the RAD detector: weekly seasonality, z-scoring on, no
/// differencing, unit nuclear penalty, and an L1 penalty derived from the
/// series shape when not set explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyOptions {
    frequency: usize,
    force_diff: bool,
    scale: bool,
    l_penalty: f64,
    s_penalty: Option<f64>,
    strategy: PenaltyStrategy,
}

impl Default for AnomalyOptions {
    fn default() -> Self {
        Self {
            frequency: 7,
            force_diff: false,
            scale: true,
            l_penalty: 1.0,
            s_penalty: None,
            strategy: PenaltyStrategy::default(),
        }
    }
}

impl AnomalyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seasonal period; the reshaped matrix has this many rows.
    pub fn frequency(mut self, frequency: usize) -> Self {
        self.frequency = frequency;
        self
    }

    /// First-difference the series before decomposing.
    pub fn force_diff(mut self, force_diff: bool) -> Self {
        self.force_diff = force_diff;
        self
    }

    /// Z-score the matrix before decomposing and un-scale the sparse
    /// component afterwards.
    pub fn scale(mut self, scale: bool) -> Self {
        self.scale = scale;
        self
    }

    /// Multiplier on the nuclear-norm penalty.
    pub fn l_penalty(mut self, l_penalty: f64) -> Self {
        self.l_penalty = l_penalty;
        self
    }

    /// Override the shape-derived default `1.4 / sqrt(max(f, n/f))`.
    pub fn s_penalty(mut self, s_penalty: f64) -> Self {
        self.s_penalty = Some(s_penalty);
        self
    }

    /// Penalty-estimation strategy passed through to the solver.
    pub fn strategy(mut self, strategy: PenaltyStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Which series points are anomalous, and by how much.
#[derive(Debug, Clone, PartialEq)]
pub struct Anomalies {
    /// True where the sparse component is nonzero.
    pub positions: Vec<bool>,
    /// Sparse-component magnitude in the input domain; zero for ordinary
    /// points, signed by the direction of the deviation.
    pub values: Vec<f64>,
    /// Sparse-component magnitude in the z-scored domain, useful for
    /// comparing anomalies across series.
    pub normed_values: Vec<f64>,
}

/// Detect anomalous points in `series`.
///
/// The series length must be a whole number of periods. Returns one entry per
/// input point, in input order.
pub fn find_anomalies(series: &[f64], options: &AnomalyOptions) -> Result<Anomalies, RpcaError> {
    if options.frequency == 0 {
        return Err(RpcaError::InvalidFrequency);
    }
    if series.is_empty() || series.len() % options.frequency != 0 {
        return Err(RpcaError::UnevenSeries {
            len: series.len(),
            frequency: options.frequency,
        });
    }

    let diffed;
    let data: &[f64] = if options.force_diff {
        diffed = first_difference(series);
        &diffed
    } else {
        series
    };

    let frequency = options.frequency;
    let periods = data.len() / frequency;
    // Column j holds period j of the series.
    let mut matrix = DMatrix::from_column_slice(frequency, periods, data);

    let mut std_dev = 1.0;
    if options.scale {
        let (mean, sd) = mean_std_dev(matrix.as_slice());
        if sd == 0.0 {
            // A constant series z-scores to all zeros.
            return Err(RpcaError::DegenerateInput);
        }
        debug!("scaling series: mean={:.6e}, stddev={:.6e}", mean, sd);
        matrix.apply(|v| *v = (*v - mean) / sd);
        std_dev = sd;
    }

    let s_penalty = options.s_penalty.unwrap_or_else(|| {
        let f = frequency as f64;
        1.4 / f.max(data.len() as f64 / f).sqrt()
    });
    let config = PenaltyConfig::new(options.l_penalty, s_penalty)?;
    let solver = RpcaSolver::with_strategy(config, options.strategy);
    let decomposition = solver.solve(&matrix)?;

    let normed_sparse = decomposition.sparse.clone();
    let mut sparse = decomposition.sparse;
    if options.scale {
        // The mean stays with the low-rank trend; the sparse component only
        // needs the spread undone.
        sparse.apply(|v| *v *= std_dev);
    }

    // Column-major storage reads back in series order.
    let values: Vec<f64> = sparse.as_slice().to_vec();
    let normed_values: Vec<f64> = normed_sparse.as_slice().to_vec();
    let positions = values.iter().map(|v| *v != 0.0).collect();

    Ok(Anomalies {
        positions,
        values,
        normed_values,
    })
}

/// First difference with a leading zero, preserving length.
fn first_difference(series: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(series.len());
    out.push(0.0);
    out.extend(series.windows(2).map(|w| w[1] - w[0]));
    out
}

/// Mean and sample standard deviation (n − 1 denominator).
fn mean_std_dev(values: &[f64]) -> (f64, f64) {
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    if values.len() < 2 {
        return (mean, 0.0);
    }
    let variance = values
        .iter()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / (count - 1.0);
    (mean, variance.sqrt())
}
