//! Adaptive penalty-step estimators.
//!
//! Each iteration re-derives the step parameter mu from the fresh residual.
//! The default estimator scales the residual's standard deviation; the
//! median-based variant is an interchangeable implementation of the same
//! contract, selectable at solver construction.

use nalgebra::DMatrix;

/// Lower bound on mu. Keeps the trajectory away from a zero-penalty fixed
/// point when the residual collapses to near-zero.
pub const MU_FLOOR: f64 = 0.01;

/// Contract for deriving the next mu from the current residual.
pub trait PenaltyEstimator {
    /// Estimate the penalty step for the next iteration. Must return a value
    /// of at least [`MU_FLOOR`].
    fn estimate(&self, residual: &DMatrix<f64>) -> f64;
}

/// Which penalty estimator a solver run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenaltyStrategy {
    /// Population standard deviation scaled by `sqrt(2·max(m, n))`.
    #[default]
    StandardDeviation,
    /// Median absolute deviation of the residual entries.
    MedianAbsoluteDeviation,
}

impl PenaltyStrategy {
    pub(crate) fn estimator(self) -> Box<dyn PenaltyEstimator> {
        match self {
            PenaltyStrategy::StandardDeviation => Box::new(StdDevEstimator),
            PenaltyStrategy::MedianAbsoluteDeviation => Box::new(MedianAbsDevEstimator),
        }
    }
}

/// Default estimator: `mu = max(0.01, σ · sqrt(2·max(m, n)))` with σ the
/// population standard deviation of the flattened residual, accumulated in a
/// single pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDevEstimator;

impl PenaltyEstimator for StdDevEstimator {
    fn estimate(&self, residual: &DMatrix<f64>) -> f64 {
        let (m, n) = residual.shape();

        // Welford's running moments.
        let mut count = 0.0;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        for &v in residual.iter() {
            count += 1.0;
            let delta = v - mean;
            mean += delta / count;
            m2 += delta * (v - mean);
        }
        let std_dev = (m2 / count).sqrt();

        let scale = (2.0 * m.max(n) as f64).sqrt();
        (std_dev * scale).max(MU_FLOOR)
    }
}

/// Alternate estimator: `mu = max(0.01, median(|x| − median(x)))` over the
/// flattened residual.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianAbsDevEstimator;

impl PenaltyEstimator for MedianAbsDevEstimator {
    fn estimate(&self, residual: &DMatrix<f64>) -> f64 {
        let mut values: Vec<f64> = residual.iter().copied().collect();
        let center = median(&mut values);

        let mut deviations: Vec<f64> = residual.iter().map(|v| v.abs() - center).collect();
        median(&mut deviations).max(MU_FLOOR)
    }
}

/// Median of `values`; sorts in place. Even-length input averages the two
/// middle elements.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(f64::total_cmp);
    let half = values.len() / 2;
    if values.len() % 2 == 1 {
        values[half]
    } else {
        (values[half - 1] + values[half]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn std_dev_estimate_matches_hand_computation() {
        // Entries ±1: population mean 0, variance 1. Scale sqrt(2·2) = 2.
        let residual = DMatrix::from_row_slice(2, 2, &[1.0, -1.0, 1.0, -1.0]);
        let mu = StdDevEstimator.estimate(&residual);
        assert_relative_eq!(mu, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn std_dev_uses_larger_dimension() {
        // 1×4 row of ±1: variance 1, scale sqrt(2·4).
        let residual = DMatrix::from_row_slice(1, 4, &[1.0, -1.0, 1.0, -1.0]);
        let mu = StdDevEstimator.estimate(&residual);
        assert_relative_eq!(mu, 8.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn zero_residual_hits_the_floor() {
        let residual = DMatrix::<f64>::zeros(3, 5);
        assert_eq!(StdDevEstimator.estimate(&residual), MU_FLOOR);
        assert_eq!(MedianAbsDevEstimator.estimate(&residual), MU_FLOOR);
    }

    #[test]
    fn median_abs_dev_matches_hand_computation() {
        // Values sorted: [-2, -1, 3, 8], median 1.
        // |x| − 1 sorted: [0, 1, 2, 7], median 1.5.
        let residual = DMatrix::from_row_slice(2, 2, &[-1.0, -2.0, 3.0, 8.0]);
        let mu = MedianAbsDevEstimator.estimate(&residual);
        assert_relative_eq!(mu, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn median_handles_odd_length() {
        let mut values = vec![5.0, 1.0, 3.0];
        assert_eq!(median(&mut values), 3.0);
    }
}
