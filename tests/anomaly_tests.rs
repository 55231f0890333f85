use approx::assert_relative_eq;
use rpca_rust::{find_anomalies, AnomalyOptions, PenaltyStrategy};

/// Ten repeats of a weekly pattern with one injected spike.
fn spiked_series() -> Vec<f64> {
    let mut series: Vec<f64> = (0..70).map(|t| (t % 7) as f64).collect();
    series[33] += 10.0;
    series
}

#[test]
fn detects_a_spike_in_a_seasonal_series() {
    let series = spiked_series();
    let anomalies = find_anomalies(&series, &AnomalyOptions::new()).unwrap();

    assert_eq!(anomalies.values.len(), series.len());
    assert_eq!(anomalies.positions.len(), series.len());
    assert!(anomalies.positions[33]);
    assert!(anomalies.values[33] > 5.0);

    // The spike dominates every other sparse entry.
    let max_other = anomalies
        .values
        .iter()
        .enumerate()
        .filter(|(t, _)| *t != 33)
        .map(|(_, v)| v.abs())
        .fold(0.0, f64::max);
    assert!(anomalies.values[33] > max_other);

    // An occasional off-spike entry may clear the threshold, but the bulk of
    // the series must not be flagged.
    let flagged = anomalies.positions.iter().filter(|p| **p).count();
    assert!(flagged < series.len() / 2, "{flagged} points flagged");
}

#[test]
fn positions_mark_exactly_the_nonzero_values() {
    let anomalies = find_anomalies(&spiked_series(), &AnomalyOptions::new()).unwrap();
    for (position, value) in anomalies.positions.iter().zip(anomalies.values.iter()) {
        assert_eq!(*position, *value != 0.0);
    }
}

#[test]
fn unscaled_values_equal_normed_values() {
    let anomalies =
        find_anomalies(&spiked_series(), &AnomalyOptions::new().scale(false)).unwrap();
    assert_eq!(anomalies.values, anomalies.normed_values);
}

#[test]
fn scaling_multiplies_normed_values_by_one_constant() {
    let anomalies = find_anomalies(&spiked_series(), &AnomalyOptions::new()).unwrap();

    let ratios: Vec<f64> = anomalies
        .values
        .iter()
        .zip(anomalies.normed_values.iter())
        .filter(|(_, normed)| **normed != 0.0)
        .map(|(value, normed)| value / normed)
        .collect();
    assert!(!ratios.is_empty());
    for ratio in &ratios {
        assert_relative_eq!(*ratio, ratios[0], epsilon = 1e-12);
    }
}

#[test]
fn differencing_preserves_series_length() {
    // Linear trend on top of the weekly pattern; differencing removes it.
    let series: Vec<f64> = spiked_series()
        .iter()
        .enumerate()
        .map(|(t, v)| v + 0.5 * t as f64)
        .collect();
    let anomalies =
        find_anomalies(&series, &AnomalyOptions::new().force_diff(true)).unwrap();

    assert_eq!(anomalies.values.len(), series.len());
    let flagged = anomalies.positions.iter().filter(|p| **p).count();
    assert!(flagged < series.len() / 2);
}

#[test]
fn single_period_series_is_accepted() {
    let series: Vec<f64> = (0..7).map(|t| t as f64).collect();
    let anomalies = find_anomalies(&series, &AnomalyOptions::new()).unwrap();
    assert_eq!(anomalies.values.len(), 7);
}

#[test]
fn median_strategy_still_finds_the_spike() {
    let options = AnomalyOptions::new().strategy(PenaltyStrategy::MedianAbsoluteDeviation);
    let anomalies = find_anomalies(&spiked_series(), &options).unwrap();
    assert!(anomalies.positions[33]);
}

#[test]
fn explicit_penalties_are_respected() {
    // A huge sparsity penalty suppresses the sparse component entirely.
    let options = AnomalyOptions::new().s_penalty(100.0);
    let anomalies = find_anomalies(&spiked_series(), &options).unwrap();
    assert!(anomalies.positions.iter().all(|p| !*p));
}
