//! Percentile and summary statistics over trial populations

use crate::model::{SimulationStatistics, YearProjection};

/// Standard percentiles reported per year
pub mod standard {
    pub const P10: f64 = 0.10;
    pub const P25: f64 = 0.25;
    pub const P50: f64 = 0.50;
    pub const P75: f64 = 0.75;
    pub const P90: f64 = 0.90;
}

/// Sort a copy of `values` ascending
///
/// Inputs are expected to be finite; the engine clips before calling this.
#[must_use]
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted
}

/// Linear-interpolated percentile of an ascending slice, `p` in `[0, 1]`
///
/// Returns 0.0 for an empty slice.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            (sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
                .max(sorted[lo])
                .min(sorted[hi])
        }
    }
}

/// Percentile band for one year from that year's trial balances
#[must_use]
pub fn year_projection(year: u32, balances: &[f64]) -> YearProjection {
    let sorted = sorted(balances);
    YearProjection {
        year,
        p10: percentile(&sorted, standard::P10),
        p25: percentile(&sorted, standard::P25),
        median: percentile(&sorted, standard::P50),
        p75: percentile(&sorted, standard::P75),
        p90: percentile(&sorted, standard::P90),
    }
}

/// Fraction of `values` satisfying `pred`
#[must_use]
pub fn fraction(values: &[f64], pred: impl Fn(f64) -> bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| pred(**v)).count() as f64 / values.len() as f64
}

/// Summary statistics of the terminal distribution
#[must_use]
pub fn summarize(final_values: &[f64], initial_value: f64) -> SimulationStatistics {
    let sorted = sorted(final_values);
    let n = sorted.len().max(1) as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = if sorted.len() > 1 {
        sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };

    SimulationStatistics {
        median_final_value: percentile(&sorted, standard::P50),
        percentile_10: percentile(&sorted, standard::P10),
        percentile_25: percentile(&sorted, standard::P25),
        percentile_75: percentile(&sorted, standard::P75),
        percentile_90: percentile(&sorted, standard::P90),
        mean_final_value: mean,
        std_dev_final_value: variance.sqrt(),
        min_final_value: sorted.first().copied().unwrap_or(0.0),
        max_final_value: sorted.last().copied().unwrap_or(0.0),
        probability_of_loss: fraction(&sorted, |v| v < initial_value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 0.5), 3.0);
        assert_eq!(percentile(&values, 1.0), 5.0);
        assert!((percentile(&values, 0.1) - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_edge_sizes() {
        assert_eq!(percentile(&[], 0.5), 0.0);
        assert_eq!(percentile(&[7.0], 0.9), 7.0);
    }

    #[test]
    fn test_year_projection_orders_unsorted_input() {
        let band = year_projection(2, &[5.0, 1.0, 4.0, 2.0, 3.0]);
        assert_eq!(band.year, 2);
        assert_eq!(band.median, 3.0);
        assert!(band.is_monotonic());
    }

    #[test]
    fn test_summarize() {
        let stats = summarize(&[80.0, 100.0, 120.0, 140.0], 100.0);
        assert!((stats.mean_final_value - 110.0).abs() < 1e-12);
        assert_eq!(stats.min_final_value, 80.0);
        assert_eq!(stats.max_final_value, 140.0);
        assert!((stats.probability_of_loss - 0.25).abs() < 1e-12);
        assert!((stats.median_final_value - 110.0).abs() < 1e-12);
    }
}
