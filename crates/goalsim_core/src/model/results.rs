//! Simulation outputs

use serde::{Deserialize, Serialize};

/// Percentile band of portfolio values at the end of one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,
    pub p10: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub p90: f64,
}

impl YearProjection {
    /// A band with no dispersion, used for year 0 and zero-volatility runs
    #[must_use]
    pub fn flat(year: u32, value: f64) -> Self {
        Self {
            year,
            p10: value,
            p25: value,
            median: value,
            p75: value,
            p90: value,
        }
    }

    /// Whether `p10 <= p25 <= median <= p75 <= p90`
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.p10 <= self.p25
            && self.p25 <= self.median
            && self.median <= self.p75
            && self.p75 <= self.p90
    }
}

/// Summary of the terminal value distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationStatistics {
    pub median_final_value: f64,
    pub percentile_10: f64,
    pub percentile_25: f64,
    pub percentile_75: f64,
    pub percentile_90: f64,
    pub mean_final_value: f64,
    pub std_dev_final_value: f64,
    pub min_final_value: f64,
    pub max_final_value: f64,
    /// Fraction of trials ending below the initial portfolio value
    pub probability_of_loss: f64,
}

/// Result of one Monte Carlo evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Fraction of trials whose terminal value reached the goal
    pub success_probability: f64,
    pub iterations_run: usize,
    /// Terminal value of every trial, in trial order
    pub final_portfolio_distribution: Vec<f64>,
    /// One band per year, `0..=time_horizon_years`
    pub portfolio_projections: Vec<YearProjection>,
    pub statistics: SimulationStatistics,
    /// Trials clipped to the sentinel after going non-finite
    #[serde(default)]
    pub clipped_trials: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_projection_is_monotonic() {
        let p = YearProjection::flat(0, 1_000.0);
        assert!(p.is_monotonic());
        assert_eq!(p.p10, p.p90);
    }

    #[test]
    fn test_out_of_order_projection_detected() {
        let p = YearProjection {
            year: 3,
            p10: 10.0,
            p25: 9.0,
            median: 11.0,
            p75: 12.0,
            p90: 13.0,
        };
        assert!(!p.is_monotonic());
    }
}
