//! Simulation input parameters

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Longest supported horizon
pub const MAX_HORIZON_YEARS: u32 = 100;

fn default_iterations() -> usize {
    1_000
}

/// Everything one Monte Carlo evaluation needs
///
/// Values are plain annual decimals (`0.07` is 7%) and currency amounts.
/// Instances are never mutated after construction; the `with_*` helpers
/// return modified copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub initial_portfolio_value: f64,
    #[serde(default)]
    pub monthly_contribution: f64,
    #[serde(default)]
    pub monthly_withdrawal: f64,
    pub time_horizon_years: u32,
    pub expected_return: f64,
    pub volatility: f64,
    pub goal_amount: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default)]
    pub inflation_rate: f64,
    /// Fixes the random stream; `None` draws a fresh seed per run
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_portfolio_value: 0.0,
            monthly_contribution: 0.0,
            monthly_withdrawal: 0.0,
            time_horizon_years: 10,
            expected_return: 0.07,
            volatility: 0.15,
            goal_amount: 0.0,
            iterations: default_iterations(),
            inflation_rate: 0.0,
            seed: None,
        }
    }
}

impl SimulationParameters {
    /// Check every field, naming the first offender.
    ///
    /// `max_iterations` comes from the engine configuration.
    pub fn validate(&self, max_iterations: usize) -> Result<()> {
        non_negative("initial_portfolio_value", self.initial_portfolio_value)?;
        non_negative("monthly_contribution", self.monthly_contribution)?;
        non_negative("monthly_withdrawal", self.monthly_withdrawal)?;
        non_negative("goal_amount", self.goal_amount)?;
        non_negative("volatility", self.volatility)?;
        non_negative("inflation_rate", self.inflation_rate)?;

        if !self.expected_return.is_finite() || self.expected_return <= -1.0 {
            return Err(SimulationError::validation(
                "expected_return",
                format!(
                    "must be finite and greater than -1.0, got {}",
                    self.expected_return
                ),
            ));
        }
        if self.time_horizon_years > MAX_HORIZON_YEARS {
            return Err(SimulationError::validation(
                "time_horizon_years",
                format!(
                    "must be at most {MAX_HORIZON_YEARS}, got {}",
                    self.time_horizon_years
                ),
            ));
        }
        if self.iterations == 0 {
            return Err(SimulationError::validation(
                "iterations",
                "must be greater than zero",
            ));
        }
        if self.iterations > max_iterations {
            return Err(SimulationError::validation(
                "iterations",
                format!("must be at most {max_iterations}, got {}", self.iterations),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Contribution for simulation year `year` (0-based), inflation-grown
    pub(crate) fn annual_contribution(&self, year: u32) -> f64 {
        self.monthly_contribution * 12.0 * self.inflation_factor(year)
    }

    /// Withdrawal need for simulation year `year` (0-based), inflation-grown
    pub(crate) fn annual_withdrawal(&self, year: u32) -> f64 {
        self.monthly_withdrawal * 12.0 * self.inflation_factor(year)
    }

    fn inflation_factor(&self, year: u32) -> f64 {
        (1.0 + self.inflation_rate).powi(year as i32)
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::validation(
            field,
            format!("must be finite and non-negative, got {value}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SimulationParameters {
        SimulationParameters {
            initial_portfolio_value: 10_000.0,
            goal_amount: 20_000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_parameters() {
        assert!(params().validate(100_000).is_ok());
    }

    #[test]
    fn test_negative_initial_value_names_field() {
        let p = SimulationParameters {
            initial_portfolio_value: -1.0,
            ..params()
        };
        match p.validate(100_000) {
            Err(SimulationError::Validation { field, .. }) => {
                assert_eq!(field, "initial_portfolio_value")
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let p = params().with_iterations(0);
        assert!(matches!(
            p.validate(100_000),
            Err(SimulationError::Validation {
                field: "iterations",
                ..
            })
        ));
    }

    #[test]
    fn test_iterations_above_limit_rejected() {
        let p = params().with_iterations(5_001);
        assert!(p.validate(5_000).is_err());
        assert!(p.validate(10_000).is_ok());
    }

    #[test]
    fn test_nan_volatility_rejected() {
        let p = SimulationParameters {
            volatility: f64::NAN,
            ..params()
        };
        assert!(matches!(
            p.validate(100_000),
            Err(SimulationError::Validation {
                field: "volatility",
                ..
            })
        ));
    }

    #[test]
    fn test_total_loss_return_rejected() {
        let p = SimulationParameters {
            expected_return: -1.0,
            ..params()
        };
        assert!(p.validate(100_000).is_err());
    }

    #[test]
    fn test_inflation_grows_cash_flows() {
        let p = SimulationParameters {
            monthly_contribution: 100.0,
            monthly_withdrawal: 50.0,
            inflation_rate: 0.10,
            ..params()
        };
        assert!((p.annual_contribution(0) - 1_200.0).abs() < 1e-9);
        assert!((p.annual_contribution(2) - 1_452.0).abs() < 1e-9);
        assert!((p.annual_withdrawal(1) - 660.0).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let json = r#"{
            "initial_portfolio_value": 1000.0,
            "time_horizon_years": 5,
            "expected_return": 0.05,
            "volatility": 0.1,
            "goal_amount": 2000.0
        }"#;
        let p: SimulationParameters = serde_json::from_str(json).unwrap();
        assert_eq!(p.iterations, 1_000);
        assert_eq!(p.seed, None);
        assert_eq!(p.monthly_contribution, 0.0);
    }
}
