//! Savings goals and their translation into simulation parameters

use serde::{Deserialize, Serialize};

use super::params::SimulationParameters;
use crate::error::{Result, SimulationError};

/// A financial goal as callers describe it
///
/// Goals are immutable. Solvers and sweeps derive modified copies through the
/// `with_*` helpers and hand the engine [`Goal::to_parameters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Amount saved toward the goal today
    pub current_amount: f64,
    pub target_amount: f64,
    pub years_to_goal: u32,
    #[serde(default)]
    pub monthly_contribution: f64,
    #[serde(default)]
    pub monthly_withdrawal: f64,
    pub expected_return: f64,
    pub volatility: f64,
    #[serde(default)]
    pub inflation_rate: f64,
    /// Leading years during which no contributions are made
    #[serde(default)]
    pub contribution_pause_years: u32,
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            current_amount: 0.0,
            target_amount: 100_000.0,
            years_to_goal: 10,
            monthly_contribution: 0.0,
            monthly_withdrawal: 0.0,
            expected_return: 0.07,
            volatility: 0.15,
            inflation_rate: 0.0,
            contribution_pause_years: 0,
        }
    }
}

impl Goal {
    /// Cheap consistency checks run before any simulation
    pub fn validate(&self) -> Result<()> {
        if !self.current_amount.is_finite() || self.current_amount < 0.0 {
            return Err(SimulationError::invalid_value(format!(
                "current_amount must be non-negative, got {}",
                self.current_amount
            )));
        }
        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(SimulationError::invalid_value(format!(
                "target_amount must be positive, got {}",
                self.target_amount
            )));
        }
        if !self.monthly_contribution.is_finite() || self.monthly_contribution < 0.0 {
            return Err(SimulationError::invalid_value(format!(
                "monthly_contribution must be non-negative, got {}",
                self.monthly_contribution
            )));
        }
        if !self.monthly_withdrawal.is_finite() || self.monthly_withdrawal < 0.0 {
            return Err(SimulationError::invalid_value(format!(
                "monthly_withdrawal must be non-negative, got {}",
                self.monthly_withdrawal
            )));
        }
        Ok(())
    }

    /// Whether the goal is met today with nothing left to simulate
    #[must_use]
    pub fn is_already_satisfied(&self) -> bool {
        self.years_to_goal == 0 && self.current_amount >= self.target_amount
    }

    /// Monthly contribution after accounting for the contribution pause
    ///
    /// The pause removes whole contributing years, which is spread evenly
    /// over the horizon so the yearly engine sees one constant rate.
    #[must_use]
    pub fn effective_monthly_contribution(&self) -> f64 {
        if self.years_to_goal == 0 || self.contribution_pause_years >= self.years_to_goal {
            return 0.0;
        }
        let contributing = self.years_to_goal - self.contribution_pause_years;
        self.monthly_contribution * f64::from(contributing) / f64::from(self.years_to_goal)
    }

    /// Effective engine parameters for this goal
    #[must_use]
    pub fn to_parameters(&self, iterations: usize, seed: Option<u64>) -> SimulationParameters {
        SimulationParameters {
            initial_portfolio_value: self.current_amount,
            monthly_contribution: self.effective_monthly_contribution(),
            monthly_withdrawal: self.monthly_withdrawal,
            time_horizon_years: self.years_to_goal,
            expected_return: self.expected_return,
            volatility: self.volatility,
            goal_amount: self.target_amount,
            iterations,
            inflation_rate: self.inflation_rate,
            seed,
        }
    }

    #[must_use]
    pub fn with_monthly_contribution(&self, monthly_contribution: f64) -> Self {
        Self {
            monthly_contribution,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_years_to_goal(&self, years_to_goal: u32) -> Self {
        Self {
            years_to_goal,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_target_amount(&self, target_amount: f64) -> Self {
        Self {
            target_amount,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_monthly_withdrawal(&self, monthly_withdrawal: f64) -> Self {
        Self {
            monthly_withdrawal,
            ..self.clone()
        }
    }
}
