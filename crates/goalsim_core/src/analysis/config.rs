//! Configuration types for sensitivity sweeps.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::model::{Goal, MAX_HORIZON_YEARS};

/// A goal input that can be swept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensitivityVariable {
    CurrentAmount,
    TargetAmount,
    MonthlyContribution,
    MonthlyWithdrawal,
    YearsToGoal,
    ExpectedReturn,
    Volatility,
    InflationRate,
}

impl SensitivityVariable {
    pub const ALL: [SensitivityVariable; 8] = [
        SensitivityVariable::CurrentAmount,
        SensitivityVariable::TargetAmount,
        SensitivityVariable::MonthlyContribution,
        SensitivityVariable::MonthlyWithdrawal,
        SensitivityVariable::YearsToGoal,
        SensitivityVariable::ExpectedReturn,
        SensitivityVariable::Volatility,
        SensitivityVariable::InflationRate,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SensitivityVariable::CurrentAmount => "current_amount",
            SensitivityVariable::TargetAmount => "target_amount",
            SensitivityVariable::MonthlyContribution => "monthly_contribution",
            SensitivityVariable::MonthlyWithdrawal => "monthly_withdrawal",
            SensitivityVariable::YearsToGoal => "years_to_goal",
            SensitivityVariable::ExpectedReturn => "expected_return",
            SensitivityVariable::Volatility => "volatility",
            SensitivityVariable::InflationRate => "inflation_rate",
        }
    }

    /// Whether the variable only takes whole values
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, SensitivityVariable::YearsToGoal)
    }

    /// Current value of this variable in `goal`
    #[must_use]
    pub fn baseline(&self, goal: &Goal) -> f64 {
        match self {
            SensitivityVariable::CurrentAmount => goal.current_amount,
            SensitivityVariable::TargetAmount => goal.target_amount,
            SensitivityVariable::MonthlyContribution => goal.monthly_contribution,
            SensitivityVariable::MonthlyWithdrawal => goal.monthly_withdrawal,
            SensitivityVariable::YearsToGoal => f64::from(goal.years_to_goal),
            SensitivityVariable::ExpectedReturn => goal.expected_return,
            SensitivityVariable::Volatility => goal.volatility,
            SensitivityVariable::InflationRate => goal.inflation_rate,
        }
    }

    /// Pull `value` into the variable's valid domain
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        match self {
            SensitivityVariable::TargetAmount => value.max(0.01),
            SensitivityVariable::YearsToGoal => {
                value.round().clamp(0.0, f64::from(MAX_HORIZON_YEARS))
            }
            SensitivityVariable::ExpectedReturn => value.max(-0.99),
            SensitivityVariable::CurrentAmount
            | SensitivityVariable::MonthlyContribution
            | SensitivityVariable::MonthlyWithdrawal
            | SensitivityVariable::Volatility
            | SensitivityVariable::InflationRate => value.max(0.0),
        }
    }

    /// Copy of `goal` with this variable set to `value` (clamped)
    #[must_use]
    pub fn apply(&self, goal: &Goal, value: f64) -> Goal {
        let value = self.clamp(value);
        let mut modified = goal.clone();
        match self {
            SensitivityVariable::CurrentAmount => modified.current_amount = value,
            SensitivityVariable::TargetAmount => modified.target_amount = value,
            SensitivityVariable::MonthlyContribution => modified.monthly_contribution = value,
            SensitivityVariable::MonthlyWithdrawal => modified.monthly_withdrawal = value,
            SensitivityVariable::YearsToGoal => modified.years_to_goal = value as u32,
            SensitivityVariable::ExpectedReturn => modified.expected_return = value,
            SensitivityVariable::Volatility => modified.volatility = value,
            SensitivityVariable::InflationRate => modified.inflation_rate = value,
        }
        modified
    }
}

impl fmt::Display for SensitivityVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SensitivityVariable {
    type Err = SimulationError;

    /// Accepts goal field names plus the simulation-parameter aliases
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "current_amount" | "initial_portfolio_value" => Ok(SensitivityVariable::CurrentAmount),
            "target_amount" | "goal_amount" => Ok(SensitivityVariable::TargetAmount),
            "monthly_contribution" => Ok(SensitivityVariable::MonthlyContribution),
            "monthly_withdrawal" => Ok(SensitivityVariable::MonthlyWithdrawal),
            "years_to_goal" | "time_horizon_years" => Ok(SensitivityVariable::YearsToGoal),
            "expected_return" => Ok(SensitivityVariable::ExpectedReturn),
            "volatility" => Ok(SensitivityVariable::Volatility),
            "inflation_rate" => Ok(SensitivityVariable::InflationRate),
            other => Err(SimulationError::invalid_value(format!(
                "unknown sensitivity variable '{other}'"
            ))),
        }
    }
}

/// Evenly spaced values across `baseline ± variation_percentage %`, ascending
///
/// A single point sweeps only the baseline.
#[must_use]
pub fn variation_values(
    variable: SensitivityVariable,
    baseline: f64,
    variation_percentage: f64,
    num_points: usize,
) -> Vec<f64> {
    if num_points <= 1 {
        return vec![variable.clamp(baseline)];
    }
    let spread = variation_percentage / 100.0;
    let a = baseline * (1.0 - spread);
    let b = baseline * (1.0 + spread);
    let (low, high) = (a.min(b), a.max(b));
    let step = (high - low) / (num_points - 1) as f64;
    (0..num_points)
        .map(|i| variable.clamp(low + step * i as f64))
        .collect()
}

fn default_iterations_per_evaluation() -> usize {
    1_000
}

fn default_contour_levels() -> usize {
    5
}

fn default_tolerance() -> f64 {
    0.02
}

/// Settings for a [`SensitivityAnalyzer`](super::SensitivityAnalyzer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Base seed shared by every point of one sweep; drawn fresh when `None`
    #[serde(default)]
    pub seed: Option<u64>,

    /// Monte Carlo iterations per threshold-search evaluation
    #[serde(default = "default_iterations_per_evaluation")]
    pub iterations_per_evaluation: usize,

    /// Number of probability bands derived for heat maps
    #[serde(default = "default_contour_levels")]
    pub contour_levels: usize,

    /// Accepted distance from the target in threshold searches
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Wall-clock budget per operation in milliseconds
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            seed: None,
            iterations_per_evaluation: default_iterations_per_evaluation(),
            contour_levels: default_contour_levels(),
            tolerance: default_tolerance(),
            time_budget_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!(
            "monthly_contribution".parse::<SensitivityVariable>().unwrap(),
            SensitivityVariable::MonthlyContribution
        );
        assert_eq!(
            "goal_amount".parse::<SensitivityVariable>().unwrap(),
            SensitivityVariable::TargetAmount
        );
        for variable in SensitivityVariable::ALL {
            assert_eq!(variable.name().parse::<SensitivityVariable>().unwrap(), variable);
        }
    }

    #[test]
    fn test_unknown_variable_rejected() {
        let err = "shoe_size".parse::<SensitivityVariable>().unwrap_err();
        assert!(matches!(err, SimulationError::InvalidValue(_)));
        assert!(err.to_string().contains("shoe_size"));
    }

    #[test]
    fn test_variation_values_span_percentage() {
        let values = variation_values(SensitivityVariable::MonthlyContribution, 1_000.0, 20.0, 5);
        let expected = [800.0, 900.0, 1_000.0, 1_100.0, 1_200.0];
        assert_eq!(values.len(), expected.len());
        for (v, e) in values.iter().zip(expected) {
            assert!((v - e).abs() < 1e-9, "{v} != {e}");
        }
    }

    #[test]
    fn test_variation_values_ascending_for_negative_baseline() {
        let values = variation_values(SensitivityVariable::ExpectedReturn, -0.02, 50.0, 3);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!((values[0] + 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_years_are_rounded() {
        let values = variation_values(SensitivityVariable::YearsToGoal, 10.0, 25.0, 4);
        assert!(values.iter().all(|v| v.fract() == 0.0));
    }

    #[test]
    fn test_apply_clamps_domain() {
        let goal = Goal::default();
        let g = SensitivityVariable::Volatility.apply(&goal, -0.1);
        assert_eq!(g.volatility, 0.0);
        let g = SensitivityVariable::YearsToGoal.apply(&goal, 12.6);
        assert_eq!(g.years_to_goal, 13);
        // Source untouched
        assert_eq!(goal.volatility, 0.15);
    }
}
