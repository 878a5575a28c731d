//! Goal calibration
//!
//! Each operation calibrates one input of a [`Goal`] so the simulated success
//! probability lands within tolerance of a target, using
//! [`SimulationEngine`] as the only probability oracle.
//!
//! ```ignore
//! use goalsim_core::solver::{GoalSolver, SolverConfig};
//!
//! let solver = GoalSolver::new(SimulationEngine::default(), SolverConfig::default());
//! let result = solver.solve_contribution(&goal, 0.8, 0.02, 50)?;
//! if result.is_success() {
//!     println!("save ${:.0}/month", result.solved_variable_value);
//! }
//! ```
//!
//! Every evaluation within one search reuses the same base seed, so the
//! probability curve being bisected is a deterministic, monotone function of
//! the searched value.

mod bisection;
mod config;
mod result;

use std::time::{Duration, Instant};

pub use bisection::{Domain, Monotonicity, SearchSpec, bisect};
pub use config::SolverConfig;
pub use result::{SolverResult, SolverStatus, SolverStep};

use crate::error::{Result, SimulationError};
use crate::model::{Goal, MAX_HORIZON_YEARS};
use crate::simulation::{SimulationEngine, fresh_seed};

/// Terminal balance at or above which a drawdown portfolio counts as surviving
pub const SURVIVAL_FLOOR: f64 = 1.0;

/// Calibrates goal inputs against a target success probability
#[derive(Debug, Clone, Default)]
pub struct GoalSolver {
    engine: SimulationEngine,
    config: SolverConfig,
}

impl GoalSolver {
    #[must_use]
    pub fn new(engine: SimulationEngine, config: SolverConfig) -> Self {
        Self { engine, config }
    }

    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Success probability of `goal` under a fixed seed
    pub fn evaluate(&self, goal: &Goal, seed: u64) -> Result<f64> {
        let params = goal.to_parameters(self.config.iterations_per_evaluation, Some(seed));
        self.engine.success_probability(&params)
    }

    pub(crate) fn search_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(fresh_seed)
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.config
            .time_budget_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms))
    }

    /// Smallest monthly contribution reaching `target_probability`.
    ///
    /// Searches `[0, target / contributing months * safety factor]`.
    pub fn solve_contribution(
        &self,
        goal: &Goal,
        target_probability: f64,
        tolerance: f64,
        max_iterations: usize,
    ) -> Result<SolverResult> {
        goal.validate()?;
        validate_target(target_probability, tolerance)?;

        if goal.is_already_satisfied() {
            return Ok(SolverResult::immediate_success(
                0.0,
                1.0,
                "goal already funded, no contribution required",
            ));
        }
        let contributing_years = goal
            .years_to_goal
            .saturating_sub(goal.contribution_pause_years);
        if contributing_years == 0 {
            return Ok(SolverResult::immediate_no_solution(
                0.0,
                0.0,
                "no contributing months remain before the goal date",
            ));
        }

        let months = f64::from(contributing_years) * 12.0;
        let upper = goal.target_amount / months * self.config.contribution_safety_factor;
        let seed = self.search_seed();
        let spec = SearchSpec {
            low: 0.0,
            high: upper,
            target_probability,
            tolerance,
            max_iterations,
            monotonicity: Monotonicity::Increasing,
            domain: Domain::Continuous,
            deadline: self.deadline(),
        };

        bisect(&spec, |contribution| {
            self.evaluate(&goal.with_monthly_contribution(contribution), seed)
        })
    }

    /// Fewest whole years within `[min_years, max_years]` reaching
    /// `target_probability`.
    pub fn solve_timeline(
        &self,
        goal: &Goal,
        target_probability: f64,
        min_years: u32,
        max_years: u32,
    ) -> Result<SolverResult> {
        goal.validate()?;
        validate_target(target_probability, self.config.tolerance)?;
        if min_years > max_years || max_years > MAX_HORIZON_YEARS {
            return Err(SimulationError::invalid_value(format!(
                "year range must satisfy min <= max <= {MAX_HORIZON_YEARS}, got [{min_years}, {max_years}]"
            )));
        }

        if min_years == 0 && goal.current_amount >= goal.target_amount {
            return Ok(SolverResult::immediate_success(
                0.0,
                1.0,
                "goal already funded today",
            ));
        }

        let seed = self.search_seed();
        let spec = SearchSpec {
            low: f64::from(min_years),
            high: f64::from(max_years),
            target_probability,
            tolerance: self.config.tolerance,
            max_iterations: self.config.max_iterations,
            monotonicity: Monotonicity::Increasing,
            domain: Domain::Integer,
            deadline: self.deadline(),
        };

        bisect(&spec, |years| {
            self.evaluate(&goal.with_years_to_goal(years as u32), seed)
        })
    }

    /// Largest target amount reached with `target_probability`.
    ///
    /// The ceiling is just above the best terminal value of a baseline run,
    /// where probability is zero.
    pub fn solve_target_amount(
        &self,
        goal: &Goal,
        target_probability: f64,
    ) -> Result<SolverResult> {
        goal.validate()?;
        validate_target(target_probability, self.config.tolerance)?;

        if goal.years_to_goal == 0 {
            return Ok(SolverResult::immediate_success(
                goal.current_amount,
                1.0,
                "no time remains, the current amount is the reachable target",
            ));
        }

        let seed = self.search_seed();
        let baseline = self.engine.run(
            &goal.to_parameters(self.config.iterations_per_evaluation, Some(seed)),
        )?;
        let upper = baseline.statistics.max_final_value * 1.01 + 1.0;

        let spec = SearchSpec {
            low: 0.0,
            high: upper,
            target_probability,
            tolerance: self.config.tolerance,
            max_iterations: self.config.max_iterations,
            monotonicity: Monotonicity::Decreasing,
            domain: Domain::Continuous,
            deadline: self.deadline(),
        };

        let mut result = bisect(&spec, |amount| {
            self.evaluate(&goal.with_target_amount(amount), seed)
        })?;
        result.iterations_used += 1;
        Ok(result)
    }

    /// Largest annual withdrawal rate (fraction of `current_amount`) the
    /// portfolio survives with `target_probability`.
    ///
    /// Runs a drawdown simulation: no contributions, inflation-grown
    /// withdrawals, success when the final balance stays at or above
    /// [`SURVIVAL_FLOOR`].
    pub fn solve_withdrawal_rate(
        &self,
        goal: &Goal,
        target_probability: f64,
        min_rate: f64,
        max_rate: f64,
    ) -> Result<SolverResult> {
        goal.validate()?;
        validate_target(target_probability, self.config.tolerance)?;
        if !(0.0..=1.0).contains(&min_rate)
            || !(0.0..=1.0).contains(&max_rate)
            || min_rate >= max_rate
        {
            return Err(SimulationError::invalid_value(format!(
                "withdrawal rates must satisfy 0 <= min < max <= 1, got [{min_rate}, {max_rate}]"
            )));
        }

        if goal.years_to_goal == 0 {
            return Ok(if goal.current_amount >= SURVIVAL_FLOOR {
                SolverResult::immediate_success(max_rate, 1.0, "no drawdown years to simulate")
            } else {
                SolverResult::immediate_no_solution(min_rate, 0.0, "portfolio is already empty")
            });
        }

        let drawdown = Goal {
            monthly_contribution: 0.0,
            target_amount: SURVIVAL_FLOOR,
            contribution_pause_years: 0,
            ..goal.clone()
        };
        let seed = self.search_seed();
        let spec = SearchSpec {
            low: min_rate,
            high: max_rate,
            target_probability,
            tolerance: self.config.tolerance,
            max_iterations: self.config.max_iterations,
            monotonicity: Monotonicity::Decreasing,
            domain: Domain::Continuous,
            deadline: self.deadline(),
        };

        bisect(&spec, |rate| {
            let monthly = drawdown.current_amount * rate / 12.0;
            self.evaluate(&drawdown.with_monthly_withdrawal(monthly), seed)
        })
    }
}

pub(crate) fn validate_target(target_probability: f64, tolerance: f64) -> Result<()> {
    if !(target_probability > 0.0 && target_probability <= 1.0) {
        return Err(SimulationError::invalid_value(format!(
            "target probability must be within (0, 1], got {target_probability}"
        )));
    }
    if !(tolerance > 0.0 && tolerance < 1.0) {
        return Err(SimulationError::invalid_value(format!(
            "tolerance must be within (0, 1), got {tolerance}"
        )));
    }
    Ok(())
}
