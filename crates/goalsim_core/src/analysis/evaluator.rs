//! Sweep evaluator - runs the engine over perturbed copies of a goal.
//!
//! Every point of one sweep is an independent engine run over the same base
//! seed, so points can be evaluated in any order (in parallel with the
//! `parallel` feature) and are collected back in sweep order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::error::{Result, SimulationError};
use crate::model::Goal;
use crate::simulation::{SimulationEngine, fresh_seed};
use crate::solver::{Domain, Monotonicity, SearchSpec, bisect, validate_target};

use super::config::{SensitivityVariable, SweepConfig, variation_values};
use super::results::{
    SensitivityPoint, SensitivityResult, ThresholdResult, TwoWaySensitivityResult,
};

/// Progress tracking for sweep analysis
#[derive(Debug, Clone)]
pub struct SweepProgress {
    /// Completed points counter
    completed: Arc<AtomicUsize>,
    /// Total points
    total: Arc<AtomicUsize>,
    /// Cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl SweepProgress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Points expected by the running operation (an upper bound for threshold searches)
    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    /// Request cancellation; in-flight points finish, no new ones start
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for SweepProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Runs one-way, two-way and threshold sweeps over goal inputs
#[derive(Debug, Clone, Default)]
pub struct SensitivityAnalyzer {
    engine: SimulationEngine,
    config: SweepConfig,
    progress: Option<SweepProgress>,
}

impl SensitivityAnalyzer {
    #[must_use]
    pub fn new(engine: SimulationEngine, config: SweepConfig) -> Self {
        Self {
            engine,
            config,
            progress: None,
        }
    }

    /// Report progress to (and observe cancellation from) `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: SweepProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    #[must_use]
    pub fn progress(&self) -> Option<&SweepProgress> {
        self.progress.as_ref()
    }

    /// Sweep each named variable across `baseline ± variation_percentage %`.
    ///
    /// Results are ranked by `impact_range`, largest first; variables with
    /// equal impact keep the order they were named in.
    ///
    /// # Errors
    /// [`SimulationError::InvalidValue`] for an invalid goal, an unknown
    /// variable name or non-positive sweep arguments. Engine errors from any
    /// point abort the whole sweep.
    pub fn one_way_sensitivity<S: AsRef<str>>(
        &self,
        goal: &Goal,
        variables: &[S],
        variation_percentage: f64,
        num_points: usize,
        iterations_per_point: usize,
    ) -> Result<Vec<SensitivityResult>> {
        goal.validate()?;
        validate_sweep(variation_percentage, num_points, iterations_per_point)?;
        if variables.is_empty() {
            return Err(SimulationError::invalid_value(
                "at least one sweep variable required",
            ));
        }
        let variables = variables
            .iter()
            .map(|name| name.as_ref().parse::<SensitivityVariable>())
            .collect::<Result<Vec<_>>>()?;

        let seed = self.sweep_seed();
        let deadline = self.deadline();
        let baseline_probability = self.evaluate(goal, iterations_per_point, seed)?;

        let sweeps: Vec<(SensitivityVariable, Vec<f64>)> = variables
            .iter()
            .map(|&v| {
                let values =
                    variation_values(v, v.baseline(goal), variation_percentage, num_points);
                (v, values)
            })
            .collect();
        let goals: Vec<Goal> = sweeps
            .iter()
            .flat_map(|(v, values)| values.iter().map(move |&x| v.apply(goal, x)))
            .collect();

        self.reset_progress(goals.len());
        let probabilities = self.evaluate_all(&goals, iterations_per_point, seed, deadline)?;

        let mut offset = 0;
        let mut results: Vec<SensitivityResult> = sweeps
            .into_iter()
            .map(|(variable, values)| {
                let data = values
                    .iter()
                    .zip(&probabilities[offset..offset + values.len()])
                    .map(|(&value, &probability)| SensitivityPoint { value, probability })
                    .collect();
                offset += values.len();
                SensitivityResult::new(
                    variable,
                    variable.baseline(goal),
                    baseline_probability,
                    data,
                )
            })
            .collect();

        results.sort_by(|a, b| b.impact_range.total_cmp(&a.impact_range));
        info!(
            variables = results.len(),
            points = goals.len(),
            seed,
            "one-way sensitivity complete"
        );
        Ok(results)
    }

    /// Sweep two variables jointly over an N×N grid.
    ///
    /// # Errors
    /// As [`one_way_sensitivity`](Self::one_way_sensitivity), plus
    /// [`SimulationError::InvalidValue`] when both axes name the same variable.
    pub fn two_way_sensitivity(
        &self,
        goal: &Goal,
        variable_x: &str,
        variable_y: &str,
        variation_percentage: f64,
        num_points_per_axis: usize,
        iterations_per_point: usize,
    ) -> Result<TwoWaySensitivityResult> {
        goal.validate()?;
        validate_sweep(variation_percentage, num_points_per_axis, iterations_per_point)?;
        let x: SensitivityVariable = variable_x.parse()?;
        let y: SensitivityVariable = variable_y.parse()?;
        if x == y {
            return Err(SimulationError::invalid_value(format!(
                "two-way sweep needs two different variables, got '{x}' twice"
            )));
        }

        let n = num_points_per_axis;
        let x_values = variation_values(x, x.baseline(goal), variation_percentage, n);
        let y_values = variation_values(y, y.baseline(goal), variation_percentage, n);

        // Row-major: y outer, x inner
        let goals: Vec<Goal> = y_values
            .iter()
            .flat_map(|&yv| {
                let row = y.apply(goal, yv);
                x_values
                    .iter()
                    .map(move |&xv| x.apply(&row, xv))
                    .collect::<Vec<_>>()
            })
            .collect();

        let seed = self.sweep_seed();
        let deadline = self.deadline();
        self.reset_progress(goals.len());
        let probabilities = self.evaluate_all(&goals, iterations_per_point, seed, deadline)?;

        let heat_map_data: Vec<Vec<f64>> = probabilities
            .chunks(x_values.len())
            .map(<[f64]>::to_vec)
            .collect();
        let contour_levels = contour_levels(&probabilities, self.config.contour_levels);

        info!(
            x = %x,
            y = %y,
            points = goals.len(),
            seed,
            "two-way sensitivity complete"
        );
        Ok(TwoWaySensitivityResult {
            variable_x: x,
            variable_y: y,
            x_values,
            y_values,
            heat_map_data,
            contour_levels,
        })
    }

    /// Bisect `[min_value, max_value]` of a named variable for the value whose
    /// success probability lands within tolerance of `target_probability`.
    ///
    /// The direction of the search is read from the two endpoints, so both
    /// "more helps" and "more hurts" variables work. Whole years are searched
    /// for `years_to_goal`.
    pub fn threshold_analysis(
        &self,
        goal: &Goal,
        variable: &str,
        target_probability: f64,
        min_value: f64,
        max_value: f64,
        max_iterations: usize,
    ) -> Result<ThresholdResult> {
        goal.validate()?;
        validate_target(target_probability, self.config.tolerance)?;
        let variable: SensitivityVariable = variable.parse()?;
        if !min_value.is_finite() || !max_value.is_finite() || min_value > max_value {
            return Err(SimulationError::invalid_value(format!(
                "threshold bounds must be finite with min <= max, got [{min_value}, {max_value}]"
            )));
        }
        if max_iterations == 0 {
            return Err(SimulationError::invalid_value(
                "max_iterations must be greater than zero",
            ));
        }

        let domain = if variable.is_integer() {
            Domain::Integer
        } else {
            Domain::Continuous
        };
        let (low, high) = match domain {
            Domain::Continuous => (min_value, max_value),
            Domain::Integer => (min_value.ceil(), max_value.floor()),
        };
        if low > high {
            return Err(SimulationError::invalid_value(format!(
                "no whole number within [{min_value}, {max_value}]"
            )));
        }

        let seed = self.sweep_seed();
        let iterations = self.config.iterations_per_evaluation;
        self.reset_progress(max_iterations + 2);

        // Probes repeat at the bounds; each distinct value is simulated once
        let mut memo: FxHashMap<u64, f64> = FxHashMap::default();
        let mut oracle = |value: f64| -> Result<f64> {
            if let Some(&p) = memo.get(&value.to_bits()) {
                return Ok(p);
            }
            let p = self.evaluate_point(&variable.apply(goal, value), iterations, seed, None)?;
            memo.insert(value.to_bits(), p);
            Ok(p)
        };

        let p_low = oracle(low)?;
        let p_high = oracle(high)?;
        let monotonicity = if p_high >= p_low {
            Monotonicity::Increasing
        } else {
            Monotonicity::Decreasing
        };
        debug!(%variable, p_low, p_high, ?monotonicity, "threshold direction");

        let spec = SearchSpec {
            low,
            high,
            target_probability,
            tolerance: self.config.tolerance,
            max_iterations,
            monotonicity,
            domain,
            deadline: self.deadline(),
        };
        let mut result = bisect(&spec, &mut oracle)?;
        result.iterations_used = memo.len();

        info!(
            %variable,
            status = ?result.status,
            value = result.solved_variable_value,
            "threshold analysis complete"
        );
        Ok(ThresholdResult {
            variable,
            target_probability,
            result,
        })
    }

    fn sweep_seed(&self) -> u64 {
        self.config.seed.unwrap_or_else(fresh_seed)
    }

    fn deadline(&self) -> Option<Instant> {
        self.config
            .time_budget_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms))
    }

    fn reset_progress(&self, total: usize) {
        if let Some(p) = &self.progress {
            p.reset(total);
        }
    }

    fn evaluate(&self, goal: &Goal, iterations: usize, seed: u64) -> Result<f64> {
        let params = goal.to_parameters(iterations, Some(seed));
        self.engine.success_probability(&params)
    }

    /// One sweep point: checks cancellation and the deadline before running
    fn evaluate_point(
        &self,
        goal: &Goal,
        iterations: usize,
        seed: u64,
        deadline: Option<Instant>,
    ) -> Result<f64> {
        if self.progress.as_ref().is_some_and(SweepProgress::is_cancelled)
            || deadline.is_some_and(|d| Instant::now() >= d)
        {
            return Err(SimulationError::Cancelled);
        }
        let probability = self.evaluate(goal, iterations, seed)?;
        if let Some(p) = &self.progress {
            p.increment();
        }
        Ok(probability)
    }

    fn evaluate_all(
        &self,
        goals: &[Goal],
        iterations: usize,
        seed: u64,
        deadline: Option<Instant>,
    ) -> Result<Vec<f64>> {
        #[cfg(feature = "parallel")]
        let probabilities: Result<Vec<f64>> = goals
            .par_iter()
            .map(|g| self.evaluate_point(g, iterations, seed, deadline))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let probabilities: Result<Vec<f64>> = goals
            .iter()
            .map(|g| self.evaluate_point(g, iterations, seed, deadline))
            .collect();

        probabilities
    }
}

fn validate_sweep(
    variation_percentage: f64,
    num_points: usize,
    iterations_per_point: usize,
) -> Result<()> {
    if !(variation_percentage.is_finite() && variation_percentage > 0.0) {
        return Err(SimulationError::invalid_value(format!(
            "variation_percentage must be positive, got {variation_percentage}"
        )));
    }
    if num_points == 0 {
        return Err(SimulationError::invalid_value(
            "num_points must be greater than zero",
        ));
    }
    if iterations_per_point == 0 {
        return Err(SimulationError::invalid_value(
            "iterations_per_point must be greater than zero",
        ));
    }
    Ok(())
}

/// `count` evenly spaced levels strictly between the lowest and highest
/// probability; empty for a flat surface
pub(crate) fn contour_levels(probabilities: &[f64], count: usize) -> Vec<f64> {
    let (lo, hi) = probabilities
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &p| {
            (lo.min(p), hi.max(p))
        });
    if probabilities.is_empty() || hi <= lo {
        return Vec::new();
    }
    let step = (hi - lo) / (count + 1) as f64;
    (1..=count).map(|k| lo + step * k as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts_and_cancels() {
        let progress = SweepProgress::new(4);
        progress.increment();
        progress.increment();
        assert_eq!(progress.completed(), 2);
        assert_eq!(progress.total(), 4);

        let shared = progress.clone();
        shared.cancel();
        assert!(progress.is_cancelled());

        progress.reset(10);
        assert_eq!(progress.completed(), 0);
        assert_eq!(progress.total(), 10);
    }

    #[test]
    fn test_contour_levels_inside_range() {
        let levels = contour_levels(&[0.0, 0.5, 1.0], 3);
        assert_eq!(levels.len(), 3);
        for (l, e) in levels.iter().zip([0.25, 0.5, 0.75]) {
            assert!((l - e).abs() < 1e-12);
        }
        assert!(contour_levels(&[0.4, 0.4], 5).is_empty());
    }

    #[test]
    fn test_validate_sweep_arguments() {
        assert!(validate_sweep(20.0, 5, 100).is_ok());
        assert!(validate_sweep(0.0, 5, 100).is_err());
        assert!(validate_sweep(-10.0, 5, 100).is_err());
        assert!(validate_sweep(20.0, 0, 100).is_err());
        assert!(validate_sweep(20.0, 5, 0).is_err());
    }
}
