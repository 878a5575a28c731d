//! Bisection over a monotonic probability oracle
//!
//! The oracle maps a candidate value to a success probability. The search
//! assumes probability moves in one direction as the value grows and keeps a
//! bracket whose "easy" end meets the target and whose "hard" end does not.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::{Result, SimulationError};

use super::result::{SolverResult, SolverStatus, SolverStep};

/// How probability responds as the searched value grows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Monotonicity {
    /// More is better (contribution, years)
    Increasing,
    /// More is harder (target amount, withdrawal rate)
    Decreasing,
}

/// Whether candidates are whole numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Continuous,
    Integer,
}

/// One calibration problem
#[derive(Debug, Clone)]
pub struct SearchSpec {
    pub low: f64,
    pub high: f64,
    pub target_probability: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    pub monotonicity: Monotonicity,
    pub domain: Domain,
    pub deadline: Option<Instant>,
}

impl SearchSpec {
    fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() || self.low > self.high {
            return Err(SimulationError::invalid_value(format!(
                "search bounds must be finite with low <= high, got [{}, {}]",
                self.low, self.high
            )));
        }
        if !(self.target_probability > 0.0 && self.target_probability <= 1.0) {
            return Err(SimulationError::invalid_value(format!(
                "target probability must be within (0, 1], got {}",
                self.target_probability
            )));
        }
        if !(self.tolerance > 0.0 && self.tolerance < 1.0) {
            return Err(SimulationError::invalid_value(format!(
                "tolerance must be within (0, 1), got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SimulationError::invalid_value(
                "max_iterations must be greater than zero",
            ));
        }
        Ok(())
    }

    fn meets(&self, probability: f64) -> bool {
        probability >= self.target_probability - self.tolerance
    }

    fn converged(&self, probability: f64) -> bool {
        (probability - self.target_probability).abs() <= self.tolerance
    }
}

/// Evaluation log with the closest point seen so far
struct Tracker {
    history: Vec<SolverStep>,
    best: Option<SolverStep>,
    target: f64,
}

impl Tracker {
    fn record(&mut self, value: f64, probability: f64) {
        let step = SolverStep { value, probability };
        let closer = self.best.is_none_or(|b| {
            (probability - self.target).abs() <= (b.probability - self.target).abs()
        });
        if closer {
            self.best = Some(step);
        }
        self.history.push(step);
    }

    fn finish(
        self,
        status: SolverStatus,
        step: SolverStep,
        message: Option<String>,
    ) -> SolverResult {
        SolverResult {
            status,
            solved_variable_value: step.value,
            achieved_probability: step.probability,
            iterations_used: self.history.len(),
            message,
            history: self.history,
        }
    }

    fn no_solution(self, message: String) -> SolverResult {
        let best = self.best.unwrap_or(SolverStep {
            value: f64::NAN,
            probability: 0.0,
        });
        self.finish(SolverStatus::NoSolution, best, Some(message))
    }
}

/// Search `spec`'s interval for a value whose probability is within tolerance
/// of the target.
///
/// Oracle errors propagate; running out of bounds, iterations or time yields
/// a `NoSolution` result instead.
pub fn bisect<F>(spec: &SearchSpec, mut oracle: F) -> Result<SolverResult>
where
    F: FnMut(f64) -> Result<f64>,
{
    spec.validate()?;

    let (low, high) = match spec.domain {
        Domain::Continuous => (spec.low, spec.high),
        Domain::Integer => (spec.low.ceil(), spec.high.floor()),
    };
    if low > high {
        return Err(SimulationError::invalid_value(format!(
            "no whole number within [{}, {}]",
            spec.low, spec.high
        )));
    }

    let mut tracker = Tracker {
        history: Vec::new(),
        best: None,
        target: spec.target_probability,
    };

    let (hard, easy) = match spec.monotonicity {
        Monotonicity::Increasing => (low, high),
        Monotonicity::Decreasing => (high, low),
    };

    // The hard end already meeting the target means no extra effort is needed
    let p_hard = oracle(hard)?;
    tracker.record(hard, p_hard);
    if spec.meets(p_hard) {
        let step = SolverStep {
            value: hard,
            probability: p_hard,
        };
        info!(value = hard, probability = p_hard, "target met at search bound");
        return Ok(tracker.finish(SolverStatus::Success, step, None));
    }

    let p_easy = oracle(easy)?;
    tracker.record(easy, p_easy);
    if !spec.meets(p_easy) {
        let message = format!(
            "target probability {:.3} not reachable within [{low}, {high}]: best achievable {p_easy:.3}",
            spec.target_probability
        );
        info!(%message, "no solution");
        return Ok(tracker.no_solution(message));
    }

    let mut hard_end = hard;
    let mut easy_end = SolverStep {
        value: easy,
        probability: p_easy,
    };

    for iteration in 1..=spec.max_iterations {
        if spec.deadline.is_some_and(|d| Instant::now() >= d) {
            return Ok(tracker.no_solution(format!(
                "time budget exhausted after {} evaluations",
                iteration - 1
            )));
        }

        let mid = match spec.domain {
            Domain::Continuous => f64::midpoint(hard_end, easy_end.value),
            Domain::Integer => {
                if (easy_end.value - hard_end).abs() <= 1.0 {
                    // Adjacent whole numbers: the easy end is the tightest answer
                    return Ok(tracker.finish(SolverStatus::Success, easy_end, None));
                }
                f64::midpoint(hard_end, easy_end.value).floor()
            }
        };

        let p = oracle(mid)?;
        tracker.record(mid, p);
        debug!(iteration, value = mid, probability = p, "bisection step");

        if spec.converged(p) {
            info!(value = mid, probability = p, iteration, "solver converged");
            let step = SolverStep {
                value: mid,
                probability: p,
            };
            return Ok(tracker.finish(SolverStatus::Success, step, None));
        }

        if p < spec.target_probability {
            hard_end = mid;
        } else {
            easy_end = SolverStep {
                value: mid,
                probability: p,
            };
        }
    }

    if spec.domain == Domain::Integer && (easy_end.value - hard_end).abs() <= 1.0 {
        return Ok(tracker.finish(SolverStatus::Success, easy_end, None));
    }

    let message = format!(
        "no value within tolerance {} of target {:.3} after {} iterations",
        spec.tolerance, spec.target_probability, spec.max_iterations
    );
    info!(%message, "no solution");
    Ok(tracker.no_solution(message))
}
