//! Solver result types

use serde::{Deserialize, Serialize};

/// Whether a calibration search hit its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Success,
    /// Bounds, iteration budget or time budget ran out first
    NoSolution,
}

/// One probability evaluation made during a search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverStep {
    pub value: f64,
    pub probability: f64,
}

/// Outcome of a calibration search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverResult {
    pub status: SolverStatus,
    /// The solution, or the closest value found for `NoSolution`
    pub solved_variable_value: f64,
    pub achieved_probability: f64,
    /// Number of simulations run
    pub iterations_used: usize,
    /// Diagnostic for `NoSolution` and short-circuited results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Every evaluation in the order it was made
    #[serde(default)]
    pub history: Vec<SolverStep>,
}

impl SolverResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == SolverStatus::Success
    }

    /// Success decided without running any simulation
    #[must_use]
    pub fn immediate_success(value: f64, probability: f64, message: impl Into<String>) -> Self {
        Self {
            status: SolverStatus::Success,
            solved_variable_value: value,
            achieved_probability: probability,
            iterations_used: 0,
            message: Some(message.into()),
            history: Vec::new(),
        }
    }

    /// No solution decided without running any simulation
    #[must_use]
    pub fn immediate_no_solution(value: f64, probability: f64, message: impl Into<String>) -> Self {
        Self {
            status: SolverStatus::NoSolution,
            solved_variable_value: value,
            achieved_probability: probability,
            iterations_used: 0,
            message: Some(message.into()),
            history: Vec::new(),
        }
    }
}
