//! Solver configuration

use serde::{Deserialize, Serialize};

fn default_iterations_per_evaluation() -> usize {
    1_000
}

fn default_tolerance() -> f64 {
    0.02
}

fn default_max_iterations() -> usize {
    50
}

fn default_contribution_safety_factor() -> f64 {
    3.0
}

/// Settings shared by every [`GoalSolver`](super::GoalSolver) operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Monte Carlo trials per probability evaluation
    #[serde(default = "default_iterations_per_evaluation")]
    pub iterations_per_evaluation: usize,

    /// Accepted distance between achieved and target probability
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Bisection steps allowed after the endpoints are evaluated
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Base seed for every evaluation in one search; drawn fresh when `None`
    #[serde(default)]
    pub seed: Option<u64>,

    /// Wall-clock budget per search in milliseconds
    #[serde(default)]
    pub time_budget_ms: Option<u64>,

    /// Multiplier on `target / months` giving the contribution search ceiling
    #[serde(default = "default_contribution_safety_factor")]
    pub contribution_safety_factor: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations_per_evaluation: default_iterations_per_evaluation(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
            seed: None,
            time_budget_ms: None,
            contribution_safety_factor: default_contribution_safety_factor(),
        }
    }
}
