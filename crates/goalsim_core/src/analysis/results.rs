//! Sweep result types.

use serde::{Deserialize, Serialize};

use super::config::SensitivityVariable;
use crate::solver::SolverResult;

/// Probability observed at one swept value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub value: f64,
    pub probability: f64,
}

/// One-way sweep of a single variable (one bar of a tornado diagram)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub variable: SensitivityVariable,
    pub baseline_value: f64,
    pub baseline_probability: f64,
    /// Ascending by `value`
    pub sensitivity_data: Vec<SensitivityPoint>,
    pub min_probability: f64,
    pub max_probability: f64,
    /// `max_probability - min_probability`
    pub impact_range: f64,
}

impl SensitivityResult {
    pub(crate) fn new(
        variable: SensitivityVariable,
        baseline_value: f64,
        baseline_probability: f64,
        sensitivity_data: Vec<SensitivityPoint>,
    ) -> Self {
        let (min_probability, max_probability) = sensitivity_data.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), p| (lo.min(p.probability), hi.max(p.probability)),
        );
        let (min_probability, max_probability) = if sensitivity_data.is_empty() {
            (baseline_probability, baseline_probability)
        } else {
            (min_probability, max_probability)
        };
        Self {
            variable,
            baseline_value,
            baseline_probability,
            sensitivity_data,
            min_probability,
            max_probability,
            impact_range: max_probability - min_probability,
        }
    }
}

/// Two-way sweep over a Cartesian grid of two variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwoWaySensitivityResult {
    pub variable_x: SensitivityVariable,
    pub variable_y: SensitivityVariable,
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    /// `heat_map_data[row][col]` is the probability at `y_values[row]`, `x_values[col]`
    pub heat_map_data: Vec<Vec<f64>>,
    /// Evenly spaced probability bands strictly inside the grid's range
    pub contour_levels: Vec<f64>,
}

/// Threshold search over a named variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdResult {
    pub variable: SensitivityVariable,
    pub target_probability: f64,
    #[serde(flatten)]
    pub result: SolverResult,
}
