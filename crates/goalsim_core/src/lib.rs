//! Goal-based Monte Carlo planning library
//!
//! This crate answers three questions about a savings or drawdown goal:
//! - How likely is it to succeed? ([`SimulationEngine`])
//! - What contribution, timeline, target or withdrawal rate hits a chosen
//!   probability? ([`GoalSolver`])
//! - Which inputs matter most, and where are the break-even points?
//!   ([`SensitivityAnalyzer`])
//!
//! ```ignore
//! use goalsim_core::{SimulationEngine, SimulationParameters};
//!
//! let params = SimulationParameters {
//!     initial_portfolio_value: 500_000.0,
//!     monthly_contribution: 2_083.0,
//!     time_horizon_years: 10,
//!     expected_return: 0.08,
//!     volatility: 0.15,
//!     goal_amount: 2_000_000.0,
//!     iterations: 5_000,
//!     ..Default::default()
//! };
//! let result = SimulationEngine::default().run(&params)?;
//! println!("{:.1}% chance of success", result.success_probability * 100.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod simulation;
pub mod solver;
pub mod stats;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use analysis::{
    SensitivityAnalyzer, SensitivityResult, SweepConfig, SweepProgress, ThresholdResult,
    TwoWaySensitivityResult,
};
pub use config::{EngineConfig, Settings};
pub use error::{Result, SimulationError};
pub use model::{Goal, SimulationParameters, SimulationResult, SimulationStatistics, YearProjection};
pub use simulation::SimulationEngine;
pub use solver::{GoalSolver, SolverConfig, SolverResult, SolverStatus};
