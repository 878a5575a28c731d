//! Sensitivity analysis over goal inputs.
//!
//! Three kinds of sweep are supported:
//!
//! ```ignore
//! use goalsim_core::analysis::{SensitivityAnalyzer, SweepConfig};
//!
//! let analyzer = SensitivityAnalyzer::new(SimulationEngine::default(), SweepConfig::default());
//!
//! // Tornado data: each variable swept ±20% over 5 points, ranked by impact
//! let ranked = analyzer.one_way_sensitivity(
//!     &goal,
//!     &["monthly_contribution", "expected_return", "volatility"],
//!     20.0,
//!     5,
//!     1_000,
//! )?;
//!
//! // Heat map: 7x7 grid of contribution against years
//! let grid = analyzer.two_way_sensitivity(
//!     &goal,
//!     "monthly_contribution",
//!     "years_to_goal",
//!     25.0,
//!     7,
//!     1_000,
//! )?;
//!
//! // Break-even: expected return needed for an 80% chance of success
//! let threshold = analyzer.threshold_analysis(&goal, "expected_return", 0.8, 0.0, 0.15, 30)?;
//! ```
//!
//! Long sweeps can be observed and cancelled through a shared [`SweepProgress`].

mod config;
mod evaluator;
mod results;

pub use config::{SensitivityVariable, SweepConfig, variation_values};
pub use evaluator::{SensitivityAnalyzer, SweepProgress};
pub use results::{SensitivityPoint, SensitivityResult, ThresholdResult, TwoWaySensitivityResult};
