//! Engine, solver and sweep settings
//!
//! Every setting has a serde default so partial YAML documents are accepted:
//!
//! ```ignore
//! use goalsim_core::config::Settings;
//!
//! let settings = Settings::from_yaml("engine:\n  nan_threshold: 0.05\n")?;
//! let engine = SimulationEngine::new(settings.engine);
//! ```

use serde::{Deserialize, Serialize};

use crate::analysis::SweepConfig;
use crate::error::{Result, SimulationError};
use crate::solver::SolverConfig;

/// Hard upper bound on trials per run
pub const MAX_ITERATIONS: usize = 100_000;

fn default_nan_threshold() -> f64 {
    0.01
}

fn default_sentinel_value() -> f64 {
    1e15
}

fn default_batch_size() -> usize {
    100
}

fn default_max_iterations() -> usize {
    MAX_ITERATIONS
}

/// Tuning knobs for [`SimulationEngine`](crate::simulation::SimulationEngine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest fraction of trials allowed to go non-finite before the run fails
    #[serde(default = "default_nan_threshold")]
    pub nan_threshold: f64,

    /// Value non-finite balances are clipped to
    #[serde(default = "default_sentinel_value")]
    pub sentinel_value: f64,

    /// Trials per parallel work unit
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Largest accepted `SimulationParameters::iterations`
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nan_threshold: default_nan_threshold(),
            sentinel_value: default_sentinel_value(),
            batch_size: default_batch_size(),
            max_iterations: default_max_iterations(),
        }
    }
}

impl EngineConfig {
    /// Check the settings are usable before any run starts
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.nan_threshold) {
            return Err(SimulationError::Config(format!(
                "nan_threshold must be within [0, 1], got {}",
                self.nan_threshold
            )));
        }
        if !self.sentinel_value.is_finite() || self.sentinel_value <= 0.0 {
            return Err(SimulationError::Config(format!(
                "sentinel_value must be positive and finite, got {}",
                self.sentinel_value
            )));
        }
        if self.batch_size == 0 {
            return Err(SimulationError::Config(
                "batch_size must be greater than zero".to_string(),
            ));
        }
        if self.max_iterations == 0 || self.max_iterations > MAX_ITERATIONS {
            return Err(SimulationError::Config(format!(
                "max_iterations must be within [1, {MAX_ITERATIONS}], got {}",
                self.max_iterations
            )));
        }
        Ok(())
    }
}

/// All settings in one document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl Settings {
    /// Parse settings from YAML, filling in defaults for missing keys
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let settings: Settings =
            serde_saphyr::from_str(yaml).map_err(|e| SimulationError::Config(e.to_string()))?;
        settings.engine.validate()?;
        Ok(settings)
    }

    /// Serialize settings to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).map_err(|e| SimulationError::Config(e.to_string()))
    }
}
