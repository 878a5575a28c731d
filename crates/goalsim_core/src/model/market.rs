//! Annual return distribution
//!
//! Gross annual returns (`1 + r`) are lognormal, parameterized so the
//! arithmetic mean is `1 + expected_return` and the standard deviation is
//! `volatility`:
//!
//! ```text
//! s^2 = ln(1 + volatility^2 / (1 + expected_return)^2)
//! m   = ln(1 + expected_return) - s^2 / 2
//! ```

use rand::Rng;
use rand_distr::{Distribution, LogNormal};

use crate::error::{Result, SimulationError};

/// Draws gross annual growth factors
#[derive(Debug, Clone, Copy)]
pub enum ReturnModel {
    /// Zero volatility: every year grows by the same factor
    Fixed(f64),
    LogNormal(LogNormal<f64>),
}

impl ReturnModel {
    pub fn new(expected_return: f64, volatility: f64) -> Result<Self> {
        let gross_mean = 1.0 + expected_return;
        if !gross_mean.is_finite() || gross_mean <= 0.0 {
            return Err(SimulationError::validation(
                "expected_return",
                format!("must be greater than -1.0, got {expected_return}"),
            ));
        }
        if volatility == 0.0 {
            return Ok(ReturnModel::Fixed(gross_mean));
        }

        let s2 = (1.0 + (volatility * volatility) / (gross_mean * gross_mean)).ln();
        let m = gross_mean.ln() - s2 / 2.0;
        LogNormal::new(m, s2.sqrt())
            .map(ReturnModel::LogNormal)
            .map_err(|_| {
                SimulationError::validation(
                    "volatility",
                    format!("must be positive and finite, got {volatility}"),
                )
            })
    }

    /// Sample one year's gross growth factor
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            ReturnModel::Fixed(factor) => *factor,
            ReturnModel::LogNormal(dist) => dist.sample(rng),
        }
    }
}
