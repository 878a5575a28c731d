//! Monte Carlo projection engine
//!
//! Trials advance together one year at a time. Only the current balance of
//! each trial is kept, so memory is O(iterations) regardless of horizon; the
//! yearly percentile bands are taken before the next step overwrites them.
//!
//! Every trial owns a private `SmallRng` seeded from a per-run master
//! generator, so results depend only on the seed and never on how work is
//! split across threads.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::{Result, SimulationError};
use crate::model::{ReturnModel, SimulationParameters, SimulationResult, YearProjection};
use crate::stats;

/// Per-trial state carried between years
struct Trial {
    balance: f64,
    rng: SmallRng,
    clipped: bool,
}

/// Cash flows and return model for one simulated year
#[derive(Clone, Copy)]
struct YearStep {
    model: ReturnModel,
    contribution: f64,
    withdrawal: f64,
    sentinel: f64,
}

impl YearStep {
    /// Return on the opening balance, then contributions, then withdrawals
    /// capped at what is left.
    fn apply(&self, trial: &mut Trial) {
        let grown = trial.balance * self.model.sample(&mut trial.rng) + self.contribution;
        if !grown.is_finite() {
            trial.clipped = true;
            trial.balance = self.sentinel;
            return;
        }
        trial.balance = grown - self.withdrawal.min(grown);
    }
}

/// Draw a base seed from the thread-local generator
///
/// Used when callers do not fix one. No state is shared between threads.
#[must_use]
pub fn fresh_seed() -> u64 {
    rand::rng().next_u64()
}

/// Runs Monte Carlo evaluations of [`SimulationParameters`]
///
/// The engine is stateless apart from its configuration and can be shared
/// freely across threads.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    config: EngineConfig,
}

impl SimulationEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one evaluation.
    ///
    /// # Errors
    /// - [`SimulationError::Validation`] for out-of-range parameters
    /// - [`SimulationError::NumericalInstability`] when more than
    ///   `nan_threshold` of the trials go non-finite
    pub fn run(&self, params: &SimulationParameters) -> Result<SimulationResult> {
        self.config.validate()?;
        params.validate(self.config.max_iterations)?;

        if params.time_horizon_years == 0 {
            return Ok(immediate_result(params));
        }

        let model = ReturnModel::new(params.expected_return, params.volatility)?;
        let seed = params.seed.unwrap_or_else(fresh_seed);
        debug!(
            iterations = params.iterations,
            years = params.time_horizon_years,
            seed,
            "running monte carlo simulation"
        );

        let mut trials = seed_trials(params, seed);
        let mut projections = Vec::with_capacity(params.time_horizon_years as usize + 1);
        projections.push(YearProjection::flat(0, params.initial_portfolio_value));

        let mut balances = vec![0.0; trials.len()];
        for year in 0..params.time_horizon_years {
            let step = YearStep {
                model,
                contribution: params.annual_contribution(year),
                withdrawal: params.annual_withdrawal(year),
                sentinel: self.config.sentinel_value,
            };
            self.advance(&mut trials, step);

            let clipped = trials.iter().filter(|t| t.clipped).count();
            self.check_stability(clipped, trials.len())?;

            for (slot, trial) in balances.iter_mut().zip(&trials) {
                *slot = trial.balance;
            }
            projections.push(stats::year_projection(year + 1, &balances));
        }

        let clipped_trials = trials.iter().filter(|t| t.clipped).count();
        if clipped_trials > 0 {
            warn!(
                clipped_trials,
                total = trials.len(),
                "trials clipped to sentinel after going non-finite"
            );
        }

        let success_probability = stats::fraction(&balances, |v| v >= params.goal_amount);
        let statistics = stats::summarize(&balances, params.initial_portfolio_value);

        Ok(SimulationResult {
            success_probability,
            iterations_run: balances.len(),
            final_portfolio_distribution: balances,
            portfolio_projections: projections,
            statistics,
            clipped_trials,
        })
    }

    /// Convenience wrapper returning only the success probability
    pub fn success_probability(&self, params: &SimulationParameters) -> Result<f64> {
        self.run(params).map(|r| r.success_probability)
    }

    fn advance(&self, trials: &mut [Trial], step: YearStep) {
        #[cfg(feature = "parallel")]
        trials
            .par_chunks_mut(self.config.batch_size)
            .for_each(|batch| batch.iter_mut().for_each(|t| step.apply(t)));

        #[cfg(not(feature = "parallel"))]
        trials
            .chunks_mut(self.config.batch_size)
            .for_each(|batch| batch.iter_mut().for_each(|t| step.apply(t)));
    }

    fn check_stability(&self, unstable_trials: usize, total_trials: usize) -> Result<()> {
        let fraction = unstable_trials as f64 / total_trials as f64;
        if fraction > self.config.nan_threshold {
            return Err(SimulationError::NumericalInstability {
                unstable_trials,
                total_trials,
                threshold: self.config.nan_threshold,
            });
        }
        Ok(())
    }
}

fn seed_trials(params: &SimulationParameters, seed: u64) -> Vec<Trial> {
    let mut master = SmallRng::seed_from_u64(seed);
    (0..params.iterations)
        .map(|_| Trial {
            balance: params.initial_portfolio_value,
            rng: SmallRng::seed_from_u64(master.next_u64()),
            clipped: false,
        })
        .collect()
}

/// Zero-horizon result: the goal is judged on today's value, no draws are made
fn immediate_result(params: &SimulationParameters) -> SimulationResult {
    let value = params.initial_portfolio_value;
    let success_probability = if value >= params.goal_amount { 1.0 } else { 0.0 };
    let distribution = vec![value; params.iterations];
    let statistics = stats::summarize(&distribution, value);

    SimulationResult {
        success_probability,
        iterations_run: params.iterations,
        final_portfolio_distribution: distribution,
        portfolio_projections: vec![YearProjection::flat(0, value)],
        statistics,
        clipped_trials: 0,
    }
}
