//! Scenario tests for the goal simulation library
//!
//! Tests are organized by topic:
//! - `engine` - Projection bands, deterministic growth and horizon edge cases
//! - `solver` - Calibration searches end to end
//! - `sensitivity` - One-way, two-way and threshold sweeps

mod solver;

use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness; `RUST_LOG` picks the level
pub(crate) fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
