use thiserror::Error;

/// Errors surfaced by the simulation, solver and sensitivity layers.
///
/// "Cannot reach the target" is not an error; see
/// [`SolverStatus::NoSolution`](crate::solver::SolverStatus::NoSolution).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A simulation parameter is malformed or out of range
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Too many trials produced non-finite balances
    #[error(
        "numerical instability: {unstable_trials} of {total_trials} trials went non-finite \
         (threshold {threshold})"
    )]
    NumericalInstability {
        unstable_trials: usize,
        total_trials: usize,
        threshold: f64,
    },

    /// A solver or sweep argument is invalid (bad goal state, unknown variable, ...)
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The operation observed a cancellation request or ran out of time
    #[error("operation cancelled")]
    Cancelled,

    /// A settings document could not be parsed or written
    #[error("configuration error: {0}")]
    Config(String),
}

impl SimulationError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_value(message: impl Into<String>) -> Self {
        SimulationError::InvalidValue(message.into())
    }

    /// Whether the caller can recover by fixing its input
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SimulationError::Validation { .. }
                | SimulationError::InvalidValue(_)
                | SimulationError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = SimulationError::validation("iterations", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "invalid iterations: must be greater than zero"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_instability_is_not_input_error() {
        let err = SimulationError::NumericalInstability {
            unstable_trials: 40,
            total_trials: 100,
            threshold: 0.01,
        };
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("40 of 100"));
    }
}
