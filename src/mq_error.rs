//! Errors raised by the simulator

use thiserror::Error;

use crate::mq_interface::JobCount;

/// Errors that can occur while configuring or running a sweep
#[derive(Debug, Error)]
pub enum SimError {
    /// A probability parameter outside [0, 1]
    #[error("{name} must be a number between 0 and 1, got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// Any other rejected parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Every round failed on its first slot, so there is no wait time to report
    #[error("no wait-time samples for queue size {queue_size}: all {rounds} rounds completed zero jobs")]
    NoWaitSamples { queue_size: JobCount, rounds: u64 },

    /// Report output failed
    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),

    /// Scenario file could not be parsed
    #[error("invalid scenario: {0}")]
    Scenario(#[from] serde_yaml::Error),
}

impl SimError {
    /// Configuration errors are detected before any simulation runs
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimError::InvalidProbability { .. } | SimError::InvalidParameter(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_error_names_parameter() {
        let err = SimError::InvalidProbability {
            name: "failure probability",
            value: 1.5,
        };
        assert_eq!(
            err.to_string(),
            "failure probability must be a number between 0 and 1, got 1.5"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_no_wait_samples_is_not_configuration() {
        let err = SimError::NoWaitSamples {
            queue_size: 3,
            rounds: 60,
        };
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("queue size 3"));
    }
}
