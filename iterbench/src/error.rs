//! Error types

use std::time::Duration;
use thiserror::Error;

/// Failure of a whole suite run
#[derive(Debug, Error)]
pub enum BenchError {
    /// A suite was requested with no test cases
    #[error("cannot run a suite with no test cases")]
    EmptySuite,

    /// The setup function rejected its options
    #[error("setup failed: {0}")]
    Setup(#[from] SetupError),

    /// The setup options could not be encoded for the start banner
    #[error("failed to encode setup options: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The suite did not signal completion within the configured timeout
    #[error("suite did not complete within {0:?}")]
    Timeout(Duration),

    /// The engine went away without signalling completion
    #[error("benchmark engine stopped before signalling completion")]
    EngineStopped,
}

/// Failure while building the shared setup result
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// An option value cannot be used
    #[error("invalid option {name}: {reason}")]
    InvalidOption {
        /// Option name as it appears in the banner
        name: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

/// Failure reported by a single test-case executable
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseError {
    /// The computed result disagrees with the precomputed answer
    #[error("Wrong answer: expected {expected}, got {actual}")]
    WrongAnswer {
        /// Precomputed answer
        expected: u64,
        /// What the executable produced
        actual: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CaseError::WrongAnswer {
            expected: 20,
            actual: 18,
        };
        assert_eq!(err.to_string(), "Wrong answer: expected 20, got 18");

        let err = BenchError::from(SetupError::InvalidOption {
            name: "N",
            reason: "too large".to_string(),
        });
        assert_eq!(err.to_string(), "setup failed: invalid option N: too large");
    }
}
