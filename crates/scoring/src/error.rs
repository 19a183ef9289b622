//! Error types for the scoring crate.

use thiserror::Error;

use crate::thresholds::Metric;

/// Errors raised at the configuration boundary.
///
/// Scoring itself is total; these only come out of explicit validation or
/// config parsing.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Failed to parse or serialize a scoring configuration
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A threshold pair whose good bound lies above its poor bound
    #[error("Invalid thresholds for {metric}: good ({good}ms) is greater than poor ({poor}ms)")]
    InvalidThresholds { metric: Metric, good: f64, poor: f64 },

    /// A negative or non-finite weight
    #[error("Invalid weight for {metric}: {weight}")]
    InvalidWeight { metric: Metric, weight: f64 },

    /// Weights cannot be normalized when they sum to zero
    #[error("Weights sum to zero and cannot be normalized")]
    ZeroWeights,
}

/// Result type for scoring configuration operations.
pub type ScoringResult<T> = Result<T, ScoringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScoringError::InvalidThresholds {
            metric: Metric::Tti,
            good: 900.0,
            poor: 500.0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid thresholds for tti: good (900ms) is greater than poor (500ms)"
        );

        let err = ScoringError::ZeroWeights;
        assert_eq!(err.to_string(), "Weights sum to zero and cannot be normalized");
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err: Result<(), serde_json::Error> = serde_json::from_str::<()>("not json");
        let err: ScoringError = json_err.unwrap_err().into();
        assert!(matches!(err, ScoringError::Serialization(_)));
    }
}
