//! Error types for tracker configuration.

use scoring::ScoringError;
use thiserror::Error;

/// Errors raised while loading or validating a [`crate::TrackerConfig`].
///
/// Tracking itself never fails.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Failed to parse or serialize the config
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid scoring thresholds or weights
    #[error("Scoring config error: {0}")]
    Scoring(#[from] ScoringError),

    /// The component name is empty
    #[error("Component name must not be empty")]
    EmptyComponentName,
}

/// Result type for tracker configuration operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
