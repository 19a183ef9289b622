//! Scoring configuration

use serde::{Deserialize, Serialize};

use crate::error::ScoringResult;
use crate::metrics::PerformanceMetrics;
use crate::score::{score_performance_with, PerformanceScore};
use crate::thresholds::ScoreThresholds;
use crate::weights::MetricWeights;

/// Thresholds and weights used to score a metrics record.
///
/// Fields missing from JSON fall back to the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Threshold pairs per metric
    pub thresholds: ScoreThresholds,
    /// Aggregation weights
    pub weights: MetricWeights,
}

impl ScoringConfig {
    /// Create a config from thresholds and weights.
    pub fn new(thresholds: ScoreThresholds, weights: MetricWeights) -> Self {
        Self { thresholds, weights }
    }

    /// Builder method to set thresholds.
    pub fn with_thresholds(mut self, thresholds: ScoreThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Builder method to set weights.
    pub fn with_weights(mut self, weights: MetricWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Parse a config from JSON.
    ///
    /// Only the syntax is checked; call [`ScoringConfig::validate`] to
    /// reject inverted thresholds or negative weights.
    pub fn from_json(json: &str) -> ScoringResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the config as pretty-printed JSON.
    pub fn to_json(&self) -> ScoringResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate thresholds and weights.
    pub fn validate(&self) -> ScoringResult<()> {
        self.thresholds.validate()?;
        self.weights.validate()
    }

    /// Score metrics with this config.
    pub fn score(&self, metrics: &PerformanceMetrics) -> PerformanceScore {
        score_performance_with(metrics, &self.thresholds, &self.weights)
    }
}
