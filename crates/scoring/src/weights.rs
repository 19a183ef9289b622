//! Aggregation weights for the overall score

use serde::{Deserialize, Serialize};

use crate::error::{ScoringError, ScoringResult};
use crate::thresholds::Metric;

/// Default weights. These sum to exactly 1.0.
pub const DEFAULT_WEIGHTS: MetricWeights = MetricWeights {
    ttff: 0.25,
    tti: 0.45,
    fid: 0.30,
};

/// Per-metric weights applied to the sub-scores.
///
/// The scorer does not require the weights to sum to 1. Custom weights that
/// don't will produce an overall score outside 0..=100; use
/// [`MetricWeights::normalized`] to rescale them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricWeights {
    /// Weight of the time to first frame score
    pub ttff: f64,
    /// Weight of the time to interactive score
    pub tti: f64,
    /// Weight of the first input delay score
    pub fid: f64,
}

impl MetricWeights {
    /// Create a weight set.
    pub fn new(ttff: f64, tti: f64, fid: f64) -> Self {
        Self { ttff, tti, fid }
    }

    /// Get the weight for a metric.
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Ttff => self.ttff,
            Metric::Tti => self.tti,
            Metric::Fid => self.fid,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.ttff + self.tti + self.fid
    }

    /// Rescale so the weights sum to 1.0.
    pub fn normalized(&self) -> ScoringResult<Self> {
        self.validate()?;
        let total = self.total();
        if total == 0.0 {
            return Err(ScoringError::ZeroWeights);
        }
        Ok(Self {
            ttff: self.ttff / total,
            tti: self.tti / total,
            fid: self.fid / total,
        })
    }

    /// Check that every weight is finite and non-negative.
    pub fn validate(&self) -> ScoringResult<()> {
        for metric in Metric::ALL {
            let weight = self.get(metric);
            if !weight.is_finite() || weight < 0.0 {
                return Err(ScoringError::InvalidWeight { metric, weight });
            }
        }
        Ok(())
    }
}

impl Default for MetricWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        assert_eq!(DEFAULT_WEIGHTS.total(), 1.0);
        assert_eq!(MetricWeights::default(), DEFAULT_WEIGHTS);
    }

    #[test]
    fn test_normalized() {
        let w = MetricWeights::new(1.0, 2.0, 1.0).normalized().unwrap();
        assert_eq!(w.ttff, 0.25);
        assert_eq!(w.tti, 0.5);
        assert_eq!(w.fid, 0.25);
    }

    #[test]
    fn test_normalized_zero() {
        let result = MetricWeights::new(0.0, 0.0, 0.0).normalized();
        assert!(matches!(result, Err(ScoringError::ZeroWeights)));
    }

    #[test]
    fn test_validate_negative() {
        let result = MetricWeights::new(0.5, -0.1, 0.6).validate();
        match result {
            Err(ScoringError::InvalidWeight { metric, weight }) => {
                assert_eq!(metric, Metric::Tti);
                assert_eq!(weight, -0.1);
            }
            other => panic!("expected invalid weight, got {:?}", other),
        }
        assert!(MetricWeights::new(f64::NAN, 0.0, 1.0).validate().is_err());
    }
}
