//! Threshold pairs defining the interpolation range of each metric

use serde::{Deserialize, Serialize};

use crate::error::{ScoringError, ScoringResult};

/// The three scored metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Time to first frame
    Ttff,
    /// Time to interactive
    Tti,
    /// First input delay
    Fid,
}

impl Metric {
    /// All metrics in breakdown order.
    pub const ALL: [Metric; 3] = [Metric::Ttff, Metric::Tti, Metric::Fid];

    /// Lowercase key used in configs and log fields.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Ttff => "ttff",
            Metric::Tti => "tti",
            Metric::Fid => "fid",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A `{good, poor}` boundary pair in milliseconds.
///
/// A value at or below `good` scores 100, a value at or above `poor` scores 0,
/// and values in between interpolate linearly. The pair is expected to satisfy
/// `good < poor`; this is a caller contract and is only checked by
/// [`MetricThresholds::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricThresholds {
    /// Upper bound of the ideal range
    pub good: f64,
    /// Lower bound of the worst-case range
    pub poor: f64,
}

impl MetricThresholds {
    /// Create a threshold pair.
    pub const fn new(good: f64, poor: f64) -> Self {
        Self { good, poor }
    }

    /// Width of the interpolation range.
    pub fn span(&self) -> f64 {
        self.poor - self.good
    }

    /// Check that `good <= poor`.
    ///
    /// `good == poor` is accepted: scoring degrades to a step at that value.
    pub fn validate(&self, metric: Metric) -> ScoringResult<()> {
        if self.good > self.poor || self.good.is_nan() || self.poor.is_nan() {
            return Err(ScoringError::InvalidThresholds {
                metric,
                good: self.good,
                poor: self.poor,
            });
        }
        Ok(())
    }
}

/// Default thresholds for all three metrics.
pub const DEFAULT_THRESHOLDS: ScoreThresholds = ScoreThresholds {
    ttff: MetricThresholds::new(300.0, 800.0),
    tti: MetricThresholds::new(500.0, 1500.0),
    fid: MetricThresholds::new(50.0, 150.0),
};

/// Threshold pairs keyed by metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreThresholds {
    /// Time to first frame thresholds
    pub ttff: MetricThresholds,
    /// Time to interactive thresholds
    pub tti: MetricThresholds,
    /// First input delay thresholds
    pub fid: MetricThresholds,
}

impl ScoreThresholds {
    /// Create thresholds for each metric.
    pub fn new(ttff: MetricThresholds, tti: MetricThresholds, fid: MetricThresholds) -> Self {
        Self { ttff, tti, fid }
    }

    /// Tighter thresholds for performance-critical screens.
    pub fn strict() -> Self {
        Self {
            ttff: MetricThresholds::new(200.0, 500.0),
            tti: MetricThresholds::new(300.0, 1000.0),
            fid: MetricThresholds::new(30.0, 100.0),
        }
    }

    /// Looser thresholds for heavy screens on low-end devices.
    pub fn relaxed() -> Self {
        Self {
            ttff: MetricThresholds::new(500.0, 1200.0),
            tti: MetricThresholds::new(1000.0, 3000.0),
            fid: MetricThresholds::new(100.0, 300.0),
        }
    }

    /// Builder method to set the TTFF thresholds.
    pub fn with_ttff(mut self, good: f64, poor: f64) -> Self {
        self.ttff = MetricThresholds::new(good, poor);
        self
    }

    /// Builder method to set the TTI thresholds.
    pub fn with_tti(mut self, good: f64, poor: f64) -> Self {
        self.tti = MetricThresholds::new(good, poor);
        self
    }

    /// Builder method to set the FID thresholds.
    pub fn with_fid(mut self, good: f64, poor: f64) -> Self {
        self.fid = MetricThresholds::new(good, poor);
        self
    }

    /// Get the thresholds for a metric.
    pub fn get(&self, metric: Metric) -> &MetricThresholds {
        match metric {
            Metric::Ttff => &self.ttff,
            Metric::Tti => &self.tti,
            Metric::Fid => &self.fid,
        }
    }

    /// Validate every pair, reporting the first bad one.
    pub fn validate(&self) -> ScoringResult<()> {
        Metric::ALL
            .iter()
            .try_for_each(|&metric| self.get(metric).validate(metric))
    }
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        DEFAULT_THRESHOLDS
    }
}
