//! Tracker configuration and observers

use std::rc::Rc;
use std::time::Duration;

use scoring::{PerformanceMetrics, PerformanceScore, ScoringConfig};
use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

/// Default time to wait for a first input after interactivity, in ms.
pub const DEFAULT_FID_TIMEOUT_MS: u64 = 5000;

fn default_fid_timeout_ms() -> u64 {
    DEFAULT_FID_TIMEOUT_MS
}

fn default_debug() -> bool {
    cfg!(debug_assertions)
}

/// Configuration for a [`crate::LifecycleTracker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerConfig {
    /// Free-form identifier of the measured component
    pub component_name: String,
    /// Optional grouping prefix for log labels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// How long to wait for a first input once interactive before
    /// finalizing without one
    #[serde(default = "default_fid_timeout_ms")]
    pub fid_timeout_ms: u64,
    /// Emit debug log lines; defaults on in debug builds
    #[serde(default = "default_debug")]
    pub debug: bool,
    /// Thresholds and weights for the live and final scores
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl TrackerConfig {
    /// Create a config for a component with default settings.
    pub fn new(component_name: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            namespace: None,
            fid_timeout_ms: DEFAULT_FID_TIMEOUT_MS,
            debug: default_debug(),
            scoring: ScoringConfig::default(),
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the first-input timeout.
    pub fn with_fid_timeout(mut self, timeout: Duration) -> Self {
        self.fid_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Enable or disable debug logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set scoring thresholds and weights.
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// First-input timeout as a `Duration`.
    pub fn fid_timeout(&self) -> Duration {
        Duration::from_millis(self.fid_timeout_ms)
    }

    /// `"{namespace}/{component}"`, or just the component name.
    pub fn label(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}/{}", namespace, self.component_name),
            None => self.component_name.clone(),
        }
    }

    /// Prefix for debug log lines.
    pub fn log_prefix(&self) -> String {
        format!("[Perf {}]", self.label())
    }

    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> TrackerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the component name and scoring config.
    pub fn validate(&self) -> TrackerResult<()> {
        if self.component_name.trim().is_empty() {
            return Err(TrackerError::EmptyComponentName);
        }
        self.scoring.validate()?;
        Ok(())
    }
}

type MetricsCallback = Rc<dyn Fn(&PerformanceMetrics)>;
type ReportCallback = Rc<dyn Fn(&PerformanceMetrics, &PerformanceScore)>;

/// Callbacks notified by a tracker.
///
/// All are optional and invoked synchronously from the tracker's own
/// deferred or timer callbacks.
#[derive(Clone, Default)]
pub struct Observers {
    pub(crate) on_metrics_ready: Option<MetricsCallback>,
    pub(crate) on_interactive: Option<MetricsCallback>,
    pub(crate) on_report: Option<ReportCallback>,
}

impl Observers {
    /// No observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after the first frame is captured and after a first input is
    /// measured.
    pub fn on_metrics_ready(mut self, callback: impl Fn(&PerformanceMetrics) + 'static) -> Self {
        self.on_metrics_ready = Some(Rc::new(callback));
        self
    }

    /// Called once when the component is marked interactive.
    pub fn on_interactive(mut self, callback: impl Fn(&PerformanceMetrics) + 'static) -> Self {
        self.on_interactive = Some(Rc::new(callback));
        self
    }

    /// Called exactly once with the final metrics and score.
    pub fn on_report(
        mut self,
        callback: impl Fn(&PerformanceMetrics, &PerformanceScore) + 'static,
    ) -> Self {
        self.on_report = Some(Rc::new(callback));
        self
    }

    pub(crate) fn metrics_ready(&self, metrics: &PerformanceMetrics) {
        if let Some(callback) = &self.on_metrics_ready {
            callback(metrics);
        }
    }

    pub(crate) fn interactive(&self, metrics: &PerformanceMetrics) {
        if let Some(callback) = &self.on_interactive {
            callback(metrics);
        }
    }

    pub(crate) fn report(&self, metrics: &PerformanceMetrics, score: &PerformanceScore) {
        if let Some(callback) = &self.on_report {
            callback(metrics, score);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("on_metrics_ready", &self.on_metrics_ready.is_some())
            .field("on_interactive", &self.on_interactive.is_some())
            .field("on_report", &self.on_report.is_some())
            .finish()
    }
}
