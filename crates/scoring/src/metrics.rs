//! Raw timing records for one component lifecycle

use serde::{Deserialize, Serialize};

/// Kind of user input that produced the first-input measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Touch start on the component surface
    Touch,
    /// Press/click
    Press,
    /// Scroll or move start
    Scroll,
    /// Anything else the host forwards
    Other,
}

impl InputKind {
    /// Lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            InputKind::Touch => "touch",
            InputKind::Press => "press",
            InputKind::Scroll => "scroll",
            InputKind::Other => "other",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// First input delay measurement.
///
/// At most one exists per lifecycle: the first qualifying input wins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstInputMetrics {
    /// Processing start minus input timestamp
    pub delay_ms: f64,
    /// When the input was received
    pub input_timestamp_ms: f64,
    /// When processing of the input started
    pub processing_start_timestamp_ms: f64,
    /// Kind of input
    pub input_kind: InputKind,
}

impl FirstInputMetrics {
    /// Build a measurement from its two timestamps.
    pub fn new(input_kind: InputKind, input_timestamp_ms: f64, processing_start_timestamp_ms: f64) -> Self {
        Self {
            delay_ms: processing_start_timestamp_ms - input_timestamp_ms,
            input_timestamp_ms,
            processing_start_timestamp_ms,
            input_kind,
        }
    }
}

/// Timing record for one component instance.
///
/// Timestamps are absolute milliseconds on the host clock; the `*_ms`
/// durations are measured from `mount_timestamp_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Mount to first rendered frame
    pub time_to_first_frame_ms: f64,
    /// Mount to the caller's interactive signal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_interactive_ms: Option<f64>,
    /// First input delay, if an input was captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_input_delay: Option<FirstInputMetrics>,
    pub mount_timestamp_ms: f64,
    pub first_frame_timestamp_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interactive_timestamp_ms: Option<f64>,
}

impl PerformanceMetrics {
    /// Create a record from the mount and first-frame timestamps.
    pub fn new(mount_timestamp_ms: f64, first_frame_timestamp_ms: f64) -> Self {
        Self {
            time_to_first_frame_ms: first_frame_timestamp_ms - mount_timestamp_ms,
            time_to_interactive_ms: None,
            first_input_delay: None,
            mount_timestamp_ms,
            first_frame_timestamp_ms,
            interactive_timestamp_ms: None,
        }
    }

    /// Record the interactive timestamp and derive TTI from it.
    pub fn with_interactive_at(mut self, interactive_timestamp_ms: f64) -> Self {
        self.interactive_timestamp_ms = Some(interactive_timestamp_ms);
        self.time_to_interactive_ms = Some(interactive_timestamp_ms - self.mount_timestamp_ms);
        self
    }

    /// Attach a first-input measurement.
    pub fn with_first_input(mut self, first_input: FirstInputMetrics) -> Self {
        self.first_input_delay = Some(first_input);
        self
    }

    /// TTI value used for scoring.
    ///
    /// A component that never signalled readiness is treated as interactive
    /// as soon as it rendered, so TTI falls back to TTFF.
    pub fn tti_or_ttff_ms(&self) -> f64 {
        self.time_to_interactive_ms
            .unwrap_or(self.time_to_first_frame_ms)
    }

    /// FID value used for scoring; `0` when no input was captured.
    pub fn fid_ms(&self) -> f64 {
        self.first_input_delay.map_or(0.0, |fid| fid.delay_ms)
    }

    /// Whether the caller has signalled interactivity.
    pub fn is_interactive(&self) -> bool {
        self.time_to_interactive_ms.is_some()
    }
}
