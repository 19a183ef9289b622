//! Render Performance Scoring
//!
//! This crate turns raw component timing measurements into a bounded,
//! weighted performance score:
//! - Per-metric threshold pairs with linear interpolation between them
//! - Weighted aggregation of the TTFF, TTI and FID sub-scores
//! - Category bands and presentation helpers (summary line, color codes)
//!
//! Everything here is pure. Scoring never fails; malformed thresholds or
//! negative durations flow through the arithmetic unchanged.
//!
//! # Example
//!
//! ```rust
//! use scoring::{score_performance, Category, FirstInputMetrics, InputKind, PerformanceMetrics};
//!
//! let metrics = PerformanceMetrics::new(0.0, 100.0)
//!     .with_interactive_at(200.0)
//!     .with_first_input(FirstInputMetrics::new(InputKind::Touch, 400.0, 410.0));
//!
//! let score = score_performance(&metrics);
//! assert_eq!(score.overall, 100);
//! assert_eq!(score.category, Category::Excellent);
//! ```

mod config;
mod error;
mod metrics;
mod score;
mod thresholds;
mod weights;

pub use config::ScoringConfig;
pub use error::{ScoringError, ScoringResult};
pub use metrics::{FirstInputMetrics, InputKind, PerformanceMetrics};
pub use score::{
    categorize, color_for_category, format_score, score_metric, score_performance,
    score_performance_with, Category, PerformanceScore, ScoreBreakdown,
};
pub use thresholds::{Metric, MetricThresholds, ScoreThresholds, DEFAULT_THRESHOLDS};
pub use weights::{MetricWeights, DEFAULT_WEIGHTS};
