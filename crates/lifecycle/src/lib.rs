//! Component Lifecycle Tracking
//!
//! This crate measures how quickly a UI component becomes usable and hands
//! one scored report per component instance to the host:
//! - Time to first frame, stamped one deferred turn after mount
//! - Time to interactive, signalled explicitly by the caller
//! - First input delay, captured from the first touch or scroll gesture
//!
//! The host framework's clock, task queue and timers are injected through
//! the [`Runtime`] traits. [`ManualRuntime`] drives the tracker on virtual
//! time; with the `tokio` feature (default), [`TokioRuntime`] drives it on a
//! tokio `LocalSet`.
//!
//! # Example
//!
//! ```rust
//! use lifecycle::{LifecycleTracker, ManualRuntime, Observers, TrackerConfig};
//! use std::time::Duration;
//!
//! let runtime = ManualRuntime::new();
//! let observers = Observers::new().on_report(|metrics, score| {
//!     println!("{}: {}", metrics.time_to_first_frame_ms, score);
//! });
//!
//! let tracker = LifecycleTracker::mount(TrackerConfig::new("ProfileScreen"), observers, runtime.clone());
//!
//! runtime.elapse(Duration::from_millis(120));
//! runtime.run_microtasks();
//! assert_eq!(tracker.metrics().unwrap().time_to_first_frame_ms, 120.0);
//!
//! tracker.mark_interactive();
//! runtime.run_until_idle();
//! assert!(tracker.is_finalized());
//! ```

mod config;
mod error;
mod gesture;
mod manual;
mod runtime;
#[cfg(feature = "tokio")]
mod tokio_runtime;
mod tracker;

pub use config::{Observers, TrackerConfig, DEFAULT_FID_TIMEOUT_MS};
pub use error::{TrackerError, TrackerResult};
pub use gesture::{GestureBinding, GestureResponse};
pub use manual::ManualRuntime;
pub use runtime::{Clock, Runtime, Scheduler, Task, TimerId};
#[cfg(feature = "tokio")]
pub use tokio_runtime::TokioRuntime;
pub use tracker::{LifecycleTracker, TrackerPhase};

/// Re-export of the scoring types carried in reports
pub use scoring::{
    Category, FirstInputMetrics, InputKind, PerformanceMetrics, PerformanceScore, ScoringConfig,
};
