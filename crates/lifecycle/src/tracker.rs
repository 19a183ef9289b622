//! Per-instance lifecycle state machine

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use scoring::{FirstInputMetrics, InputKind, PerformanceMetrics, PerformanceScore, ScoringConfig};

use crate::config::{Observers, TrackerConfig};
use crate::gesture::GestureBinding;
use crate::runtime::{Runtime, TimerId};

const TRACE_TARGET: &str = "lifecycle::tracker";

/// Where a tracker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerPhase {
    /// Mounted, first frame not yet captured
    Created,
    /// First frame captured
    FirstFrameCaptured,
    /// First frame captured and caller signalled interactivity
    Interactive,
    /// First input measured, report about to be emitted
    FirstInputCaptured,
    /// Report emitted; metrics are frozen
    Finalized,
    /// Disposed before finalizing
    Disposed,
}

/// Mutable timing state of one instance.
#[derive(Debug)]
struct TrackerState {
    mount_timestamp_ms: f64,
    first_frame_timestamp_ms: Option<f64>,
    interactive_timestamp_ms: Option<f64>,
    first_input: Option<FirstInputMetrics>,
    /// Set as soon as a qualifying input arrives, before its delay is known
    input_captured: bool,
    /// `on_interactive` already delivered
    interactive_notified: bool,
    /// Finalization was triggered before the first frame existed
    finalize_pending: bool,
    finalized: bool,
    disposed: bool,
    timeout: Option<TimerId>,
    metrics: Option<PerformanceMetrics>,
    score: Option<PerformanceScore>,
}

impl TrackerState {
    fn new(mount_timestamp_ms: f64) -> Self {
        Self {
            mount_timestamp_ms,
            first_frame_timestamp_ms: None,
            interactive_timestamp_ms: None,
            first_input: None,
            input_captured: false,
            interactive_notified: false,
            finalize_pending: false,
            finalized: false,
            disposed: false,
            timeout: None,
            metrics: None,
            score: None,
        }
    }

    /// Neither finalized nor disposed.
    fn is_live(&self) -> bool {
        !self.finalized && !self.disposed
    }

    /// Regenerate metrics and score from the recorded timestamps.
    ///
    /// Returns `None` until the first frame has been captured.
    fn rebuild(&mut self, scoring: &ScoringConfig) -> Option<(PerformanceMetrics, PerformanceScore)> {
        let first_frame = self.first_frame_timestamp_ms?;

        let mut metrics = PerformanceMetrics::new(self.mount_timestamp_ms, first_frame);
        if let Some(interactive) = self.interactive_timestamp_ms {
            metrics = metrics.with_interactive_at(interactive);
        }
        if let Some(first_input) = self.first_input {
            metrics = metrics.with_first_input(first_input);
        }
        let score = scoring.score(&metrics);

        self.metrics = Some(metrics.clone());
        self.score = Some(score);
        Some((metrics, score))
    }
}

/// State shared between the tracker handle and its scheduled callbacks.
pub(crate) struct Shared<R: Runtime + 'static> {
    runtime: R,
    config: TrackerConfig,
    observers: Observers,
    label: String,
    prefix: String,
    state: RefCell<TrackerState>,
}

impl<R: Runtime + 'static> Shared<R> {
    fn is_live(&self) -> bool {
        self.state.borrow().is_live()
    }

    fn capture_first_frame(this: &Rc<Self>) {
        let now = this.runtime.now_ms();
        let (metrics, notify_interactive, finalize_now) = {
            let mut state = this.state.borrow_mut();
            if state.disposed || state.first_frame_timestamp_ms.is_some() {
                return;
            }
            state.first_frame_timestamp_ms = Some(now);
            let Some((metrics, _)) = state.rebuild(&this.config.scoring) else {
                return;
            };
            let notify_interactive =
                state.interactive_timestamp_ms.is_some() && !state.interactive_notified;
            state.interactive_notified |= notify_interactive;
            (metrics, notify_interactive, state.finalize_pending)
        };

        if this.config.debug {
            tracing::debug!(
                target: TRACE_TARGET,
                component = %this.label,
                ttff_ms = metrics.time_to_first_frame_ms,
                "{} TTFF: {}ms",
                this.prefix,
                metrics.time_to_first_frame_ms
            );
        }
        this.observers.metrics_ready(&metrics);

        if notify_interactive && this.is_live() {
            this.log_interactive(&metrics);
            this.observers.interactive(&metrics);
        }

        if finalize_now {
            Self::finalize(this);
        }
    }

    fn mark_interactive(this: &Rc<Self>) {
        let now = this.runtime.now_ms();
        let rebuilt = {
            let mut state = this.state.borrow_mut();
            if !state.is_live() || state.interactive_timestamp_ms.is_some() {
                tracing::trace!(target: TRACE_TARGET, component = %this.label, "interactive mark ignored");
                return;
            }
            state.interactive_timestamp_ms = Some(now);
            let rebuilt = state.rebuild(&this.config.scoring);
            state.interactive_notified = rebuilt.is_some();
            rebuilt
        };

        if let Some((metrics, _)) = rebuilt {
            this.log_interactive(&metrics);
            this.observers.interactive(&metrics);
        }

        if this.is_live() {
            Self::arm_timeout(this);
        }
    }

    fn arm_timeout(this: &Rc<Self>) {
        let weak = Rc::downgrade(this);
        let id = this.runtime.set_timeout(
            this.config.fid_timeout(),
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    Self::on_timeout(&shared);
                }
            }),
        );

        let previous = this.state.borrow_mut().timeout.replace(id);
        if let Some(previous) = previous {
            this.runtime.clear_timeout(previous);
        }
    }

    fn on_timeout(this: &Rc<Self>) {
        this.state.borrow_mut().timeout = None;
        tracing::trace!(target: TRACE_TARGET, component = %this.label, "first input timeout elapsed");
        Self::finalize(this);
    }

    pub(crate) fn record_input(this: &Rc<Self>, kind: InputKind) {
        let input_timestamp_ms = this.runtime.now_ms();
        {
            let mut state = this.state.borrow_mut();
            if !state.is_live() || state.input_captured {
                tracing::trace!(target: TRACE_TARGET, component = %this.label, %kind, "input ignored");
                return;
            }
            state.input_captured = true;
        }

        // Processing start is the next turn of the task queue.
        let weak = Rc::downgrade(this);
        this.runtime.defer(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Self::capture_processing_start(&shared, kind, input_timestamp_ms);
            }
        }));
    }

    fn capture_processing_start(this: &Rc<Self>, kind: InputKind, input_timestamp_ms: f64) {
        let processing_start_ms = this.runtime.now_ms();
        let first_input = FirstInputMetrics::new(kind, input_timestamp_ms, processing_start_ms);
        let rebuilt = {
            let mut state = this.state.borrow_mut();
            if !state.is_live() {
                return;
            }
            state.first_input = Some(first_input);
            state.rebuild(&this.config.scoring)
        };

        if this.config.debug {
            tracing::debug!(
                target: TRACE_TARGET,
                component = %this.label,
                fid_ms = first_input.delay_ms,
                input_kind = %kind,
                "{} FID: {}ms ({})",
                this.prefix,
                first_input.delay_ms,
                kind
            );
        }
        if let Some((metrics, _)) = rebuilt {
            this.observers.metrics_ready(&metrics);
        }

        Self::finalize(this);
    }

    fn finalize(this: &Rc<Self>) {
        let (report, timeout) = {
            let mut state = this.state.borrow_mut();
            if !state.is_live() {
                return;
            }
            let timeout = state.timeout.take();
            let report = state.rebuild(&this.config.scoring);
            match report {
                Some(_) => {
                    state.finalized = true;
                    state.finalize_pending = false;
                }
                None => state.finalize_pending = true,
            }
            (report, timeout)
        };

        if let Some(id) = timeout {
            this.runtime.clear_timeout(id);
        }

        let Some((metrics, score)) = report else {
            tracing::trace!(target: TRACE_TARGET, component = %this.label, "finalize held until first frame");
            return;
        };

        if this.config.debug {
            let first_input = metrics.first_input_delay;
            tracing::debug!(
                target: TRACE_TARGET,
                component = %this.label,
                ttff_ms = metrics.time_to_first_frame_ms,
                tti_ms = ?metrics.time_to_interactive_ms,
                fid_ms = ?first_input.map(|fid| fid.delay_ms),
                input_kind = ?first_input.map(|fid| fid.input_kind),
                score = score.overall,
                category = %score.category,
                "{} report: {}",
                this.prefix,
                score
            );
        }
        this.observers.report(&metrics, &score);
    }

    fn dispose(&self) {
        let timeout = {
            let mut state = self.state.borrow_mut();
            state.disposed = true;
            state.timeout.take()
        };
        if let Some(id) = timeout {
            self.runtime.clear_timeout(id);
        }
        tracing::trace!(target: TRACE_TARGET, component = %self.label, "tracker disposed");
    }

    fn log_interactive(&self, metrics: &PerformanceMetrics) {
        if !self.config.debug {
            return;
        }
        if let Some(tti) = metrics.time_to_interactive_ms {
            tracing::debug!(
                target: TRACE_TARGET,
                component = %self.label,
                tti_ms = tti,
                "{} TTI: {}ms",
                self.prefix,
                tti
            );
        }
    }
}

/// Tracks one mounted component from mount to its final report.
///
/// Mounting stamps the mount time and defers first-frame capture to the
/// next turn of the runtime's task queue. The caller signals readiness with
/// [`mark_interactive`](Self::mark_interactive); the first touch or scroll
/// seen by the [`GestureBinding`] (or the first-input timeout) finalizes
/// the instance and emits the report exactly once.
///
/// Dropping the tracker disposes it: pending timeouts are cancelled and
/// already-queued captures become no-ops.
pub struct LifecycleTracker<R: Runtime + 'static> {
    shared: Rc<Shared<R>>,
}

impl<R: Runtime + 'static> LifecycleTracker<R> {
    /// Start tracking a component that is mounting now.
    pub fn mount(config: TrackerConfig, observers: Observers, runtime: R) -> Self {
        let mount_timestamp_ms = runtime.now_ms();
        let label = config.label();
        let prefix = config.log_prefix();

        let shared = Rc::new(Shared {
            runtime,
            config,
            observers,
            label,
            prefix,
            state: RefCell::new(TrackerState::new(mount_timestamp_ms)),
        });

        let weak: Weak<Shared<R>> = Rc::downgrade(&shared);
        shared.runtime.defer(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                Shared::capture_first_frame(&shared);
            }
        }));

        tracing::trace!(target: TRACE_TARGET, component = %shared.label, mount_timestamp_ms, "tracker mounted");
        Self { shared }
    }

    /// Signal that the component is ready for interaction.
    ///
    /// Only the first call has an effect. It also arms the first-input
    /// timeout. Calls after finalization or disposal are ignored.
    pub fn mark_interactive(&self) {
        Shared::mark_interactive(&self.shared);
    }

    /// Forward a start-of-gesture event of any kind to first-input capture.
    ///
    /// Only the first input across the instance's lifetime is measured.
    pub fn on_gesture_start(&self, kind: InputKind) {
        Shared::record_input(&self.shared, kind);
    }

    /// Gesture predicates to attach to the component's root surface.
    pub fn gesture_binding(&self) -> GestureBinding<R> {
        GestureBinding {
            tracker: Rc::downgrade(&self.shared),
        }
    }

    /// Current metrics; `None` until the first frame is captured.
    pub fn metrics(&self) -> Option<PerformanceMetrics> {
        self.shared.state.borrow().metrics.clone()
    }

    /// Current score; `None` until the first frame is captured.
    pub fn score(&self) -> Option<PerformanceScore> {
        self.shared.state.borrow().score
    }

    pub fn phase(&self) -> TrackerPhase {
        let state = self.shared.state.borrow();
        if state.finalized {
            TrackerPhase::Finalized
        } else if state.disposed {
            TrackerPhase::Disposed
        } else if state.first_frame_timestamp_ms.is_none() {
            TrackerPhase::Created
        } else if state.first_input.is_some() {
            TrackerPhase::FirstInputCaptured
        } else if state.interactive_timestamp_ms.is_some() {
            TrackerPhase::Interactive
        } else {
            TrackerPhase::FirstFrameCaptured
        }
    }

    /// Whether the report has been emitted.
    pub fn is_finalized(&self) -> bool {
        self.shared.state.borrow().finalized
    }

    /// The tracker's configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.shared.config
    }

    /// Log label, `"{namespace}/{component}"` or the component name.
    pub fn label(&self) -> &str {
        &self.shared.label
    }

    /// Stop tracking. Cancels any pending timeout; idempotent.
    pub fn dispose(&self) {
        self.shared.dispose();
    }
}

impl<R: Runtime + 'static> Drop for LifecycleTracker<R> {
    fn drop(&mut self) {
        self.shared.dispose();
    }
}

impl<R: Runtime + 'static> std::fmt::Debug for LifecycleTracker<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleTracker")
            .field("label", &self.shared.label)
            .field("state", &*self.shared.state.borrow())
            .finish()
    }
}
