//! Gesture hooks that observe the first input without consuming it

use std::rc::Weak;

use scoring::InputKind;

use crate::runtime::Runtime;
use crate::tracker::Shared;

/// Answer to a gesture recognizer asking whether to claim a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureResponse {
    /// Take over the gesture
    Claim,
    /// Let the gesture continue to its real handler
    Decline,
}

impl GestureResponse {
    /// Whether the gesture should be claimed.
    pub fn claims(&self) -> bool {
        matches!(self, GestureResponse::Claim)
    }
}

/// Start-of-gesture predicates to attach to a component's root surface.
///
/// Both predicates feed the tracker's first-input capture and always
/// decline the gesture. The binding holds a weak reference, so it never
/// keeps a tracker alive and does nothing once the tracker is gone.
pub struct GestureBinding<R: Runtime + 'static> {
    pub(crate) tracker: Weak<Shared<R>>,
}

impl<R: Runtime + 'static> GestureBinding<R> {
    /// Touch-start predicate.
    pub fn on_touch_start(&self) -> GestureResponse {
        self.observe(InputKind::Touch)
    }

    /// Scroll/move-start predicate.
    pub fn on_scroll_start(&self) -> GestureResponse {
        self.observe(InputKind::Scroll)
    }

    /// Whether the tracker this binding feeds still exists.
    pub fn is_attached(&self) -> bool {
        self.tracker.strong_count() > 0
    }

    fn observe(&self, kind: InputKind) -> GestureResponse {
        if let Some(tracker) = self.tracker.upgrade() {
            Shared::record_input(&tracker, kind);
        }
        GestureResponse::Decline
    }
}

impl<R: Runtime + 'static> Clone for GestureBinding<R> {
    fn clone(&self) -> Self {
        Self {
            tracker: Weak::clone(&self.tracker),
        }
    }
}

impl<R: Runtime + 'static> std::fmt::Debug for GestureBinding<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureBinding")
            .field("attached", &self.is_attached())
            .finish()
    }
}
