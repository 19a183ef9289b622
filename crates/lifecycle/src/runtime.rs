//! Capabilities the tracker borrows from the host framework

use std::time::Duration;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + 'static>;

/// Handle to a pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a host-specific timer id.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-specific timer id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Millisecond clock.
pub trait Clock {
    /// Current time in milliseconds. Only differences are meaningful.
    fn now_ms(&self) -> f64;
}

/// Task queue and timer primitives of a single-threaded event loop.
pub trait Scheduler {
    /// Run `task` after the current synchronous turn completes.
    ///
    /// A deferred task observes every state change made before it was
    /// scheduled. It is never run inline.
    fn defer(&self, task: Task);

    /// Run `task` once `delay` has elapsed.
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId;

    /// Cancel a timeout. Unknown or already fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

/// Everything a tracker needs from its host.
pub trait Runtime: Clock + Scheduler {}

impl<T: Clock + Scheduler> Runtime for T {}
