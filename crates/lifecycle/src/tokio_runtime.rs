//! Runtime adapter over a tokio `LocalSet`

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::runtime::{Clock, Scheduler, Task, TimerId};

/// Drives trackers on the current tokio `LocalSet`.
///
/// Deferred work and timeouts are spawned with `tokio::task::spawn_local`,
/// so every call must happen inside `LocalSet::run_until` (or a task spawned
/// on a `LocalSet`). The clock is `tokio::time::Instant`, which follows
/// paused test time.
#[derive(Clone)]
pub struct TokioRuntime {
    origin: Instant,
    timers: Rc<RefCell<HashMap<TimerId, JoinHandle<()>>>>,
    next_timer_id: Rc<Cell<u64>>,
}

impl TokioRuntime {
    /// Create a runtime whose clock starts at zero now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            timers: Rc::new(RefCell::new(HashMap::new())),
            next_timer_id: Rc::new(Cell::new(0)),
        }
    }

    /// Number of timeouts that have neither fired nor been cleared.
    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }
}

impl Default for TokioRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioRuntime {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

impl Scheduler for TokioRuntime {
    fn defer(&self, task: Task) {
        tokio::task::spawn_local(async move { task() });
    }

    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId {
        let id = TimerId::from_raw(self.next_timer_id.get());
        self.next_timer_id.set(id.raw() + 1);

        let timers = Rc::clone(&self.timers);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            timers.borrow_mut().remove(&id);
            task();
        });
        self.timers.borrow_mut().insert(id, handle);
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let handle = self.timers.borrow_mut().remove(&id);
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for TokioRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokioRuntime")
            .field("origin", &self.origin)
            .field("pending_timers", &self.pending_timers())
            .finish()
    }
}
