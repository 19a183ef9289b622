//! Deterministic runtime on virtual time

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use crate::runtime::{Clock, Scheduler, Task, TimerId};

#[derive(Default)]
struct ManualState {
    now_ms: u64,
    microtasks: VecDeque<Task>,
    /// Pending timers ordered by deadline, then by creation
    timers: BTreeMap<(u64, TimerId), Task>,
    deadlines: HashMap<TimerId, u64>,
    next_timer_id: u64,
}

/// A single-threaded event loop whose clock only moves when told to.
///
/// Clones share the same queue and clock, so one clone can be handed to a
/// tracker while the test keeps another to drive it. Nothing runs until one
/// of [`run_microtasks`](Self::run_microtasks), [`advance`](Self::advance) or
/// [`run_until_idle`](Self::run_until_idle) is called.
#[derive(Clone, Default)]
pub struct ManualRuntime {
    state: Rc<RefCell<ManualState>>,
}

impl ManualRuntime {
    /// Create a runtime at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runtime whose clock starts at `now_ms`.
    pub fn starting_at(now_ms: u64) -> Self {
        let runtime = Self::new();
        runtime.state.borrow_mut().now_ms = now_ms;
        runtime
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.state.borrow().now_ms
    }

    /// Move the clock forward without running anything.
    ///
    /// Models synchronous work that takes time, such as a render pass.
    /// Timers that become due fire on the next `advance` or
    /// `run_until_idle`.
    pub fn elapse(&self, duration: Duration) {
        self.state.borrow_mut().now_ms += duration.as_millis() as u64;
    }

    /// Drain the microtask queue, including tasks queued while draining.
    ///
    /// Returns the number of tasks run.
    pub fn run_microtasks(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.state.borrow_mut().microtasks.pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Move the clock forward by `duration`, firing due timers in order.
    ///
    /// Microtasks are drained before the first timer and after each one.
    /// Returns the number of tasks run.
    pub fn advance(&self, duration: Duration) -> usize {
        let target = self.now() + duration.as_millis() as u64;
        let mut ran = self.run_microtasks();

        while let Some(task) = self.pop_due_timer(Some(target)) {
            task();
            ran += 1 + self.run_microtasks();
        }

        let mut state = self.state.borrow_mut();
        state.now_ms = state.now_ms.max(target);
        ran
    }

    /// Convenience for [`advance`](Self::advance) in milliseconds.
    pub fn advance_ms(&self, ms: u64) -> usize {
        self.advance(Duration::from_millis(ms))
    }

    /// Run until no microtasks or timers remain, jumping the clock to each
    /// timer's deadline.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = self.run_microtasks();
        while let Some(task) = self.pop_due_timer(None) {
            task();
            ran += 1 + self.run_microtasks();
        }
        ran
    }

    /// Number of queued microtasks.
    pub fn pending_microtasks(&self) -> usize {
        self.state.borrow().microtasks.len()
    }

    /// Number of armed timers.
    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Pop the earliest timer due no later than `until`, moving the clock to
    /// its deadline. The borrow is released before the caller runs the task.
    fn pop_due_timer(&self, until: Option<u64>) -> Option<Task> {
        let mut state = self.state.borrow_mut();
        let key = *state.timers.keys().next()?;
        if until.is_some_and(|limit| key.0 > limit) {
            return None;
        }

        let task = state.timers.remove(&key)?;
        state.deadlines.remove(&key.1);
        state.now_ms = state.now_ms.max(key.0);
        Some(task)
    }
}

impl Clock for ManualRuntime {
    fn now_ms(&self) -> f64 {
        self.now() as f64
    }
}

impl Scheduler for ManualRuntime {
    fn defer(&self, task: Task) {
        self.state.borrow_mut().microtasks.push_back(task);
    }

    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId::from_raw(state.next_timer_id);
        state.next_timer_id += 1;

        let deadline = state.now_ms + delay.as_millis() as u64;
        state.timers.insert((deadline, id), task);
        state.deadlines.insert(id, deadline);
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        let mut state = self.state.borrow_mut();
        if let Some(deadline) = state.deadlines.remove(&id) {
            state.timers.remove(&(deadline, id));
        }
    }
}

impl std::fmt::Debug for ManualRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualRuntime")
            .field("now_ms", &state.now_ms)
            .field("pending_microtasks", &state.microtasks.len())
            .field("pending_timers", &state.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &'static str| -> Task {
            let sink = sink.clone();
            Box::new(move || sink.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_defer_is_not_inline() {
        let runtime = ManualRuntime::new();
        let (log, task) = recorder();

        runtime.defer(task("a"));
        assert!(log.borrow().is_empty());
        assert_eq!(runtime.pending_microtasks(), 1);

        assert_eq!(runtime.run_microtasks(), 1);
        assert_eq!(*log.borrow(), vec!["a"]);
    }

    #[test]
    fn test_microtasks_fifo_and_nested() {
        let runtime = ManualRuntime::new();
        let (log, task) = recorder();

        let inner = runtime.clone();
        let nested = task("nested");
        let first = task("first");
        runtime.defer(Box::new(move || {
            first();
            inner.defer(nested);
        }));
        runtime.defer(task("second"));

        assert_eq!(runtime.run_microtasks(), 3);
        assert_eq!(*log.borrow(), vec!["first", "second", "nested"]);
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let runtime = ManualRuntime::new();
        let (log, task) = recorder();

        runtime.set_timeout(Duration::from_millis(300), task("late"));
        runtime.set_timeout(Duration::from_millis(100), task("early"));
        runtime.set_timeout(Duration::from_millis(100), task("early-second"));

        runtime.advance_ms(99);
        assert!(log.borrow().is_empty());

        runtime.advance_ms(1);
        assert_eq!(*log.borrow(), vec!["early", "early-second"]);
        assert_eq!(runtime.now(), 100);

        runtime.advance_ms(500);
        assert_eq!(*log.borrow(), vec!["early", "early-second", "late"]);
        assert_eq!(runtime.now(), 600);
    }

    #[test]
    fn test_timer_sees_its_deadline() {
        let runtime = ManualRuntime::new();
        let seen = Rc::new(RefCell::new(None));

        let clock = runtime.clone();
        let sink = seen.clone();
        runtime.set_timeout(
            Duration::from_millis(250),
            Box::new(move || *sink.borrow_mut() = Some(clock.now())),
        );

        runtime.advance_ms(1000);
        assert_eq!(*seen.borrow(), Some(250));
    }

    #[test]
    fn test_clear_timeout() {
        let runtime = ManualRuntime::new();
        let (log, task) = recorder();

        let id = runtime.set_timeout(Duration::from_millis(10), task("cancelled"));
        runtime.set_timeout(Duration::from_millis(20), task("kept"));
        runtime.clear_timeout(id);
        runtime.clear_timeout(id);
        assert_eq!(runtime.pending_timers(), 1);

        runtime.run_until_idle();
        assert_eq!(*log.borrow(), vec!["kept"]);
        assert_eq!(runtime.now(), 20);
    }

    #[test]
    fn test_elapse_moves_clock_only() {
        let runtime = ManualRuntime::starting_at(1_000);
        let (log, task) = recorder();

        runtime.defer(task("deferred"));
        runtime.elapse(Duration::from_millis(40));

        assert_eq!(runtime.now_ms(), 1_040.0);
        assert!(log.borrow().is_empty());
    }
}
