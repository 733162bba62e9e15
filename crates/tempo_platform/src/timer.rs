//! Single-shot delay primitive and the reference timer-queue host
//!
//! The engine only ever asks the platform for "invoke this callback once
//! after approximately N milliseconds" with true cancellation.
//! [`TimerQueue`] is the reference host for that contract: deterministic
//! under a [`VirtualClock`], a blocking cooperative loop under a
//! [`SystemClock`]. Real platform backends (RTOS timer pools, event loops)
//! implement [`TimerHost`] directly.

use std::cell::RefCell;
use std::thread;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::clock::{Clock, SystemClock, VirtualClock};

new_key_type! {
    /// Handle to a pending single-shot timer
    pub struct TimerId;
}

/// Single-shot delay primitive
///
/// Scheduling is infallible and cancellation is true cancellation: after
/// [`cancel`](TimerHost::cancel) returns, the callback will not run.
/// Canceling an id that already fired (or was never issued by this host) is
/// a no-op.
pub trait TimerHost {
    /// Invoke `callback` once, after approximately `delay_ms` milliseconds
    fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a pending timer before it fires
    fn cancel(&self, id: TimerId);
}

struct PendingTimer {
    fire_at: u64,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

struct QueueInner {
    timers: SlotMap<TimerId, PendingTimer>,
    next_seq: u64,
}

/// Reference [`TimerHost`] over a pluggable clock
///
/// Pending timers live in a slotmap keyed by [`TimerId`]; equal deadlines
/// fire in scheduling order. `schedule` and `cancel` may be called from
/// within a firing callback.
///
/// Single-threaded by design: share it via `Rc`.
pub struct TimerQueue<C: Clock> {
    clock: C,
    inner: RefCell<QueueInner>,
}

impl<C: Clock> TimerQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            inner: RefCell::new(QueueInner {
                timers: SlotMap::with_key(),
                next_seq: 0,
            }),
        }
    }

    /// The clock this queue schedules against
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of pending timers
    pub fn pending(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Absolute deadline of the earliest pending timer
    pub fn next_deadline(&self) -> Option<u64> {
        self.inner
            .borrow()
            .timers
            .values()
            .map(|t| t.fire_at)
            .min()
    }

    /// Remove and return the earliest timer due at or before `cutoff`
    ///
    /// Equal deadlines break ties by scheduling order.
    fn pop_due(&self, cutoff: u64) -> Option<PendingTimer> {
        let mut inner = self.inner.borrow_mut();
        let best = inner
            .timers
            .iter()
            .filter(|(_, t)| t.fire_at <= cutoff)
            .min_by_key(|(_, t)| (t.fire_at, t.seq))
            .map(|(id, _)| id)?;
        inner.timers.remove(best)
    }
}

impl<C: Clock> TimerHost for TimerQueue<C> {
    fn schedule(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) -> TimerId {
        let fire_at = self.clock.now_ms().saturating_add(delay_ms);
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.timers.insert(PendingTimer {
            fire_at,
            seq,
            callback,
        })
    }

    fn cancel(&self, id: TimerId) {
        self.inner.borrow_mut().timers.remove(id);
    }
}

impl<C: Clock> Clock for TimerQueue<C> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

impl TimerQueue<VirtualClock> {
    /// Move virtual time forward by `ms`, firing every timer due on the way
    ///
    /// Timers fire in deadline order; the clock steps to each deadline before
    /// its callback runs, so callbacks observe the time they were scheduled
    /// for (or later, if an earlier callback consumed time). Timers scheduled
    /// during the sweep fire in the same sweep when they fall within the
    /// horizon.
    pub fn advance(&self, ms: u64) {
        let target = self.clock.now_ms().saturating_add(ms);
        while let Some(timer) = self.pop_due(target) {
            self.clock.set_ms(timer.fire_at);
            (timer.callback)();
        }
        self.clock.set_ms(target);
    }

    /// Advance until no pending timers remain
    ///
    /// Diverges if callbacks reschedule forever; callers drive unbounded
    /// workloads with [`advance`](Self::advance) instead.
    pub fn run_until_idle(&self) {
        while let Some(deadline) = self.next_deadline() {
            let now = self.clock.now_ms();
            self.advance(deadline.saturating_sub(now));
        }
    }
}

impl TimerQueue<SystemClock> {
    /// Fire everything currently due and report the delay until the next
    /// deadline, if any
    pub fn poll(&self) -> Option<u64> {
        loop {
            let now = self.clock.now_ms();
            match self.pop_due(now) {
                Some(timer) => (timer.callback)(),
                None => break,
            }
        }
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(self.clock.now_ms()))
    }

    /// Blocking cooperative loop: poll, sleep until the next deadline, repeat
    ///
    /// Returns once the queue is empty. Runs entirely on the calling thread.
    pub fn run_until_idle(&self) {
        while let Some(delay) = self.poll() {
            if delay > 0 {
                thread::sleep(Duration::from_millis(delay));
            }
        }
    }
}
