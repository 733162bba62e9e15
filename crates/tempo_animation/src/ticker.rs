//! Drift-correcting tick source
//!
//! Turns the platform's imprecise "run once after N ms" primitive into a
//! steady repeating callback. Rescheduling for `interval` after each firing
//! would accumulate the time consumed by the callback and by scheduling
//! jitter; anchoring to an absolute deadline keeps long-running animations
//! phase-locked to the clock.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tempo_platform::{Clock, Platform, TimerHost, TimerId};

struct TickerInner {
    interval_ms: f64,
    next_deadline: f64,
    running: bool,
    pending: Option<TimerId>,
    callback: Rc<RefCell<dyn FnMut()>>,
}

/// A repeating callback at a fixed nominal interval
///
/// Owns at most one pending single-shot timer at a time. Each firing
/// measures the scheduling error against the absolute target deadline and
/// compensates when arming the next shot; a stall longer than one full
/// interval (device sleep, long suspend) resynchronizes the deadline to the
/// current time instead of replaying the backlog tick by tick.
///
/// Deadlines are tracked in fractional milliseconds so intervals like
/// `1000 / 60` stay phase-locked over a whole-millisecond delay primitive.
///
/// A non-finite or non-positive interval arms the ticker without ever
/// firing; degenerate configuration degrades, it does not crash.
pub struct Ticker {
    platform: Rc<dyn Platform>,
    inner: Rc<RefCell<TickerInner>>,
}

impl Ticker {
    pub fn new<F>(platform: Rc<dyn Platform>, interval_ms: f64, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        Self {
            platform,
            inner: Rc::new(RefCell::new(TickerInner {
                interval_ms,
                next_deadline: 0.0,
                running: false,
                pending: None,
                callback: Rc::new(RefCell::new(callback)),
            })),
        }
    }

    /// Arm the ticker; the first firing lands `delay + interval` from now
    ///
    /// Starting a running ticker discards its pending firing and re-arms.
    pub fn start(&self, delay_ms: u64) {
        let now = self.platform.now_ms() as f64;
        {
            let mut ticker = self.inner.borrow_mut();
            if let Some(id) = ticker.pending.take() {
                self.platform.cancel(id);
            }
            ticker.running = true;
            ticker.next_deadline = now + delay_ms as f64 + ticker.interval_ms;
            if !fires(ticker.interval_ms) {
                return;
            }
            let delay = (ticker.next_deadline - now).max(0.0);
            ticker.pending = Some(self.schedule_fire(delay));
        }
        tracing::trace!(interval_ms = self.inner.borrow().interval_ms, "ticker armed");
    }

    /// Disarm the ticker and cancel any pending firing
    ///
    /// Idempotent; the ticker may be started again afterwards. An in-flight
    /// firing that already left the platform queue observes `running ==
    /// false` and becomes a no-op.
    pub fn stop(&self) {
        let mut ticker = self.inner.borrow_mut();
        ticker.running = false;
        if let Some(id) = ticker.pending.take() {
            self.platform.cancel(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.borrow().running
    }

    pub fn interval_ms(&self) -> f64 {
        self.inner.borrow().interval_ms
    }

    fn schedule_fire(&self, delay_ms: f64) -> TimerId {
        let platform = Rc::downgrade(&self.platform);
        let inner = Rc::downgrade(&self.inner);
        self.platform.schedule(
            delay_ms.round() as u64,
            Box::new(move || Self::fire(&platform, &inner)),
        )
    }

    /// One firing of the underlying delay primitive
    fn fire(platform: &Weak<dyn Platform>, weak: &Weak<RefCell<TickerInner>>) {
        let (Some(platform), Some(inner)) = (platform.upgrade(), weak.upgrade()) else {
            return;
        };

        let callback = {
            let mut ticker = inner.borrow_mut();
            if !ticker.running {
                return;
            }
            ticker.pending = None;

            let now = platform.now_ms() as f64;
            let error = now - ticker.next_deadline;
            if error > ticker.interval_ms {
                // Fell behind by more than one full period: re-anchor to now
                // instead of replaying the backlog tick by tick.
                tracing::debug!(error_ms = error, "ticker resynchronized after stall");
                ticker.next_deadline = now;
            } else {
                ticker.next_deadline += ticker.interval_ms;
            }
            Rc::clone(&ticker.callback)
        };

        // No internal borrow held: the callback may stop or restart us.
        (&mut *callback.borrow_mut())();

        let mut ticker = inner.borrow_mut();
        if ticker.running && ticker.pending.is_none() {
            let now = platform.now_ms() as f64;
            let delay = (ticker.next_deadline - now).max(0.0);
            let platform_weak = Rc::downgrade(&platform);
            let inner_weak = Rc::downgrade(&inner);
            ticker.pending = Some(platform.schedule(
                delay.round() as u64,
                Box::new(move || Self::fire(&platform_weak, &inner_weak)),
            ));
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Whether an interval can ever produce a firing
fn fires(interval_ms: f64) -> bool {
    interval_ms.is_finite() && interval_ms > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempo_platform::{Clock, TimerQueue, VirtualClock};

    fn host() -> Rc<TimerQueue<VirtualClock>> {
        Rc::new(TimerQueue::new(VirtualClock::new()))
    }

    fn recording_ticker(
        host: &Rc<TimerQueue<VirtualClock>>,
        interval_ms: f64,
    ) -> (Ticker, Rc<RefCell<Vec<u64>>>) {
        let times = Rc::new(RefCell::new(Vec::new()));
        let clock = host.clock().clone();
        let sink = Rc::clone(&times);
        let ticker = Ticker::new(host.clone(), interval_ms, move || {
            sink.borrow_mut().push(clock.now_ms());
        });
        (ticker, times)
    }

    #[test]
    fn ticks_at_a_steady_cadence() {
        let host = host();
        let (ticker, times) = recording_ticker(&host, 100.0);

        ticker.start(0);
        host.advance(1000);

        assert_eq!(*times.borrow(), (1..=10).map(|n| n * 100).collect::<Vec<_>>());
    }

    #[test]
    fn start_delay_offsets_the_first_tick() {
        let host = host();
        let (ticker, times) = recording_ticker(&host, 100.0);

        ticker.start(250);
        host.advance(1000);

        assert_eq!(*times.borrow(), vec![350, 450, 550, 650, 750, 850, 950]);
    }

    #[test]
    fn callback_jitter_does_not_accumulate_drift() {
        let host = host();
        let clock = host.clock().clone();
        let times = Rc::new(RefCell::new(Vec::new()));

        // Each tick's processing burns a pseudo-random 0..=20ms before the
        // next shot is armed.
        let sink = Rc::clone(&times);
        let busy = clock.clone();
        let mut seed = 7u64;
        let ticker = Ticker::new(host.clone(), 100.0, move || {
            sink.borrow_mut().push(busy.now_ms());
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            busy.advance(seed % 21);
        });

        ticker.start(0);
        host.advance(10_000);
        ticker.stop();

        let times = times.borrow();
        assert_eq!(times.len(), 100);
        for (i, &t) in times.iter().enumerate() {
            let nominal = (i as u64 + 1) * 100;
            assert!(
                t >= nominal && t - nominal < 100,
                "tick {i} fired at {t}, nominal {nominal}"
            );
        }
    }

    #[test]
    fn resynchronizes_after_a_long_stall() {
        let host = host();
        let (ticker, times) = recording_ticker(&host, 100.0);

        ticker.start(0);
        host.advance(100);
        assert_eq!(*times.borrow(), vec![100]);

        // Simulated suspend: the 200ms shot is delivered at 600ms. The
        // deadline re-anchors to 600, producing one catch-up tick, then the
        // normal cadence resumes from there.
        host.clock().advance(500);
        host.advance(300);

        assert_eq!(*times.borrow(), vec![100, 600, 600, 700, 800, 900]);
    }

    #[test]
    fn stop_cancels_the_pending_shot() {
        let host = host();
        let (ticker, times) = recording_ticker(&host, 100.0);

        ticker.start(0);
        host.advance(250);
        ticker.stop();
        host.advance(1000);

        assert_eq!(*times.borrow(), vec![100, 200]);
        assert_eq!(host.pending(), 0);
    }

    #[test]
    fn stop_is_idempotent_and_restartable() {
        let host = host();
        let (ticker, times) = recording_ticker(&host, 100.0);

        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());

        ticker.start(0);
        host.advance(200);
        ticker.stop();
        ticker.stop();

        ticker.start(0);
        host.advance(100);
        assert_eq!(*times.borrow(), vec![100, 200, 300]);
    }

    #[test]
    fn stop_from_inside_the_callback_halts_ticking() {
        let host = host();
        let count = Rc::new(RefCell::new(0u32));
        let ticker = Rc::new(RefCell::new(None::<Ticker>));

        let sink = Rc::clone(&count);
        let this = Rc::clone(&ticker);
        let t = Ticker::new(host.clone(), 100.0, move || {
            *sink.borrow_mut() += 1;
            if *sink.borrow() == 3 {
                if let Some(t) = this.borrow().as_ref() {
                    t.stop();
                }
            }
        });
        t.start(0);
        *ticker.borrow_mut() = Some(t);

        host.advance(1000);
        assert_eq!(*count.borrow(), 3);
        assert_eq!(host.pending(), 0);
    }

    #[test]
    fn dropping_the_ticker_cancels_it() {
        let host = host();
        let (ticker, times) = recording_ticker(&host, 100.0);

        ticker.start(0);
        host.advance(100);
        drop(ticker);
        host.advance(1000);

        assert_eq!(*times.borrow(), vec![100]);
        assert_eq!(host.pending(), 0);
    }

    #[test]
    fn unbounded_interval_never_fires() {
        let host = host();
        let (ticker, times) = recording_ticker(&host, f64::INFINITY);

        ticker.start(0);
        assert!(ticker.is_running());
        host.advance(1_000_000);

        assert!(times.borrow().is_empty());
        assert_eq!(host.pending(), 0);
        ticker.stop();
        assert!(!ticker.is_running());
    }

    #[test]
    fn fractional_interval_stays_phase_locked() {
        let host = host();
        let (ticker, times) = recording_ticker(&host, 1000.0 / 60.0);

        ticker.start(0);
        host.advance(1000);
        ticker.stop();

        // 60 ticks per simulated second, not the 59-ish a truncated
        // 16ms reschedule would produce.
        let n = times.borrow().len();
        assert!((59..=61).contains(&n), "{n} ticks");
    }
}
