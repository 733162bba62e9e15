//! Single-track animation controller
//!
//! A [`Tween`] drives one interpolation track: each tick of its
//! drift-corrected [`Ticker`] advances a progress coordinate by a fixed
//! step, maps it through the configured curve, and hands the value to the
//! caller's frame callback. Reaching the end of the domain releases the
//! ticker and fires the optional completion callback exactly once, after
//! the final frame.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use tempo_animation::{Easing, Tween};
//! use tempo_platform::{TimerQueue, VirtualClock};
//!
//! let host = Rc::new(TimerQueue::new(VirtualClock::new()));
//! let tween = Tween::builder(host.clone(), |value| println!("x = {value}"))
//!     .range(0.0, 240.0)
//!     .fps(30)
//!     .duration_ms(500)
//!     .easing(Easing::EaseInOutQuad)
//!     .build();
//!
//! tween.start();
//! host.advance(500); // drives the whole run
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use tempo_platform::Platform;

use crate::easing::Easing;
use crate::ticker::Ticker;

/// Where a tween is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    /// Constructed or paused; not advancing
    Idle,
    /// A ticker is armed and driving the track
    Running,
    /// The track reached the end of its domain and released its ticker
    Finished,
}

enum Curve {
    Preset {
        easing: Easing,
        begin: f32,
        end: f32,
    },
    Custom(Box<dyn Fn(f32) -> f32>),
}

struct TweenInner {
    curve: Curve,
    x_start: f32,
    x_end: f32,
    step: f32,
    total_steps: f32,
    position: f32,
    interval_ms: f64,
    delay_ms: u64,
    fps: u32,
    enabled: bool,
    finished: bool,
    ticker: Option<Ticker>,
    on_frame: Rc<RefCell<dyn FnMut(f32)>>,
    on_complete: Option<Rc<RefCell<dyn FnMut()>>>,
}

impl TweenInner {
    fn eval(&self, position: f32) -> f32 {
        match &self.curve {
            Curve::Preset { easing, begin, end } => {
                easing.sample(position, *begin, *end, self.total_steps)
            }
            Curve::Custom(func) => func(position),
        }
    }
}

/// Builder for a [`Tween`]
///
/// Only the platform and the per-frame callback are required; every other
/// option has the engine's defaults (0..100 over one second at 60 fps,
/// linear, disabled). A custom curve function overrides the preset easing
/// and range: it is evaluated directly at the progress coordinate over its
/// explicit domain.
pub struct TweenBuilder {
    platform: Rc<dyn Platform>,
    begin: f32,
    end: f32,
    fps: u32,
    duration_ms: u64,
    delay_ms: u64,
    easing: Easing,
    curve_fn: Option<Box<dyn Fn(f32) -> f32>>,
    x_start: f32,
    x_end: f32,
    enabled: bool,
    on_frame: Box<dyn FnMut(f32)>,
    on_complete: Option<Box<dyn FnMut()>>,
}

impl TweenBuilder {
    fn new(platform: Rc<dyn Platform>, on_frame: impl FnMut(f32) + 'static) -> Self {
        Self {
            platform,
            begin: 0.0,
            end: 100.0,
            fps: 60,
            duration_ms: 1000,
            delay_ms: 0,
            easing: Easing::Linear,
            curve_fn: None,
            x_start: 0.0,
            x_end: 1.0,
            enabled: false,
            on_frame: Box::new(on_frame),
            on_complete: None,
        }
    }

    /// Output range of the preset curve
    pub fn range(mut self, begin: f32, end: f32) -> Self {
        self.begin = begin;
        self.end = end;
        self
    }

    /// Sampling rate in frames per second
    ///
    /// `0` is not rejected: the tween arms but never ticks.
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Total run duration in milliseconds
    ///
    /// `0` is not rejected: the run completes on the spot when enabled.
    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Extra delay before the first tick of every enable transition
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Named easing preset shaping the output
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Custom curve function, evaluated at the raw progress coordinate
    ///
    /// Overrides [`easing`](Self::easing) and [`range`](Self::range); pair
    /// with [`domain`](Self::domain) to control the coordinate span.
    pub fn curve_fn(mut self, func: impl Fn(f32) -> f32 + 'static) -> Self {
        self.curve_fn = Some(Box::new(func));
        self
    }

    /// Progress-coordinate domain for a custom curve (default `0..1`)
    pub fn domain(mut self, x_start: f32, x_end: f32) -> Self {
        self.x_start = x_start;
        self.x_end = x_end;
        self
    }

    /// Arm immediately at construction
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Completion callback, invoked exactly once per full run
    pub fn on_complete(mut self, on_complete: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(on_complete));
        self
    }

    /// Finalize the configuration into a [`Tween`]
    ///
    /// Derived quantities (total steps, step size, tick interval) are fixed
    /// here; they are not recomputed mid-run.
    pub fn build(self) -> Tween {
        let total_steps = self.fps as f32 * self.duration_ms as f32 / 1000.0;

        let (curve, x_start, x_end, step) = match self.curve_fn {
            Some(func) => {
                let span = self.x_end - self.x_start;
                let step = if total_steps > 0.0 {
                    span / total_steps
                } else {
                    span
                };
                (Curve::Custom(func), self.x_start, self.x_end, step)
            }
            None => (
                Curve::Preset {
                    easing: self.easing,
                    begin: self.begin,
                    end: self.end,
                },
                0.0,
                total_steps,
                1.0,
            ),
        };

        // The clock is whole-millisecond, so the cadence floors at 1ms.
        let interval_ms = if self.fps == 0 {
            f64::INFINITY
        } else {
            (1000.0 / self.fps as f64).max(1.0)
        };

        let tween = Tween {
            platform: self.platform,
            inner: Rc::new(RefCell::new(TweenInner {
                curve,
                x_start,
                x_end,
                step,
                total_steps,
                position: x_start,
                interval_ms,
                delay_ms: self.delay_ms,
                fps: self.fps,
                enabled: false,
                finished: false,
                ticker: None,
                on_frame: Rc::new(RefCell::new(self.on_frame)),
                on_complete: self
                    .on_complete
                    .map(|cb| Rc::new(RefCell::new(cb)) as Rc<RefCell<dyn FnMut()>>),
            })),
        };

        if self.enabled {
            tween.set_enabled(true);
        }
        tween
    }
}

/// One animation track over a drift-corrected ticker
///
/// All lifecycle methods are synchronous and re-entrant from the frame
/// callback; after `stop()`, `pause()`, or `restart()` returns, no tick from
/// the previous epoch can fire. Each enable transition owns a fresh ticker,
/// released again on disable, so a stale shot from an earlier run can never
/// be misattributed to a later one.
pub struct Tween {
    platform: Rc<dyn Platform>,
    inner: Rc<RefCell<TweenInner>>,
}

impl Tween {
    /// Start configuring a tween for `platform`, delivering values to
    /// `on_frame`
    pub fn builder(
        platform: Rc<dyn Platform>,
        on_frame: impl FnMut(f32) + 'static,
    ) -> TweenBuilder {
        TweenBuilder::new(platform, on_frame)
    }

    /// Arm or disarm the track
    ///
    /// A no-op when `enabled` already matches, guarding redundant ticker
    /// churn. Disabling preserves the current position; no completion fires.
    pub fn set_enabled(&self, enabled: bool) {
        if self.inner.borrow().enabled == enabled {
            return;
        }
        if enabled {
            self.arm();
        } else {
            self.disarm();
        }
    }

    /// Arm the track, resuming from the current position
    pub fn start(&self) {
        self.set_enabled(true);
    }

    /// Disarm the track, keeping the current position
    pub fn pause(&self) {
        self.set_enabled(false);
    }

    /// Disarm the track and reset the position to the start of the domain
    ///
    /// Never fires the completion callback. Idempotent.
    pub fn stop(&self) {
        let mut tween = self.inner.borrow_mut();
        if let Some(ticker) = tween.ticker.take() {
            ticker.stop();
        }
        tween.enabled = false;
        tween.finished = false;
        tween.position = tween.x_start;
        tracing::debug!("tween stopped");
    }

    /// Rewind to the start of the domain and arm a fresh ticker
    ///
    /// Defined from every state; unconditionally discards any live ticker,
    /// even when already running.
    pub fn restart(&self) {
        {
            let mut tween = self.inner.borrow_mut();
            if let Some(ticker) = tween.ticker.take() {
                ticker.stop();
            }
            tween.enabled = false;
            tween.finished = false;
            tween.position = tween.x_start;
        }
        tracing::debug!("tween restarted");
        self.arm();
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.borrow().enabled
    }

    /// Current progress coordinate in `[x_start, x_end]`
    pub fn position(&self) -> f32 {
        self.inner.borrow().position
    }

    /// Curve value at the current position
    pub fn value(&self) -> f32 {
        let tween = self.inner.borrow();
        tween.eval(tween.position)
    }

    pub fn state(&self) -> PlayState {
        let tween = self.inner.borrow();
        if tween.enabled {
            PlayState::Running
        } else if tween.finished {
            PlayState::Finished
        } else {
            PlayState::Idle
        }
    }

    fn arm(&self) {
        let (fps, interval_ms, delay_ms, immediate) = {
            let mut tween = self.inner.borrow_mut();
            tween.enabled = true;
            tween.finished = false;
            (
                tween.fps,
                tween.interval_ms,
                tween.delay_ms,
                tween.total_steps <= 0.0,
            )
        };

        // A zero duration completes on the spot; there is nothing for a
        // ticker to schedule. A zero frame rate takes precedence and arms a
        // never-firing ticker instead, so the track stays observably owned.
        if fps > 0 && immediate {
            Self::run_tick(&self.inner);
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        let ticker = Ticker::new(Rc::clone(&self.platform), interval_ms, move || {
            if let Some(inner) = weak.upgrade() {
                Tween::run_tick(&inner);
            }
        });
        ticker.start(delay_ms);
        self.inner.borrow_mut().ticker = Some(ticker);
        tracing::debug!(fps, delay_ms, "tween armed");
    }

    fn disarm(&self) {
        let mut tween = self.inner.borrow_mut();
        if let Some(ticker) = tween.ticker.take() {
            ticker.stop();
        }
        tween.enabled = false;
        tracing::debug!(position = tween.position, "tween paused");
    }

    /// Advance one step and deliver the frame; finish on saturation
    fn run_tick(inner: &Rc<RefCell<TweenInner>>) {
        let (on_frame, value, on_complete) = {
            let mut tween = inner.borrow_mut();
            if !tween.enabled {
                return;
            }

            tween.position = (tween.position + tween.step).min(tween.x_end);
            let value = tween.eval(tween.position);

            let mut on_complete = None;
            if tween.position >= tween.x_end {
                if let Some(ticker) = tween.ticker.take() {
                    ticker.stop();
                }
                tween.enabled = false;
                tween.finished = true;
                on_complete = tween.on_complete.clone();
                tracing::debug!("tween finished");
            }
            (Rc::clone(&tween.on_frame), value, on_complete)
        };

        // Callbacks run with no internal borrow held so they may re-enter
        // lifecycle methods on this tween.
        (&mut *on_frame.borrow_mut())(value);
        if let Some(on_complete) = on_complete {
            (&mut *on_complete.borrow_mut())();
        }
    }
}

impl Drop for Tween {
    fn drop(&mut self) {
        let mut tween = self.inner.borrow_mut();
        if let Some(ticker) = tween.ticker.take() {
            ticker.stop();
        }
        tween.enabled = false;
    }
}
