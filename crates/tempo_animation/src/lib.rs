//! Tempo Animation Engine
//!
//! Frame-driven value animation for resource-constrained embedded UI
//! devices: a numeric range, a duration, and an interpolation curve in; a
//! steady sequence of intermediate values out, delivered to a caller
//! callback at a fixed cadence.
//!
//! # Features
//!
//! - **Drift-Corrected Ticking**: [`Ticker`] turns an imprecise single-shot
//!   delay primitive into a phase-locked repeating tick source
//! - **Tween Tracks**: [`Tween`] drives one interpolation track with
//!   start/pause/stop/restart lifecycle and exactly-once completion
//! - **Easing Presets**: [`Easing`] covers the standard polynomial,
//!   trigonometric, exponential, and bounce families
//! - **Value Helpers**: color and widget-frame interpolation for writing
//!   animated values into a widget system
//! - **Deterministic Testing**: drive everything with virtual time via
//!   `tempo_platform`
//!
//! The engine is single-threaded and cooperative: all scheduling goes
//! through the host's [`Platform`](tempo_platform::Platform) (a monotonic
//! millisecond clock plus a cancelable single-shot timer), and `stop()` /
//! `pause()` / `restart()` guarantee no further tick after they return.

pub mod easing;
pub mod ticker;
pub mod tween;
pub mod values;

pub use easing::Easing;
pub use ticker::Ticker;
pub use tween::{PlayState, Tween, TweenBuilder};
pub use values::{mix_color, rainbow_color, Border, Interpolate};
