//! Combined platform interface consumed by the animation engine

use crate::clock::Clock;
use crate::timer::TimerHost;

/// Everything the animation engine asks of its host
///
/// A platform is a monotonic millisecond clock plus a cancelable single-shot
/// delay primitive; any type providing both is a platform. Engine types hold
/// an `Rc<dyn Platform>`, so a [`TimerQueue`](crate::TimerQueue) (or a
/// backend-specific host) plugs in without further glue.
pub trait Platform: Clock + TimerHost {}

impl<T: Clock + TimerHost + ?Sized> Platform for T {}
