//! Lock-guarded rate clock for use from several threads

use std::sync::Arc;

use parking_lot::Mutex;

use chrona_core::{ChronaResult, LogicalTime};

use crate::{LogicalClock, MonotonicSource, RateClock, SystemMonotonic};

/// A [`RateClock`] behind a mutex. Clones share one clock.
///
/// Each call takes the lock once, so a rate change and a reading never
/// interleave. Sequences that must be atomic go through [`SharedRateClock::with`].
pub struct SharedRateClock<S = SystemMonotonic> {
    inner: Arc<Mutex<RateClock<S>>>,
}

impl<S> Clone for SharedRateClock<S> {
    fn clone(&self) -> Self {
        SharedRateClock {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: MonotonicSource> SharedRateClock<S> {
    pub fn new(clock: RateClock<S>) -> Self {
        SharedRateClock {
            inner: Arc::new(Mutex::new(clock)),
        }
    }

    pub fn now(&self) -> LogicalTime {
        self.inner.lock().now()
    }

    pub fn set_rate(&self, rate: f64) {
        self.inner.lock().set_rate(rate);
    }

    pub fn try_set_rate(&self, rate: f64) -> ChronaResult<()> {
        self.inner.lock().try_set_rate(rate)
    }

    pub fn rate(&self) -> f64 {
        self.inner.lock().rate()
    }

    /// Run `f` with the lock held
    pub fn with<R>(&self, f: impl FnOnce(&mut RateClock<S>) -> R) -> R {
        let mut clock = self.inner.lock();
        f(&mut *clock)
    }
}

impl<S: MonotonicSource> From<RateClock<S>> for SharedRateClock<S> {
    fn from(clock: RateClock<S>) -> Self {
        Self::new(clock)
    }
}

impl<S: MonotonicSource> LogicalClock for SharedRateClock<S> {
    const IS_STEADY: bool = false;

    fn now(&self) -> LogicalTime {
        SharedRateClock::now(self)
    }

    fn rate(&self) -> f64 {
        SharedRateClock::rate(self)
    }
}
