//! Rate clock - logical time projected from a monotonic source
//!
//! Logical time is piecewise linear in monotonic time. Each rate change
//! closes the current segment and anchors the next one at a sync point, so
//! durations between any two readings stay consistent across rate changes.

use tracing::{debug, trace, warn};

use chrona_core::{ChronaError, ChronaResult, LogicalDuration, LogicalTime, MonotonicTime};

use crate::{LogicalClock, MonotonicSource, Origin, RateClockConfig, SystemMonotonic};

/// Anchor of the current segment: the monotonic reading and the logical
/// time that were paired at construction or at the last rate change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncPoint {
    pub monotonic: MonotonicTime,
    pub logical: LogicalTime,
}

/// Which way logical time is moving
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Stopped,
    Reverse,
}

impl Direction {
    /// NaN counts as stopped: the clock arithmetic freezes on it.
    pub fn from_rate(rate: f64) -> Self {
        if rate > 0.0 {
            Direction::Forward
        } else if rate < 0.0 {
            Direction::Reverse
        } else {
            Direction::Stopped
        }
    }
}

/// Variable-rate logical clock (stopwatch)
///
/// INVARIANT: for any reading `t >= sync.monotonic`,
/// `now() == sync.logical + (t - sync.monotonic) * rate`.
///
/// The rate may be zero (logical time freezes) or negative (logical time
/// runs backward), so `now()` is not monotonic. A clock running backward
/// eventually moves before the epoch and, given enough time, past the
/// range of `i64` nanoseconds. That is not checked: past the range `now()`
/// returns an unspecified value. Callers bound how long the clock runs in
/// reverse, or use [`RateClock::checked_now`] and
/// [`LogicalTime::since_epoch`].
///
/// The clock does no internal locking. Share it across threads behind a
/// lock such as [`crate::SharedRateClock`].
#[derive(Clone, Debug)]
pub struct RateClock<S = SystemMonotonic> {
    source: S,
    sync: SyncPoint,
    rate: f64,
}

impl RateClock<SystemMonotonic> {
    /// Create a clock on the system monotonic source running at real-time speed
    pub fn new() -> Self {
        Self::with_rate(1.0)
    }

    /// Create a clock on the system monotonic source
    pub fn with_rate(rate: f64) -> Self {
        Self::with_source(SystemMonotonic::new(), rate)
    }
}

impl Default for RateClock<SystemMonotonic> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MonotonicSource> RateClock<S> {
    /// Create a clock aligned with `source`: logical time starts at the
    /// source's own time since its epoch.
    pub fn with_source(source: S, rate: f64) -> Self {
        let monotonic = source.now();
        Self::anchored(source, monotonic, LogicalTime::from(monotonic), rate)
    }

    /// Create a clock from a validated configuration
    pub fn with_config(source: S, config: RateClockConfig) -> ChronaResult<Self> {
        config.validate()?;

        let monotonic = source.now();
        let logical = match config.origin {
            Origin::Source => LogicalTime::from(monotonic),
            Origin::At(t) => t,
        };
        Ok(Self::anchored(source, monotonic, logical, config.rate))
    }

    fn anchored(source: S, monotonic: MonotonicTime, logical: LogicalTime, rate: f64) -> Self {
        if !rate.is_finite() {
            warn!(rate, "rate clock created with a non-finite rate");
        }
        let sync = SyncPoint { monotonic, logical };
        trace!(?sync, rate, "rate clock created");
        RateClock { source, sync, rate }
    }

    /// Current logical time.
    ///
    /// Reads the source once and projects it through the current segment.
    /// Does not move the sync point, so rounding error stays bounded to one
    /// multiplication per reading.
    pub fn now(&self) -> LogicalTime {
        self.project().1
    }

    /// Current logical time, or an error instead of an out-of-range value.
    pub fn checked_now(&self) -> ChronaResult<LogicalTime> {
        if !self.rate.is_finite() {
            return Err(ChronaError::NonFiniteRate(self.rate));
        }

        let elapsed = self.elapsed_logical(self.source.now()).trunc();
        // i64::MAX as f64 rounds up to 2^63, hence the strict bound
        if !(elapsed >= i64::MIN as f64 && elapsed < i64::MAX as f64) {
            return Err(ChronaError::LogicalOverflow);
        }
        self.sync
            .logical
            .checked_add(LogicalDuration(elapsed as i64))
            .ok_or(ChronaError::LogicalOverflow)
    }

    /// Change the rate without a jump in logical time.
    ///
    /// Logical time is captured with the old rate and becomes the new sync
    /// point; only the slope changes from here on. Any `f64` is accepted:
    /// zero pauses, negative runs backward. A NaN rate freezes the clock.
    pub fn set_rate(&mut self, rate: f64) {
        if !rate.is_finite() {
            warn!(rate, "non-finite rate set on rate clock");
        }

        let (monotonic, logical) = self.project();
        debug!(
            old_rate = self.rate,
            new_rate = rate,
            ?logical,
            "rate clock rate changed"
        );

        self.sync = SyncPoint { monotonic, logical };
        self.rate = rate;
    }

    /// Like [`RateClock::set_rate`], but refuses non-finite rates and leaves
    /// the clock untouched.
    pub fn try_set_rate(&mut self, rate: f64) -> ChronaResult<()> {
        if !rate.is_finite() {
            return Err(ChronaError::NonFiniteRate(rate));
        }
        self.set_rate(rate);
        Ok(())
    }

    /// Current rate, exactly as last set
    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn direction(&self) -> Direction {
        Direction::from_rate(self.rate)
    }

    pub fn sync_point(&self) -> SyncPoint {
        self.sync
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn project(&self) -> (MonotonicTime, LogicalTime) {
        let monotonic = self.source.now();
        // `as` truncates toward zero and saturates; NaN becomes 0
        let elapsed = self.elapsed_logical(monotonic) as i64;
        let logical = LogicalTime(self.sync.logical.0.wrapping_add(elapsed));
        (monotonic, logical)
    }

    #[inline]
    fn elapsed_logical(&self, monotonic: MonotonicTime) -> f64 {
        (monotonic - self.sync.monotonic).as_nanos() as f64 * self.rate
    }
}

impl<S: MonotonicSource> LogicalClock for RateClock<S> {
    const IS_STEADY: bool = false;

    fn now(&self) -> LogicalTime {
        RateClock::now(self)
    }

    fn rate(&self) -> f64 {
        RateClock::rate(self)
    }
}
