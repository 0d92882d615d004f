//! Time primitives for Chrona
//!
//! Two timelines share one epoch:
//! - Monotonic time: readings of the underlying source, never decreasing
//! - Logical time: what a rate clock reports, may pause or run backward
//!
//! Both tick in nanoseconds.

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::time::Duration;

use crate::{ChronaError, ChronaResult};

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Monotonic source reading.
/// Represented as nanoseconds since the source's fixed, unspecified epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MonotonicTime(pub u64);

impl MonotonicTime {
    pub const EPOCH: MonotonicTime = MonotonicTime(0);

    #[inline]
    pub fn from_nanos(nanos: u64) -> Self {
        MonotonicTime(nanos)
    }

    #[inline]
    pub fn from_duration(since_epoch: Duration) -> Self {
        MonotonicTime(u64::try_from(since_epoch.as_nanos()).unwrap_or(u64::MAX))
    }

    #[inline]
    pub fn as_nanos(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn since_epoch(self) -> Duration {
        Duration::from_nanos(self.0)
    }

    #[inline]
    pub fn saturating_add(self, duration: Duration) -> Self {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        MonotonicTime(self.0.saturating_add(nanos))
    }
}

impl Sub<MonotonicTime> for MonotonicTime {
    type Output = Duration;

    /// Saturates at zero when `rhs` is the later reading.
    #[inline]
    fn sub(self, rhs: MonotonicTime) -> Self::Output {
        Duration::from_nanos(self.0.saturating_sub(rhs.0))
    }
}

impl std::fmt::Debug for MonotonicTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "τm({:.3}ms)", self.0 as f64 / NANOS_PER_MILLI as f64)
    }
}

/// Logical time as reported by a rate clock.
/// Represented as signed nanoseconds since the monotonic source's epoch;
/// negative values lie before that epoch
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LogicalTime(pub i64);

impl LogicalTime {
    pub const EPOCH: LogicalTime = LogicalTime(0);
    pub const MAX: LogicalTime = LogicalTime(i64::MAX);
    pub const MIN: LogicalTime = LogicalTime(i64::MIN);

    #[inline]
    pub fn from_nanos(nanos: i64) -> Self {
        LogicalTime(nanos)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        LogicalTime(millis * NANOS_PER_MILLI)
    }

    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        LogicalTime((secs * NANOS_PER_SEC) as i64)
    }

    #[inline]
    pub fn as_nanos(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }

    /// Signed offset from the epoch.
    #[inline]
    pub fn offset_from_epoch(self) -> LogicalDuration {
        LogicalDuration(self.0)
    }

    /// Time since the epoch as an unsigned duration.
    ///
    /// A clock that ran backward long enough sits before the epoch, where no
    /// unsigned duration exists.
    pub fn since_epoch(self) -> ChronaResult<Duration> {
        if self.0 < 0 {
            return Err(ChronaError::BeforeEpoch(LogicalDuration(self.0)));
        }
        Ok(Duration::from_nanos(self.0 as u64))
    }

    #[inline]
    pub fn checked_add(self, rhs: LogicalDuration) -> Option<Self> {
        self.0.checked_add(rhs.0).map(LogicalTime)
    }

    #[inline]
    pub fn checked_sub(self, rhs: LogicalDuration) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(LogicalTime)
    }

    /// Duration from `earlier` to `self`, `None` if it does not fit in `i64` nanoseconds.
    #[inline]
    pub fn checked_duration_since(self, earlier: LogicalTime) -> Option<LogicalDuration> {
        self.0.checked_sub(earlier.0).map(LogicalDuration)
    }
}

impl From<MonotonicTime> for LogicalTime {
    /// Readings past `i64::MAX` nanoseconds (about 292 years) saturate.
    #[inline]
    fn from(t: MonotonicTime) -> Self {
        LogicalTime(i64::try_from(t.0).unwrap_or(i64::MAX))
    }
}

impl Add<LogicalDuration> for LogicalTime {
    type Output = LogicalTime;

    #[inline]
    fn add(self, rhs: LogicalDuration) -> Self::Output {
        LogicalTime(self.0 + rhs.0)
    }
}

impl AddAssign<LogicalDuration> for LogicalTime {
    #[inline]
    fn add_assign(&mut self, rhs: LogicalDuration) {
        self.0 += rhs.0;
    }
}

impl Sub<LogicalDuration> for LogicalTime {
    type Output = LogicalTime;

    #[inline]
    fn sub(self, rhs: LogicalDuration) -> Self::Output {
        LogicalTime(self.0 - rhs.0)
    }
}

impl SubAssign<LogicalDuration> for LogicalTime {
    #[inline]
    fn sub_assign(&mut self, rhs: LogicalDuration) {
        self.0 -= rhs.0;
    }
}

impl Sub<LogicalTime> for LogicalTime {
    type Output = LogicalDuration;

    /// Signed: negative when `rhs` is logically later.
    #[inline]
    fn sub(self, rhs: LogicalTime) -> Self::Output {
        LogicalDuration(self.0 - rhs.0)
    }
}

impl std::fmt::Debug for LogicalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "τl({:.3}ms)", self.0 as f64 / NANOS_PER_MILLI as f64)
    }
}

impl std::fmt::Display for LogicalTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

/// Signed span of logical time, in nanoseconds
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LogicalDuration(pub i64);

impl LogicalDuration {
    pub const ZERO: LogicalDuration = LogicalDuration(0);
    pub const MAX: LogicalDuration = LogicalDuration(i64::MAX);
    pub const MIN: LogicalDuration = LogicalDuration(i64::MIN);

    #[inline]
    pub fn from_nanos(nanos: i64) -> Self {
        LogicalDuration(nanos)
    }

    #[inline]
    pub fn from_micros(micros: i64) -> Self {
        LogicalDuration(micros * NANOS_PER_MICRO)
    }

    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        LogicalDuration(millis * NANOS_PER_MILLI)
    }

    /// Truncates toward zero; saturates outside the `i64` range.
    #[inline]
    pub fn from_secs_f64(secs: f64) -> Self {
        LogicalDuration((secs * NANOS_PER_SEC) as i64)
    }

    #[inline]
    pub fn as_nanos(self) -> i64 {
        self.0
    }

    /// Truncates toward zero.
    #[inline]
    pub fn as_micros(self) -> i64 {
        self.0 / NANOS_PER_MICRO
    }

    /// Truncates toward zero.
    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0 / NANOS_PER_MILLI
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// `-1`, `0` or `1`.
    #[inline]
    pub fn signum(self) -> i64 {
        self.0.signum()
    }

    #[inline]
    pub fn unsigned_abs(self) -> Duration {
        Duration::from_nanos(self.0.unsigned_abs())
    }

    /// `None` for negative durations.
    #[inline]
    pub fn to_std(self) -> Option<Duration> {
        u64::try_from(self.0).ok().map(Duration::from_nanos)
    }

    #[inline]
    pub fn checked_add(self, rhs: LogicalDuration) -> Option<Self> {
        self.0.checked_add(rhs.0).map(LogicalDuration)
    }

    #[inline]
    pub fn checked_sub(self, rhs: LogicalDuration) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(LogicalDuration)
    }
}

impl From<Duration> for LogicalDuration {
    /// Saturates at `LogicalDuration::MAX`.
    #[inline]
    fn from(d: Duration) -> Self {
        LogicalDuration(i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
    }
}

impl Neg for LogicalDuration {
    type Output = LogicalDuration;

    #[inline]
    fn neg(self) -> Self::Output {
        LogicalDuration(-self.0)
    }
}

impl Add for LogicalDuration {
    type Output = LogicalDuration;

    #[inline]
    fn add(self, rhs: LogicalDuration) -> Self::Output {
        LogicalDuration(self.0 + rhs.0)
    }
}

impl Sub for LogicalDuration {
    type Output = LogicalDuration;

    #[inline]
    fn sub(self, rhs: LogicalDuration) -> Self::Output {
        LogicalDuration(self.0 - rhs.0)
    }
}

impl std::iter::Sum for LogicalDuration {
    fn sum<I: Iterator<Item = LogicalDuration>>(iter: I) -> Self {
        iter.fold(LogicalDuration::ZERO, |acc, d| acc + d)
    }
}

impl std::fmt::Debug for LogicalDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Δl({:.3}ms)", self.0 as f64 / NANOS_PER_MILLI as f64)
    }
}

impl std::fmt::Display for LogicalDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}
