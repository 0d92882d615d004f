//! Time sources: the monotonic input and the logical-clock capability

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use chrona_core::{LogicalTime, MonotonicTime};

/// A non-decreasing source of nanosecond readings since a fixed epoch.
pub trait MonotonicSource {
    /// Readings never decrease.
    const IS_STEADY: bool = true;

    fn now(&self) -> MonotonicTime;
}

impl<S: MonotonicSource + ?Sized> MonotonicSource for &S {
    const IS_STEADY: bool = S::IS_STEADY;

    #[inline]
    fn now(&self) -> MonotonicTime {
        (**self).now()
    }
}

impl<S: MonotonicSource + ?Sized> MonotonicSource for Arc<S> {
    const IS_STEADY: bool = S::IS_STEADY;

    #[inline]
    fn now(&self) -> MonotonicTime {
        (**self).now()
    }
}

/// A clock that carries its own state and is read through an instance.
///
/// Unlike `Instant::now()` there is no static entry point: every instance
/// reports its own logical time, so a `LogicalClock` cannot stand in where a
/// stateless clock is expected.
pub trait LogicalClock {
    /// Whether successive readings are guaranteed not to decrease.
    const IS_STEADY: bool;

    fn now(&self) -> LogicalTime;

    /// Logical advancement per unit of monotonic advancement.
    fn rate(&self) -> f64;
}

/// Monotonic OS clock.
///
/// The epoch is the first reading taken by any `SystemMonotonic` in the
/// process, so readings are comparable across instances.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemMonotonic;

static SYSTEM_EPOCH: OnceLock<Instant> = OnceLock::new();

impl SystemMonotonic {
    pub fn new() -> Self {
        SystemMonotonic
    }

    /// The instant all readings are measured from.
    pub fn epoch() -> Instant {
        *SYSTEM_EPOCH.get_or_init(Instant::now)
    }
}

impl MonotonicSource for SystemMonotonic {
    #[inline]
    fn now(&self) -> MonotonicTime {
        let epoch = Self::epoch();
        MonotonicTime::from_duration(Instant::now().saturating_duration_since(epoch))
    }
}

/// Hand-driven monotonic source for simulation and tests.
///
/// Clones share the same reading, so a test can keep one handle while a
/// clock owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualSource {
    nanos: Arc<AtomicU64>,
}

impl ManualSource {
    /// Create a source whose first reading is `start`.
    pub fn new(start: MonotonicTime) -> Self {
        ManualSource {
            nanos: Arc::new(AtomicU64::new(start.as_nanos())),
        }
    }

    /// Move the reading forward, saturating at `u64::MAX` nanoseconds.
    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_add(by))
            });
    }

    /// Jump to `target`. Earlier targets are ignored to keep readings monotonic.
    pub fn set(&self, target: MonotonicTime) {
        self.nanos.fetch_max(target.as_nanos(), Ordering::AcqRel);
    }
}

impl MonotonicSource for ManualSource {
    #[inline]
    fn now(&self) -> MonotonicTime {
        MonotonicTime::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_source_advances() {
        let source = SystemMonotonic::new();

        let t1 = source.now();
        std::thread::sleep(Duration::from_millis(10));
        let t2 = source.now();

        assert!(t2 > t1);
        assert!(t2 - t1 >= Duration::from_millis(10));
    }

    #[test]
    fn test_system_sources_share_epoch() {
        let a = SystemMonotonic::new();
        let b = SystemMonotonic::new();

        let ta = a.now();
        let tb = b.now();

        assert!(tb >= ta);
    }

    #[test]
    fn test_manual_source_clones_share_reading() {
        let source = ManualSource::new(MonotonicTime::from_nanos(100));
        let handle = source.clone();

        handle.advance(Duration::from_nanos(50));

        assert_eq!(source.now(), MonotonicTime::from_nanos(150));
    }

    #[test]
    fn test_manual_source_never_goes_backward() {
        let source = ManualSource::new(MonotonicTime::from_nanos(1_000));

        source.set(MonotonicTime::from_nanos(500));
        assert_eq!(source.now(), MonotonicTime::from_nanos(1_000));

        source.set(MonotonicTime::from_nanos(2_000));
        assert_eq!(source.now(), MonotonicTime::from_nanos(2_000));
    }

    fn read<S: MonotonicSource>(source: S) -> MonotonicTime {
        source.now()
    }

    #[test]
    fn test_reference_and_arc_sources() {
        let source = ManualSource::new(MonotonicTime::from_nanos(7));
        let shared = Arc::new(source.clone());

        assert_eq!(read(&source), MonotonicTime::from_nanos(7));
        assert_eq!(read(shared), MonotonicTime::from_nanos(7));
        assert!(<Arc<ManualSource> as MonotonicSource>::IS_STEADY);
    }
}
