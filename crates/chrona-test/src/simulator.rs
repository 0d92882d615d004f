//! Rate Clock Simulator - drives a clock through a rate schedule
//!
//! Simulates:
//! - A manual monotonic source advancing in fixed ticks
//! - Rate changes at segment boundaries
//! - A reference model of the expected logical time at every tick

use std::time::Duration;

use chrona_core::{LogicalDuration, LogicalTime, MonotonicTime};
use chrona_time::{ManualSource, RateClock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One constant-rate stretch of monotonic time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub rate: f64,
    pub duration: Duration,
}

impl Segment {
    pub fn new(rate: f64, duration: Duration) -> Self {
        Segment { rate, duration }
    }

    /// Logical advance over the first `elapsed` of this segment, truncated
    /// to whole nanoseconds the same way the clock truncates.
    pub fn logical_advance(&self, elapsed: Duration) -> LogicalDuration {
        let elapsed = elapsed.min(self.duration);
        LogicalDuration((elapsed.as_nanos() as f64 * self.rate) as i64)
    }
}

/// Ordered list of segments
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RateSchedule {
    segments: Vec<Segment>,
}

impl RateSchedule {
    pub fn new() -> Self {
        RateSchedule::default()
    }

    pub fn then(mut self, rate: f64, duration: Duration) -> Self {
        self.segments.push(Segment::new(rate, duration));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total monotonic time covered
    pub fn total_duration(&self) -> Duration {
        self.segments.iter().map(|s| s.duration).sum()
    }

    /// Logical time elapsed after `at` of monotonic time: the sum of
    /// `duration * rate` over every segment reached so far.
    pub fn expected_elapsed(&self, at: Duration) -> LogicalDuration {
        let mut remaining = at;
        let mut total = LogicalDuration::ZERO;

        for segment in &self.segments {
            if remaining.is_zero() {
                break;
            }
            total = total + segment.logical_advance(remaining);
            remaining = remaining.saturating_sub(segment.duration);
        }

        total
    }

    /// Naive estimate using only the final rate; differs from
    /// `expected_elapsed` whenever earlier segments ran at other rates.
    pub fn final_rate_estimate(&self) -> LogicalDuration {
        let rate = self.segments.last().map_or(1.0, |s| s.rate);
        LogicalDuration((self.total_duration().as_nanos() as f64 * rate) as i64)
    }
}

/// A single reading taken during a run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Monotonic time since the run started
    pub elapsed: Duration,
    /// Rate in force when the sample was taken
    pub rate: f64,
    pub logical: LogicalTime,
    pub expected: LogicalTime,
}

impl Sample {
    pub fn deviation(&self) -> LogicalDuration {
        self.logical - self.expected
    }
}

/// Drives a rate clock on a manual source through a schedule
pub struct ClockSimulator {
    source: ManualSource,
    clock: RateClock<ManualSource>,
    tick_interval: Duration,
    start: LogicalTime,
    elapsed: Duration,
}

impl ClockSimulator {
    /// Create a simulator whose source starts at `start`
    pub fn new(start: MonotonicTime, tick_interval: Duration) -> Self {
        let source = ManualSource::new(start);
        let clock = RateClock::with_source(source.clone(), 1.0);
        ClockSimulator {
            start: clock.now(),
            source,
            clock,
            tick_interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Run the whole schedule, sampling after every tick
    pub fn run(&mut self, schedule: &RateSchedule) -> SimulationResult {
        let mut result = SimulationResult::new(self.start);
        let mut covered = Duration::ZERO;

        for segment in schedule.segments() {
            self.clock.set_rate(segment.rate);
            result.rate_changes += 1;

            let mut left = segment.duration;
            while !left.is_zero() {
                let step = if self.tick_interval.is_zero() {
                    left
                } else {
                    left.min(self.tick_interval)
                };
                self.source.advance(step);
                self.elapsed += step;
                covered += step;
                left -= step;

                result.record(Sample {
                    elapsed: covered,
                    rate: segment.rate,
                    logical: self.clock.now(),
                    expected: self.start + schedule.expected_elapsed(covered),
                });
            }
        }

        result.end = self.clock.now();
        result
    }

    pub fn clock(&self) -> &RateClock<ManualSource> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut RateClock<ManualSource> {
        &mut self.clock
    }

    /// Monotonic time driven so far
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// Simulation result and statistics
#[derive(Debug)]
pub struct SimulationResult {
    pub start: LogicalTime,
    pub end: LogicalTime,
    pub samples: Vec<Sample>,
    /// Largest |logical - expected| observed, in nanoseconds
    pub max_deviation_ns: i64,
    pub rate_changes: u32,
}

impl SimulationResult {
    pub fn new(start: LogicalTime) -> Self {
        SimulationResult {
            start,
            end: start,
            samples: Vec::new(),
            max_deviation_ns: 0,
            rate_changes: 0,
        }
    }

    fn record(&mut self, sample: Sample) {
        let deviation = sample.deviation().as_nanos().abs();
        self.max_deviation_ns = self.max_deviation_ns.max(deviation);
        self.samples.push(sample);
    }

    /// Logical duration from the start of the run to its end
    pub fn total_elapsed(&self) -> LogicalDuration {
        self.end - self.start
    }

    /// True if logical time never moved while `rate == 0`
    pub fn pauses_held(&self) -> bool {
        self.samples
            .windows(2)
            .filter(|w| w[1].rate == 0.0 && w[0].rate == 0.0)
            .all(|w| w[0].logical == w[1].logical)
    }
}

/// Predefined rate schedules
pub mod scenarios {
    use super::*;

    /// Reverse, fast-forward, then pause; `phase` each
    pub fn reverse_fast_pause(phase: Duration) -> RateSchedule {
        RateSchedule::new()
            .then(-1.0, phase)
            .then(2.5, phase)
            .then(0.0, phase)
    }

    /// Real-time and reverse segments in turn; nets out to zero
    pub fn back_and_forth(count: usize, phase: Duration) -> RateSchedule {
        (0..count).fold(RateSchedule::new(), |schedule, i| {
            let rate = if i % 2 == 0 { 1.0 } else { -1.0 };
            schedule.then(rate, phase)
        })
    }

    /// Seeded random walk over rates in `[-max_rate, max_rate]`
    pub fn random_walk(seed: u64, count: usize, max_rate: f64) -> RateSchedule {
        let mut rng = StdRng::seed_from_u64(seed);

        (0..count).fold(RateSchedule::new(), |schedule, _| {
            let rate = match rng.gen_range(0..5) {
                0 => 0.0,
                _ => rng.gen_range(-max_rate..=max_rate),
            };
            let duration = Duration::from_micros(rng.gen_range(1..=250_000));
            schedule.then(rate, duration)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TICK: Duration = Duration::from_millis(10);

    fn simulator() -> ClockSimulator {
        ClockSimulator::new(MonotonicTime::from_nanos(5_000_000_000), TICK)
    }

    #[test]
    fn test_reverse_fast_pause() {
        let schedule = scenarios::reverse_fast_pause(Duration::from_secs(1));
        let result = simulator().run(&schedule);

        assert_eq!(result.max_deviation_ns, 0);
        assert_eq!(result.rate_changes, 3);
        assert_eq!(result.total_elapsed(), LogicalDuration::from_millis(1500));
        assert!(result.pauses_held());
    }

    #[test]
    fn test_phase_boundaries() {
        let phase = Duration::from_secs(1);
        let schedule = scenarios::reverse_fast_pause(phase);
        let result = simulator().run(&schedule);

        let at = |elapsed: Duration| {
            result
                .samples
                .iter()
                .find(|s| s.elapsed == elapsed)
                .map(|s| s.logical - result.start)
                .unwrap()
        };

        assert_eq!(at(phase), LogicalDuration::from_millis(-1000));
        assert_eq!(at(phase * 2), LogicalDuration::from_millis(1500));
        assert_eq!(at(phase * 3), LogicalDuration::from_millis(1500));
    }

    #[test]
    fn test_back_and_forth_nets_zero() {
        let schedule = scenarios::back_and_forth(6, Duration::from_millis(333));
        let result = simulator().run(&schedule);

        assert_eq!(result.total_elapsed(), LogicalDuration::ZERO);
        assert_eq!(result.max_deviation_ns, 0);
    }

    #[test]
    fn test_final_rate_estimate_is_wrong_across_segments() {
        let schedule = scenarios::reverse_fast_pause(Duration::from_secs(1));

        assert_eq!(schedule.final_rate_estimate(), LogicalDuration::ZERO);
        assert_eq!(
            schedule.expected_elapsed(schedule.total_duration()),
            LogicalDuration::from_millis(1500)
        );
    }

    #[test]
    fn test_random_walk_is_deterministic() {
        let a = scenarios::random_walk(7, 12, 4.0);
        let b = scenarios::random_walk(7, 12, 4.0);

        assert_eq!(a, b);
        assert_eq!(a.segments().len(), 12);
        assert!(a.segments().iter().all(|s| s.rate.abs() <= 4.0));
    }

    #[test]
    fn test_random_walks_track_the_model() {
        for seed in 0..20 {
            let schedule = scenarios::random_walk(seed, 25, 8.0);
            let result = simulator().run(&schedule);

            assert_eq!(result.max_deviation_ns, 0, "seed {}", seed);
        }
    }

    #[test]
    fn test_zero_tick_interval_samples_once_per_segment() {
        let schedule = scenarios::reverse_fast_pause(Duration::from_millis(40));
        let mut sim = ClockSimulator::new(MonotonicTime::EPOCH, Duration::ZERO);
        let result = sim.run(&schedule);

        assert_eq!(result.samples.len(), 3);
        assert_eq!(sim.elapsed(), Duration::from_millis(120));
    }

    proptest! {
        #[test]
        fn prop_duration_equals_sum_of_segments(
            segments in proptest::collection::vec(
                (-5.0f64..5.0, 1u64..2_000_000),
                1..20,
            )
        ) {
            let schedule = segments.iter().fold(RateSchedule::new(), |s, &(rate, micros)| {
                s.then(rate, Duration::from_micros(micros))
            });

            let mut sim = ClockSimulator::new(MonotonicTime::from_nanos(1_000), Duration::from_millis(100));
            let result = sim.run(&schedule);

            prop_assert_eq!(result.max_deviation_ns, 0);
            prop_assert_eq!(
                result.total_elapsed(),
                schedule.expected_elapsed(schedule.total_duration())
            );
        }
    }
}
