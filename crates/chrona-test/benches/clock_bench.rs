//! Benchmarks for rate clock operations

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chrona_core::MonotonicTime;
use chrona_test::{scenarios, ClockSimulator};
use chrona_time::{ManualSource, MonotonicSource, RateClock, SharedRateClock, SystemMonotonic};

fn bench_system_source_now(c: &mut Criterion) {
    let source = SystemMonotonic::new();

    c.bench_function("system_source_now", |b| b.iter(|| black_box(source.now())));
}

fn bench_rate_clock_now(c: &mut Criterion) {
    let clock = RateClock::with_rate(2.5);

    c.bench_function("rate_clock_now", |b| b.iter(|| black_box(clock.now())));
}

fn bench_rate_clock_set_rate(c: &mut Criterion) {
    let mut clock = RateClock::new();

    c.bench_function("rate_clock_set_rate", |b| {
        let mut i = 0u32;
        b.iter(|| {
            i = i.wrapping_add(1);
            clock.set_rate(black_box(if i % 2 == 0 { -1.0 } else { 2.5 }));
        })
    });
}

fn bench_shared_clock_now(c: &mut Criterion) {
    let clock = SharedRateClock::new(RateClock::with_rate(0.5));

    c.bench_function("shared_clock_now", |b| b.iter(|| black_box(clock.now())));
}

fn bench_manual_clock_advance_and_read(c: &mut Criterion) {
    let source = ManualSource::new(MonotonicTime::EPOCH);
    let clock = RateClock::with_source(source.clone(), -0.3);
    let dt = Duration::from_micros(10);

    c.bench_function("manual_clock_advance_and_read", |b| {
        b.iter(|| {
            source.advance(black_box(dt));
            black_box(clock.now())
        })
    });
}

fn bench_simulated_schedule(c: &mut Criterion) {
    let schedule = scenarios::random_walk(42, 50, 4.0);

    c.bench_function("simulated_random_walk", |b| {
        b.iter(|| {
            let mut sim = ClockSimulator::new(MonotonicTime::EPOCH, Duration::from_millis(10));
            black_box(sim.run(&schedule).max_deviation_ns)
        })
    });
}

criterion_group!(
    benches,
    bench_system_source_now,
    bench_rate_clock_now,
    bench_rate_clock_set_rate,
    bench_shared_clock_now,
    bench_manual_clock_advance_and_read,
    bench_simulated_schedule,
);
criterion_main!(benches);
