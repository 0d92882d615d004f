//! Chrona Demo Application
//!
//! Runs one rate clock through three phases:
//! - Reverse (-1x real time)
//! - Fast-forward (2.5x real time)
//! - Paused (0x real time)
//!
//! and reports the logical duration from start to finish, which spans every
//! rate change. `--quick` shortens the run; `CHRONA_DEMO_INTERVAL` (e.g.
//! `250ms`) sets the time between readings.

mod config;

use std::thread;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use chrona_time::RateClock;

use config::DemoConfig;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let base = if std::env::args().any(|arg| arg == "--quick") {
        DemoConfig::quick()
    } else {
        DemoConfig::default()
    };
    let config = base.with_env_overrides()?;
    config.validate()?;
    tracing::info!(?config, "starting demo");

    let mut clock = RateClock::new();
    let start = clock.now();

    for &rate in &config.rates {
        println!("Time is {}x real time", rate);
        clock.try_set_rate(rate)?;

        for _ in 0..config.samples_per_phase {
            println!("{:.2} seconds", clock.now().as_secs_f64());
            thread::sleep(config.interval);
        }
    }

    let finish = clock.now();
    println!(
        "From start to finish: {:.2} seconds",
        (finish - start).as_secs_f64()
    );

    Ok(())
}
