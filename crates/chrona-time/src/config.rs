//! Rate clock configuration

use chrona_core::{ChronaError, ChronaResult, LogicalTime};

/// Where logical time starts when a clock is built.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Origin {
    /// Aligned with the monotonic source's time since its epoch
    #[default]
    Source,
    /// An explicit logical time
    At(LogicalTime),
}

/// Rate clock configuration
#[derive(Clone, Debug, PartialEq)]
pub struct RateClockConfig {
    /// Initial rate (1.0 = real-time, 0.0 = paused, negative = reverse)
    pub rate: f64,
    /// Initial logical time
    pub origin: Origin,
}

impl Default for RateClockConfig {
    fn default() -> Self {
        RateClockConfig {
            rate: 1.0,
            origin: Origin::Source,
        }
    }
}

impl RateClockConfig {
    /// Start stopped
    pub fn paused() -> Self {
        RateClockConfig {
            rate: 0.0,
            ..Self::default()
        }
    }

    /// Start running backward at real-time speed
    pub fn reversed() -> Self {
        RateClockConfig {
            rate: -1.0,
            ..Self::default()
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Reject rates the clock arithmetic cannot carry.
    pub fn validate(&self) -> ChronaResult<()> {
        if !self.rate.is_finite() {
            return Err(ChronaError::NonFiniteRate(self.rate));
        }
        Ok(())
    }
}
