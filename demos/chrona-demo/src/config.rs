//! Demo configuration

use std::time::Duration;

use chrona_core::{ChronaError, ChronaResult};

/// Environment variable overriding the sampling interval, e.g. `250ms`
pub const INTERVAL_ENV: &str = "CHRONA_DEMO_INTERVAL";

/// Demo configuration
#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    /// Rates to run, one phase each
    pub rates: Vec<f64>,
    /// Readings printed per phase
    pub samples_per_phase: u32,
    /// Real time between readings
    pub interval: Duration,
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            rates: vec![-1.0, 2.5, 0.0],
            samples_per_phase: 5,
            interval: Duration::from_secs(1),
        }
    }
}

impl DemoConfig {
    /// Same phases, short enough for a smoke run
    pub fn quick() -> Self {
        DemoConfig {
            samples_per_phase: 3,
            interval: Duration::from_millis(100),
            ..Self::default()
        }
    }

    /// Apply the `CHRONA_DEMO_INTERVAL` override, if set
    pub fn with_env_overrides(self) -> ChronaResult<Self> {
        match std::env::var(INTERVAL_ENV) {
            Ok(raw) => self.with_interval_str(&raw),
            Err(std::env::VarError::NotPresent) => Ok(self),
            Err(e) => Err(ChronaError::InvalidConfig(format!("{}: {}", INTERVAL_ENV, e))),
        }
    }

    /// Parse a human-readable interval such as `1s` or `250ms`
    pub fn with_interval_str(mut self, raw: &str) -> ChronaResult<Self> {
        self.interval = humantime::parse_duration(raw.trim())
            .map_err(|e| ChronaError::InvalidConfig(format!("{}: {}", INTERVAL_ENV, e)))?;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ChronaResult<()> {
        if let Some(rate) = self.rates.iter().copied().find(|r| !r.is_finite()) {
            return Err(ChronaError::NonFiniteRate(rate));
        }
        if self.interval.is_zero() {
            return Err(ChronaError::InvalidConfig("interval must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_classic_demo() {
        let config = DemoConfig::default();

        assert_eq!(config.rates, vec![-1.0, 2.5, 0.0]);
        assert_eq!(config.samples_per_phase, 5);
        assert_eq!(config.interval, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_interval_parsing() {
        let config = DemoConfig::default().with_interval_str("250ms").unwrap();
        assert_eq!(config.interval, Duration::from_millis(250));

        assert!(matches!(
            DemoConfig::default().with_interval_str("soon"),
            Err(ChronaError::InvalidConfig(_))
        ));
        assert!(DemoConfig::default().with_interval_str("0s").is_err());
    }

    #[test]
    fn test_validate_rejects_non_finite_rates() {
        let config = DemoConfig {
            rates: vec![1.0, f64::NAN],
            ..DemoConfig::quick()
        };

        assert!(matches!(config.validate(), Err(ChronaError::NonFiniteRate(_))));
    }
}
