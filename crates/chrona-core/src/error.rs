//! Error types for Chrona

use thiserror::Error;

use crate::LogicalDuration;

/// Core Chrona errors
///
/// The plain clock operations never fail; these cover the checked variants.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChronaError {
    #[error("Rate must be finite, got {0}")]
    NonFiniteRate(f64),

    #[error("Logical time left the representable range")]
    LogicalOverflow,

    #[error("Logical time is {0:?} before the epoch")]
    BeforeEpoch(LogicalDuration),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Chrona operations
pub type ChronaResult<T> = Result<T, ChronaError>;
