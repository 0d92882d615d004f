//! Chrona Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by the Chrona crates:
//! - Time primitives (MonotonicTime, LogicalTime, LogicalDuration)
//! - Error type for the checked clock operations

pub mod error;
pub mod time;

pub use error::*;
pub use time::*;
