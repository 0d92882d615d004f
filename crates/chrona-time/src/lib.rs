//! Chrona Time - variable-rate logical clock
//!
//! This crate implements the rate clock and its collaborators:
//! - Monotonic sources (system, manual)
//! - RateClock: logical time that can speed up, pause or run backward
//! - SharedRateClock: the same clock behind a lock

pub mod clock;
pub mod config;
pub mod shared;
pub mod source;

pub use clock::*;
pub use config::*;
pub use shared::*;
pub use source::*;
