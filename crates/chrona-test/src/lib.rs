//! Chrona Test Harness - simulation and validation for rate clocks
//!
//! This crate provides:
//! - Rate schedules and a reference model of expected logical time
//! - A tick-driven simulator on a manual monotonic source
//! - Predefined scenarios (reverse / fast-forward / pause, random walks)

pub mod simulator;

pub use simulator::*;
