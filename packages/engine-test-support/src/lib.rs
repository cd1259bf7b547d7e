//! Engine test support utilities
//!
//! This crate provides utilities specifically for engine testing: unified
//! logging initialization and deterministic seed helpers.

pub mod logging;
pub mod seeds;
