//! Deterministic seed helpers for tests.
//!
//! Tests that need randomness derive it from a fixed seed so failures
//! reproduce; tests that need distinct values (many games in one process)
//! draw from a seeded stream instead of the OS.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fixed base seed shared by deterministic tests.
pub const TEST_SEED: u64 = 0x5eed_cafe;

/// A fresh deterministic generator for one test.
pub fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(TEST_SEED)
}

/// A deterministic generator offset by `case`, for tests that run the same
/// scenario under several seeds.
pub fn test_rng_for(case: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(TEST_SEED.wrapping_add(case.wrapping_mul(0x9e37_79b9)))
}

/// One seed value per call site, stable across runs.
pub fn seed_for(case: u64) -> u64 {
    test_rng_for(case).random()
}
