//! Shared configuration for domain property tests.

use proptest::prelude::ProptestConfig;

/// Proptest config honoring `PROPTEST_CASES`, with a low default so CI stays
/// fast.
pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(32);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}
