//! RNG seed derivation for deterministic fallback agents.

use crate::domain::state::SeatId;

/// Derive a per-seat seed from a base game seed.
///
/// Same game seed + seat = same fallback behavior; different seats get
/// different streams even with the same base seed.
pub fn derive_seat_seed(game_seed: u64, seat: SeatId) -> u64 {
    game_seed
        .wrapping_add((seat as u64).wrapping_mul(100))
        .wrapping_add(1)
}
