//! Error codes for the splitpot engine.
//!
//! This module defines all error codes used throughout the engine.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in protocol error events.

use core::fmt;

/// Centralized error codes for the splitpot engine.
///
/// This enum ensures type safety and prevents the use of ad-hoc error codes.
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in outbound protocol events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Phase machine
    /// Event is not legal for the current phase
    IllegalTransition,
    /// Inbound action submitted for a phase that is not open
    PhaseMismatch,

    // Submissions
    /// Allocation or ballot does not sum to 100 within tolerance
    MalformedSubmission,
    /// Seat was silent past the decision timeout
    MissingSubmission,
    /// Decision provider failed or returned unparsable output
    ProviderFailure,

    // Settlement
    /// Post-settlement profit sum violated the zero-sum invariant
    EconomicInvariant,

    // Request validation
    /// Invalid or unknown seat id
    InvalidSeat,
    /// Seat is eliminated and may not perform this action
    SeatEliminated,
    /// General validation error
    ValidationError,

    // Resources
    /// Game not found
    GameNotFound,
    /// Game has already ended
    GameEnded,

    // Infrastructure
    /// Internal engine error
    InternalError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::IllegalTransition => "ILLEGAL_TRANSITION",
            ErrorCode::PhaseMismatch => "PHASE_MISMATCH",
            ErrorCode::MalformedSubmission => "MALFORMED_SUBMISSION",
            ErrorCode::MissingSubmission => "MISSING_SUBMISSION",
            ErrorCode::ProviderFailure => "PROVIDER_FAILURE",
            ErrorCode::EconomicInvariant => "ECONOMIC_INVARIANT",
            ErrorCode::InvalidSeat => "INVALID_SEAT",
            ErrorCode::SeatEliminated => "SEAT_ELIMINATED",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::GameNotFound => "GAME_NOT_FOUND",
            ErrorCode::GameEnded => "GAME_ENDED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
