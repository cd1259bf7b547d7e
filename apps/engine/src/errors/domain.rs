//! Domain-level error type used across the phase machine, resolver, and services.
//!
//! This error type is transport- and storage-agnostic. Service entry points
//! return `Result<T, crate::error::EngineError>` and convert from
//! `DomainError` using the provided `From<DomainError> for EngineError`
//! implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::state::{Phase, SeatId};
use crate::errors::error_code::ErrorCode;

/// Domain-level not found entities (minimal set; extend as needed)
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Seat,
    Proposal,
    Other(String),
}

/// Central domain error type, mirroring the engine's error taxonomy:
/// illegal transitions, malformed/missing submissions, provider failures,
/// and the economic invariant check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Event invalid for the current phase; state is left unchanged
    IllegalTransition { phase: Phase, event: String },
    /// Inbound action submitted while its sub-phase is not open
    PhaseMismatch { phase: Phase, action: String },
    /// Eliminated seat attempted an active-seat action
    SeatEliminated { seat: SeatId, action: String },
    /// Allocation or ballot did not sum to 100 within tolerance
    MalformedSubmission { seat: SeatId, detail: String },
    /// Seat silent past the decision timeout
    MissingSubmission { seat: SeatId, decision: &'static str },
    /// Decision provider call failed or returned unparsable output
    ProviderFailure { seat: SeatId, detail: String },
    /// Post-settlement profit sum violated the zero-sum invariant
    EconomicInvariantViolation { net: i64, tolerance: i64 },
    /// Input/user validation or business rule violation
    Validation(String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::IllegalTransition { phase, event } => {
                write!(f, "illegal transition: event {event} in phase {phase:?}")
            }
            DomainError::PhaseMismatch { phase, action } => {
                write!(f, "phase mismatch: {action} is not open in phase {phase:?}")
            }
            DomainError::SeatEliminated { seat, action } => {
                write!(f, "seat {seat} is eliminated and cannot {action}")
            }
            DomainError::MalformedSubmission { seat, detail } => {
                write!(f, "malformed submission from seat {seat}: {detail}")
            }
            DomainError::MissingSubmission { seat, decision } => {
                write!(f, "missing {decision} submission from seat {seat}")
            }
            DomainError::ProviderFailure { seat, detail } => {
                write!(f, "decision provider failure for seat {seat}: {detail}")
            }
            DomainError::EconomicInvariantViolation { net, tolerance } => {
                write!(
                    f,
                    "economic invariant violated: net profit {net} exceeds tolerance {tolerance}"
                )
            }
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn illegal_transition(phase: Phase, event: impl Into<String>) -> Self {
        Self::IllegalTransition {
            phase,
            event: event.into(),
        }
    }
    pub fn phase_mismatch(phase: Phase, action: impl Into<String>) -> Self {
        Self::PhaseMismatch {
            phase,
            action: action.into(),
        }
    }
    pub fn seat_eliminated(seat: SeatId, action: impl Into<String>) -> Self {
        Self::SeatEliminated {
            seat,
            action: action.into(),
        }
    }
    pub fn malformed(seat: SeatId, detail: impl Into<String>) -> Self {
        Self::MalformedSubmission {
            seat,
            detail: detail.into(),
        }
    }
    pub fn missing(seat: SeatId, decision: &'static str) -> Self {
        Self::MissingSubmission { seat, decision }
    }
    pub fn provider_failure(seat: SeatId, detail: impl Into<String>) -> Self {
        Self::ProviderFailure {
            seat,
            detail: detail.into(),
        }
    }
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    /// Stable error code for protocol events.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::IllegalTransition { .. } => ErrorCode::IllegalTransition,
            DomainError::PhaseMismatch { .. } => ErrorCode::PhaseMismatch,
            DomainError::SeatEliminated { .. } => ErrorCode::SeatEliminated,
            DomainError::MalformedSubmission { .. } => ErrorCode::MalformedSubmission,
            DomainError::MissingSubmission { .. } => ErrorCode::MissingSubmission,
            DomainError::ProviderFailure { .. } => ErrorCode::ProviderFailure,
            DomainError::EconomicInvariantViolation { .. } => ErrorCode::EconomicInvariant,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::NotFound(NotFoundKind::Seat, _) => ErrorCode::InvalidSeat,
            DomainError::NotFound(_, _) => ErrorCode::ValidationError,
        }
    }
}
