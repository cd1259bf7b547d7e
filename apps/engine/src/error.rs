use thiserror::Error;
use uuid::Uuid;

use crate::errors::{DomainError, ErrorCode};

/// Outer engine error returned by service entry points.
///
/// Domain rules surface as [`DomainError`]; everything else here is
/// service-level plumbing (unknown games, closed channels, bad config).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("game {0} not found")]
    GameNotFound(Uuid),
    #[error("game {0} has already ended")]
    GameEnded(Uuid),
    #[error("game task unavailable: {detail}")]
    ChannelClosed { detail: String },
    #[error("configuration error: {detail}")]
    Config { detail: String },
    #[error("internal error: {detail}")]
    Internal { detail: String },
}

impl EngineError {
    pub fn channel_closed(detail: impl Into<String>) -> Self {
        Self::ChannelClosed {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    /// Stable error code for protocol events.
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::Domain(e) => e.code(),
            EngineError::GameNotFound(_) => ErrorCode::GameNotFound,
            EngineError::GameEnded(_) => ErrorCode::GameEnded,
            EngineError::ChannelClosed { .. } => ErrorCode::InternalError,
            EngineError::Config { .. } => ErrorCode::ConfigError,
            EngineError::Internal { .. } => ErrorCode::InternalError,
        }
    }
}
