//! Error types for the API bridge.
//!
//! Two layers: `CallFailure` is what a single transport attempt reports, and
//! `ApiError` is what a caller of the retry coordinator sees.

use std::time::Duration;
use thiserror::Error;

/// Why a single attempt produced no payload.
///
/// The retry coordinator treats both kinds the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallFailure {
    /// The fetch mechanism failed before any payload arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// No payload arrived within the call's time budget.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl CallFailure {
    /// Convenience constructor for transport failures.
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport(reason.into())
    }
}

/// Outcome of one transport attempt.
pub type CallResult = Result<serde_json::Value, CallFailure>;

/// Errors surfaced by the retry coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Every attempt failed at the transport level. Carries the last failure.
    #[error("Connection failed - using offline mode ({0})")]
    Connectivity(CallFailure),

    /// The server answered with `success: false`.
    #[error("{message}")]
    Application { message: String },

    /// A caller-side precondition failed before any network call.
    #[error("{0}")]
    Validation(String),

    /// A payload arrived but does not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this error means the remote side was unreachable.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity(_))
    }

    /// Server-provided rejection.
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }
}

/// Result type for bridge operations
pub type ApiResult<T> = Result<T, ApiError>;
