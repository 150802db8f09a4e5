//! Error types for key administration

use kg_01_bridge::ApiError;
use thiserror::Error;

/// Key administration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyAdminError {
    /// Input rejected before any remote call was made
    #[error("{0}")]
    Validation(String),

    /// The remote call failed or was rejected
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl KeyAdminError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the remote side was unreachable.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_connectivity())
    }
}

/// Result type for key administration
pub type KeyAdminResult<T> = Result<T, KeyAdminError>;
