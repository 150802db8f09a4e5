//! # Panel Value Types
//!
//! Small types describing what the panel shows the operator: alert severity
//! and online/offline transitions.

use serde::{Deserialize, Serialize};

/// Severity of an operator-facing alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Info => write!(f, "info"),
            AlertLevel::Success => write!(f, "success"),
            AlertLevel::Warning => write!(f, "warning"),
            AlertLevel::Error => write!(f, "error"),
        }
    }
}

/// Why the connectivity flag last changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectivityCause {
    /// Initial optimistic state.
    Startup,
    /// A remote call delivered a payload.
    CallSucceeded,
    /// A remote call failed after its final attempt.
    CallFailed(String),
    /// The host reported that the network came back.
    NetworkRestored,
    /// The host reported that the network went away.
    NetworkLost,
}

impl std::fmt::Display for ConnectivityCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectivityCause::Startup => write!(f, "startup"),
            ConnectivityCause::CallSucceeded => write!(f, "call succeeded"),
            ConnectivityCause::CallFailed(reason) => write!(f, "call failed: {}", reason),
            ConnectivityCause::NetworkRestored => write!(f, "network restored"),
            ConnectivityCause::NetworkLost => write!(f, "network lost"),
        }
    }
}

/// A change of the online/offline flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityTransition {
    /// New value of the flag.
    pub online: bool,
    /// What caused the change.
    pub cause: ConnectivityCause,
}

impl ConnectivityTransition {
    /// Label shown in the status indicator.
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.online {
            "ONLINE"
        } else {
            "OFFLINE"
        }
    }
}
