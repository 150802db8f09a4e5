//! Connectivity State - the online/offline flag.
//!
//! Updated from two places: the outcome of each top-level call (once, after its
//! last attempt) and network events reported by the host. Every change of the
//! flag is published on the event bus; writes that leave it unchanged are
//! silent.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use shared_bus::{EventPublisher, PanelEvent};
use shared_types::{ConnectivityCause, ConnectivityTransition};

use crate::domain::error::ApiError;

/// Point-in-time view of the flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivitySnapshot {
    pub online: bool,
    /// Cause of the last transition (`Startup` until the first one)
    pub cause: ConnectivityCause,
    /// Number of transitions so far
    pub transitions: u64,
}

/// Online/offline flag with transition notifications.
///
/// Last writer wins. Subscribe to `EventTopic::Connectivity` on the bus to
/// observe transitions.
pub struct ConnectivityState {
    state: RwLock<(bool, ConnectivityCause)>,
    transitions: AtomicU64,
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl ConnectivityState {
    /// Optimistically online, no publisher.
    pub fn new() -> Self {
        Self {
            state: RwLock::new((true, ConnectivityCause::Startup)),
            transitions: AtomicU64::new(0),
            publisher: None,
        }
    }

    /// Optimistically online, publishing transitions to `publisher`.
    pub fn with_publisher(publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            publisher: Some(publisher),
            ..Self::new()
        }
    }

    pub fn is_online(&self) -> bool {
        self.state.read().0
    }

    pub fn snapshot(&self) -> ConnectivitySnapshot {
        let state = self.state.read();
        ConnectivitySnapshot {
            online: state.0,
            cause: state.1.clone(),
            transitions: self.transitions.load(Ordering::Relaxed),
        }
    }

    /// Fold the final outcome of a call into the flag.
    ///
    /// A payload of any kind (including a rejection or an undecodable one)
    /// proves the remote side is reachable. Only connectivity failures take
    /// the flag offline; validation errors never reached the network and are
    /// ignored. Returns whether the flag changed.
    pub fn record_outcome<T>(&self, outcome: &Result<T, ApiError>) -> bool {
        match outcome {
            Ok(_) | Err(ApiError::Application { .. }) | Err(ApiError::Decode(_)) => {
                self.apply(true, ConnectivityCause::CallSucceeded)
            }
            Err(ApiError::Connectivity(failure)) => {
                self.apply(false, ConnectivityCause::CallFailed(failure.to_string()))
            }
            Err(ApiError::Validation(_)) => false,
        }
    }

    /// Host-reported network availability.
    pub fn set_external(&self, online: bool) -> bool {
        let cause = if online {
            ConnectivityCause::NetworkRestored
        } else {
            ConnectivityCause::NetworkLost
        };
        self.apply(online, cause)
    }

    pub fn transitions(&self) -> u64 {
        self.transitions.load(Ordering::Relaxed)
    }

    fn apply(&self, online: bool, cause: ConnectivityCause) -> bool {
        {
            let mut state = self.state.write();
            if state.0 == online {
                debug!(online = online, cause = %cause, "Connectivity unchanged");
                return false;
            }
            *state = (online, cause.clone());
        }
        self.transitions.fetch_add(1, Ordering::Relaxed);

        let transition = ConnectivityTransition { online, cause };
        info!(
            status = transition.label(),
            cause = %transition.cause,
            "Connectivity changed"
        );

        if let Some(publisher) = &self.publisher {
            publisher.publish(PanelEvent::ConnectivityChanged(transition));
        }
        true
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::new()
    }
}
