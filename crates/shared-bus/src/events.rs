//! # Panel Events
//!
//! Defines all event types that flow through the shared bus. The key
//! administration service and the connectivity tracker publish them; the
//! front end renders them.

use serde::{Deserialize, Serialize};
use shared_types::{AlertLevel, ConnectivityTransition};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PanelEvent {
    /// Operator-facing message.
    Alert {
        /// Severity.
        level: AlertLevel,
        /// Human-readable text.
        message: String,
    },

    /// The online/offline flag changed value.
    ConnectivityChanged(ConnectivityTransition),

    /// The local key collection was replaced or mutated.
    KeysChanged {
        /// Number of keys after the change.
        total: usize,
        /// Whether the collection holds built-in demo data.
        demo: bool,
    },
}

impl PanelEvent {
    /// Convenience constructor for alerts.
    pub fn alert(level: AlertLevel, message: impl Into<String>) -> Self {
        Self::Alert {
            level,
            message: message.into(),
        }
    }

    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::Alert { .. } => EventTopic::Alerts,
            Self::ConnectivityChanged(_) => EventTopic::Connectivity,
            Self::KeysChanged { .. } => EventTopic::Keys,
        }
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Operator alerts.
    Alerts,
    /// Online/offline transitions.
    Connectivity,
    /// Key collection changes.
    Keys,
    /// All events (wildcard).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &PanelEvent) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic())
    }
}
