//! # Shared Bus - Panel Event Bus
//!
//! Carries operator-facing notifications from the services to whatever is
//! rendering the panel.
//!
//! ```text
//! ┌──────────────────┐                    ┌──────────────────┐
//! │ Key Admin /      │    publish()       │ Front end        │
//! │ Connectivity     │ ──────┐            │ (CLI renderer)   │
//! └──────────────────┘       │            └──────────────────┘
//!                            ▼                    ↑
//!                      ┌──────────────┐          │
//!                      │  Event Bus   │ ─────────┘
//!                      └──────────────┘  subscribe()
//! ```
//!
//! Publishing is fire-and-forget; a panel without a renderer behaves the same.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, PanelEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
