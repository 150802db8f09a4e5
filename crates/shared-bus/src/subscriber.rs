//! # Event Subscriber
//!
//! A subscription sees every event published after it was created, minus
//! those its filter rejects. A renderer that falls more than the channel
//! capacity behind loses the oldest events; the loss is counted, not fatal.

use crate::events::{EventFilter, PanelEvent};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::warn;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Every publisher is gone.
    #[error("Event bus closed")]
    Closed,
}

/// Receiving end of the panel event bus.
pub struct Subscription {
    receiver: broadcast::Receiver<PanelEvent>,
    filter: EventFilter,
    missed: u64,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<PanelEvent>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            missed: 0,
        }
    }

    /// Wait for the next matching event.
    ///
    /// Returns `None` once the bus has been dropped and the queue is empty.
    pub async fn recv(&mut self) -> Option<PanelEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(count)) => self.record_lag(count),
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event if one is already queued.
    pub fn try_recv(&mut self) -> Result<Option<PanelEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(broadcast::error::TryRecvError::Lagged(count)) => self.record_lag(count),
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
            }
        }
    }

    /// Every matching event that is already queued, oldest first.
    pub fn drain(&mut self) -> Vec<PanelEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Events lost because this subscription fell behind.
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.missed
    }

    fn record_lag(&mut self, count: u64) {
        self.missed += count;
        warn!(lost = count, total_lost = self.missed, "Panel subscriber fell behind");
    }
}
