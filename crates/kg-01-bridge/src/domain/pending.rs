//! Handler Registry - named one-shot mailboxes for in-flight calls.
//!
//! Flow:
//! 1. The bridge calls `register()` and gets a `PendingCall` plus a receiver
//! 2. The callback name (`CorrelationId`) is sent to the remote side
//! 3. Evaluating the response script calls `invoke(name, payload)`
//! 4. The loader error path and the timer call `settle()` directly
//! 5. Whoever settles first wins; the bridge then calls `release()`

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::domain::call::Operation;
use crate::domain::correlation::CorrelationId;
use crate::domain::error::{CallFailure, CallResult};
use crate::ports::{SystemTimeSource, TimeSource};

/// One in-flight invocation.
///
/// Settles exactly once: the sender is taken out of its slot by the first
/// `settle`, and every later call finds the slot empty.
pub struct PendingCall {
    id: CorrelationId,
    operation: Operation,
    created_at: Instant,
    slot: Mutex<Option<oneshot::Sender<CallResult>>>,
}

impl PendingCall {
    fn new(id: CorrelationId, operation: Operation) -> (Self, oneshot::Receiver<CallResult>) {
        let (tx, rx) = oneshot::channel();
        let call = Self {
            id,
            operation,
            created_at: Instant::now(),
            slot: Mutex::new(Some(tx)),
        };
        (call, rx)
    }

    pub fn id(&self) -> CorrelationId {
        self.id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn is_settled(&self) -> bool {
        self.slot.lock().is_none()
    }

    /// Deliver `result` if nothing was delivered before.
    ///
    /// Returns `false` for every signal after the first.
    pub fn settle(&self, result: CallResult) -> bool {
        let Some(sender) = self.slot.lock().take() else {
            return false;
        };
        if sender.send(result).is_err() {
            // Caller stopped waiting; the call is still settled.
            debug!(correlation_id = %self.id, "Pending call receiver dropped");
        }
        true
    }
}

/// Statistics for the handler registry
#[derive(Debug, Default)]
pub struct RegistryStats {
    /// Handlers registered
    pub total_registered: AtomicU64,
    /// Calls settled (first signal)
    pub total_settled: AtomicU64,
    /// Signals discarded (late, duplicate or unknown callback)
    pub total_discarded: AtomicU64,
    /// Handlers released
    pub total_released: AtomicU64,
}

/// Registry of live response handlers, keyed by correlation ID.
///
/// Owned by one bridge and shared through `Arc`; independent bridges never
/// see each other's handlers.
pub struct HandlerRegistry {
    handlers: DashMap<CorrelationId, Arc<PendingCall>>,
    next_seq: AtomicU64,
    time: Arc<dyn TimeSource>,
    stats: RegistryStats,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::with_time_source(Arc::new(SystemTimeSource))
    }

    pub fn with_time_source(time: Arc<dyn TimeSource>) -> Self {
        Self {
            handlers: DashMap::new(),
            next_seq: AtomicU64::new(1),
            time,
            stats: RegistryStats::default(),
        }
    }

    /// Register a handler under a fresh correlation ID.
    pub fn register(&self, operation: Operation) -> (Arc<PendingCall>, oneshot::Receiver<CallResult>) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let id = CorrelationId::new(seq, self.time.now_ms());
        let (call, rx) = PendingCall::new(id, operation);
        let call = Arc::new(call);

        self.handlers.insert(id, Arc::clone(&call));
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

        debug!(
            correlation_id = %id,
            operation = %operation,
            "Registered response handler"
        );

        (call, rx)
    }

    /// Invoke the handler registered under `callback` with `payload`.
    ///
    /// This is what evaluating a response script does. Unknown, released and
    /// already-settled handlers swallow the payload and return `false`.
    pub fn invoke(&self, callback: &str, payload: serde_json::Value) -> bool {
        let call = CorrelationId::parse(callback)
            .and_then(|id| self.handlers.get(&id).map(|entry| Arc::clone(entry.value())));

        match call {
            Some(call) => self.settle(&call, Ok(payload)),
            None => {
                self.stats.total_discarded.fetch_add(1, Ordering::Relaxed);
                warn!(
                    callback = callback,
                    "Payload for unknown or released callback discarded"
                );
                false
            }
        }
    }

    /// Settle `call` and record the outcome.
    pub fn settle(&self, call: &PendingCall, result: CallResult) -> bool {
        let outcome = match &result {
            Ok(_) => "payload",
            Err(CallFailure::Transport(_)) => "transport_error",
            Err(CallFailure::Timeout(_)) => "timeout",
        };

        if call.settle(result) {
            self.stats.total_settled.fetch_add(1, Ordering::Relaxed);
            debug!(
                correlation_id = %call.id(),
                operation = %call.operation(),
                outcome = outcome,
                elapsed_ms = call.created_at().elapsed().as_millis() as u64,
                "Pending call settled"
            );
            true
        } else {
            self.stats.total_discarded.fetch_add(1, Ordering::Relaxed);
            debug!(
                correlation_id = %call.id(),
                outcome = outcome,
                "Late signal ignored, call already settled"
            );
            false
        }
    }

    /// Remove a handler. Safe to call any number of times.
    pub fn release(&self, id: &CorrelationId) -> bool {
        if self.handlers.remove(id).is_some() {
            self.stats.total_released.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    pub fn is_registered(&self, id: &CorrelationId) -> bool {
        self.handlers.contains_key(id)
    }

    /// Number of handlers currently registered
    pub fn pending_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn stats(&self) -> &RegistryStats {
        &self.stats
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
