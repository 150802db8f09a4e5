//! Centralized Testing Utilities
//!
//! Scripted stand-ins for the bridge's ports. Available to this crate's tests
//! and, with the `test-utils` feature, to downstream crates.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

use crate::domain::{CallFailure, CallResult, CallTarget, CorrelationId, HandlerRegistry, ScriptResponse};
use crate::ports::{CallTransport, DirectFetcher, ScriptLoader, TimeSource};

/// A time source that returns a fixed timestamp.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    now_ms: AtomicU64,
}

impl FixedTimeSource {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(now_ms),
        }
    }

    /// Move the clock.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::Relaxed);
    }
}

impl TimeSource for FixedTimeSource {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Relaxed)
    }
}

/// What a `ScriptedLoader` does for one load.
#[derive(Debug, Clone)]
pub enum LoaderBehavior {
    /// Serve a well-formed script carrying `payload`.
    Respond(Value),
    /// Serve `payload`, then report an error event anyway.
    RespondThenFail { payload: Value, error: String },
    /// Wait, then serve `payload`.
    RespondAfter { delay: Duration, payload: Value },
    /// Serve `{"success": true, "callback": <name>}`.
    EchoCallback,
    /// Serve this exact body.
    RawBody(String),
    /// Report an error event without serving anything.
    Fail(String),
    /// Never finish.
    Hang,
}

impl LoaderBehavior {
    pub fn respond(payload: Value) -> Self {
        Self::Respond(payload)
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail(reason.into())
    }
}

/// Script loader that plays back a list of behaviors.
///
/// Behaviors are consumed in order; the last one repeats forever.
pub struct ScriptedLoader {
    behaviors: Mutex<VecDeque<LoaderBehavior>>,
    calls: AtomicUsize,
    last_src: Mutex<Option<Url>>,
}

impl ScriptedLoader {
    pub fn new(behaviors: Vec<LoaderBehavior>) -> Self {
        Self {
            behaviors: Mutex::new(behaviors.into()),
            calls: AtomicUsize::new(0),
            last_src: Mutex::new(None),
        }
    }

    pub fn repeating(behavior: LoaderBehavior) -> Self {
        Self::new(vec![behavior])
    }

    /// Number of loads performed
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Source URL of the most recent load
    pub fn last_src(&self) -> Option<Url> {
        self.last_src.lock().clone()
    }

    fn next_behavior(&self) -> LoaderBehavior {
        let mut behaviors = self.behaviors.lock();
        if behaviors.len() > 1 {
            behaviors.pop_front().unwrap_or(LoaderBehavior::Hang)
        } else {
            behaviors.front().cloned().unwrap_or(LoaderBehavior::Hang)
        }
    }
}

/// Callback name embedded in a script source, whatever the parameter is called.
pub fn callback_in(src: &Url) -> Option<String> {
    src.query_pairs()
        .map(|(_, v)| v.into_owned())
        .find(|v| CorrelationId::parse(v).is_some())
}

#[async_trait]
impl ScriptLoader for ScriptedLoader {
    async fn load(&self, src: &Url, registry: &HandlerRegistry) -> Result<(), CallFailure> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self.last_src.lock() = Some(src.clone());
        let callback = callback_in(src).unwrap_or_default();

        match self.next_behavior() {
            LoaderBehavior::Respond(payload) => {
                ScriptResponse::evaluate(&ScriptResponse::render(&callback, &payload), registry)?;
                Ok(())
            }
            LoaderBehavior::RespondThenFail { payload, error } => {
                ScriptResponse::evaluate(&ScriptResponse::render(&callback, &payload), registry)?;
                Err(CallFailure::Transport(error))
            }
            LoaderBehavior::RespondAfter { delay, payload } => {
                tokio::time::sleep(delay).await;
                ScriptResponse::evaluate(&ScriptResponse::render(&callback, &payload), registry)?;
                Ok(())
            }
            LoaderBehavior::EchoCallback => {
                let payload = json!({"success": true, "callback": callback});
                ScriptResponse::evaluate(&ScriptResponse::render(&callback, &payload), registry)?;
                Ok(())
            }
            LoaderBehavior::RawBody(body) => {
                ScriptResponse::evaluate(&body, registry)?;
                Ok(())
            }
            LoaderBehavior::Fail(reason) => Err(CallFailure::Transport(reason)),
            LoaderBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

/// Transport that plays back canned results and records every target.
///
/// Results are consumed in order; the last one repeats forever.
pub struct StubTransport {
    results: Mutex<VecDeque<CallResult>>,
    targets: Mutex<Vec<CallTarget>>,
    started: Mutex<Vec<tokio::time::Instant>>,
}

impl StubTransport {
    pub fn new(results: Vec<CallResult>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            targets: Mutex::new(Vec::new()),
            started: Mutex::new(Vec::new()),
        }
    }

    pub fn repeating(result: CallResult) -> Self {
        Self::new(vec![result])
    }

    /// Number of invocations
    pub fn attempts(&self) -> usize {
        self.targets.lock().len()
    }

    /// Every target invoked, in order
    pub fn targets(&self) -> Vec<CallTarget> {
        self.targets.lock().clone()
    }

    /// Time between consecutive invocations
    pub fn gaps(&self) -> Vec<Duration> {
        self.started
            .lock()
            .windows(2)
            .map(|pair| pair[1].duration_since(pair[0]))
            .collect()
    }

    fn next_result(&self) -> CallResult {
        let mut results = self.results.lock();
        if results.len() > 1 {
            results
                .pop_front()
                .unwrap_or_else(|| Err(CallFailure::transport("no scripted result")))
        } else {
            results
                .front()
                .cloned()
                .unwrap_or_else(|| Err(CallFailure::transport("no scripted result")))
        }
    }
}

#[async_trait]
impl CallTransport for StubTransport {
    async fn invoke(&self, target: &CallTarget) -> CallResult {
        self.targets.lock().push(target.clone());
        self.started.lock().push(tokio::time::Instant::now());
        self.next_result()
    }
}

/// Direct fetcher with a fixed answer.
pub struct StubFetcher {
    result: Result<Value, CallFailure>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new(result: Result<Value, CallFailure>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DirectFetcher for StubFetcher {
    async fn fetch_json(&self, _target: &Url) -> Result<Value, CallFailure> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.result.clone()
    }
}
