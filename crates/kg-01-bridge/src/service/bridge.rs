//! Script Bridge - one remote call over the script transport.
//!
//! ```text
//! invoke(target)
//!   ├─ register handler  kgcb_<seq>_<ms>
//!   ├─ spawn loader      GET target&callback=..&t=..  → evaluate script
//!   ├─ spawn timer       sleep(timeout)
//!   └─ await first of    payload | loader error | timer
//! ```
//!
//! Every exit path (including the caller dropping the future) runs the
//! invocation guard, which aborts both tasks and releases the handler.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::{
    CallFailure, CallResult, CallTarget, CorrelationId, HandlerRegistry, TransportConfig,
};
use crate::ports::{CallTransport, ScriptLoader, SystemTimeSource, TimeSource};

/// Performs calls by loading response scripts.
pub struct ScriptBridge {
    registry: Arc<HandlerRegistry>,
    loader: Arc<dyn ScriptLoader>,
    timeout: Duration,
    callback_param: String,
    time: Arc<dyn TimeSource>,
}

impl ScriptBridge {
    /// Bridge with its own registry.
    pub fn new(loader: Arc<dyn ScriptLoader>, config: &TransportConfig) -> Self {
        Self {
            registry: Arc::new(HandlerRegistry::new()),
            loader,
            timeout: config.timeout,
            callback_param: config.callback_param.clone(),
            time: Arc::new(SystemTimeSource),
        }
    }

    /// Share an existing registry.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<HandlerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the clock used for load timestamps.
    #[must_use]
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Releases the handler and stops the helper tasks when the invocation ends.
struct InvocationGuard<'a> {
    registry: &'a HandlerRegistry,
    id: CorrelationId,
    tasks: [JoinHandle<()>; 2],
}

impl Drop for InvocationGuard<'_> {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        self.registry.release(&self.id);
    }
}

#[async_trait]
impl CallTransport for ScriptBridge {
    async fn invoke(&self, target: &CallTarget) -> CallResult {
        let (call, rx) = self.registry.register(target.operation());
        let id = call.id();
        let src = target.script_src(&self.callback_param, &id.callback_name(), self.time.now_ms());

        let loader_task = {
            let loader = Arc::clone(&self.loader);
            let registry = Arc::clone(&self.registry);
            let call = Arc::clone(&call);
            tokio::spawn(async move {
                if let Err(failure) = loader.load(&src, &registry).await {
                    // Ignored if a payload already arrived
                    registry.settle(&call, Err(failure));
                }
            })
        };

        let timer_task = {
            let registry = Arc::clone(&self.registry);
            let call = Arc::clone(&call);
            let timeout = self.timeout;
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                registry.settle(&call, Err(CallFailure::Timeout(timeout)));
            })
        };

        let _guard = InvocationGuard {
            registry: &self.registry,
            id,
            tasks: [loader_task, timer_task],
        };

        debug!(
            correlation_id = %id,
            operation = %target.operation(),
            timeout_ms = self.timeout.as_millis() as u64,
            "Script call started"
        );

        let result = rx.await.unwrap_or_else(|_| {
            Err(CallFailure::transport("response handler dropped before settling"))
        });

        match &result {
            Ok(_) => debug!(
                correlation_id = %id,
                elapsed_ms = call.created_at().elapsed().as_millis() as u64,
                "Script call completed"
            ),
            Err(failure) => warn!(
                correlation_id = %id,
                operation = %target.operation(),
                error = %failure,
                "Script call failed"
            ),
        }

        result
    }
}
