//! Retry Coordinator - bounded retry with linear backoff over a transport.
//!
//! Attempt n+1 starts only after attempt n has settled, `base_delay * n`
//! later. A payload ends the loop whatever it says: rejections are final and
//! never retried. The connectivity flag sees one outcome per top-level call.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{
    ApiError, ApiResult, CallBuilder, CallParams, CallResult, CallTarget, ConnectivityState,
    Operation, Reply, RetryConfig,
};
use crate::ports::{CallTransport, DirectFetcher};

/// Wraps a transport with retry, fallback and connectivity bookkeeping.
pub struct RetryCoordinator {
    builder: Arc<CallBuilder>,
    transport: Arc<dyn CallTransport>,
    fallback: Option<Arc<dyn DirectFetcher>>,
    connectivity: Arc<ConnectivityState>,
    policy: RetryConfig,
}

impl RetryCoordinator {
    pub fn new(
        builder: Arc<CallBuilder>,
        transport: Arc<dyn CallTransport>,
        connectivity: Arc<ConnectivityState>,
        policy: RetryConfig,
    ) -> Self {
        Self {
            builder,
            transport,
            fallback: None,
            connectivity,
            policy,
        }
    }

    /// Try a plain JSON fetch whenever a script attempt fails.
    #[must_use]
    pub fn with_fallback(mut self, fetcher: Arc<dyn DirectFetcher>) -> Self {
        self.fallback = Some(fetcher);
        self
    }

    pub fn connectivity(&self) -> &Arc<ConnectivityState> {
        &self.connectivity
    }

    pub fn policy(&self) -> &RetryConfig {
        &self.policy
    }

    /// `invoke_with_retry` with the configured attempt limit.
    pub async fn invoke(&self, operation: Operation, params: CallParams) -> ApiResult<Reply> {
        self.invoke_with_retry(operation, params, self.policy.max_attempts)
            .await
    }

    /// Single attempt, no retry. Used for the startup probe.
    pub async fn probe(&self) -> ApiResult<Reply> {
        self.invoke_with_retry(Operation::Test, CallParams::new(), 1)
            .await
    }

    /// Run up to `max_attempts` attempts (at least one).
    ///
    /// Returns the decoded reply, the server's rejection, or the last
    /// transport failure wrapped in `ApiError::Connectivity`.
    pub async fn invoke_with_retry(
        &self,
        operation: Operation,
        params: CallParams,
        max_attempts: u32,
    ) -> ApiResult<Reply> {
        let outcome = self.run_attempts(operation, &params, max_attempts.max(1)).await;
        self.connectivity.record_outcome(&outcome);
        outcome
    }

    async fn run_attempts(
        &self,
        operation: Operation,
        params: &CallParams,
        max_attempts: u32,
    ) -> ApiResult<Reply> {
        let mut attempt: u32 = 1;
        loop {
            // Fresh nonce on every attempt
            let target = self.builder.build(operation, params);
            debug!(operation = %operation, attempt = attempt, "API call");

            let failure = match self.attempt_once(&target).await {
                Ok(payload) => return Reply::from_payload(payload),
                Err(failure) => failure,
            };

            if attempt >= max_attempts {
                warn!(
                    operation = %operation,
                    attempts = attempt,
                    error = %failure,
                    "API call failed, giving up"
                );
                return Err(ApiError::Connectivity(failure));
            }

            let delay = self.policy.base_delay * attempt;
            info!(
                operation = %operation,
                attempt = attempt,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "Retrying API call"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt_once(&self, target: &CallTarget) -> CallResult {
        let failure = match self.transport.invoke(target).await {
            Ok(payload) => return Ok(payload),
            Err(failure) => failure,
        };

        let Some(fetcher) = &self.fallback else {
            return Err(failure);
        };

        match fetcher.fetch_json(target.url()).await {
            Ok(payload) => {
                info!(operation = %target.operation(), "Direct fetch fallback succeeded");
                Ok(payload)
            }
            Err(fetch_error) => {
                debug!(
                    operation = %target.operation(),
                    error = %fetch_error,
                    "Direct fetch fallback failed"
                );
                Err(failure)
            }
        }
    }
}
