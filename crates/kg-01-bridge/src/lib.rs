//! # KG-01 Bridge - script-callback API transport
//!
//! The remote key sheet cannot be called directly from another origin. Every
//! request therefore names a callback, and the response is executable content
//! `callback(<json>)` that hands the payload to that named one-shot handler.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      RetryCoordinator                        │
//! │   attempts ≤ N, sleep base×n, rejections final               │
//! │        │                              │                      │
//! │        ▼                              ▼                      │
//! │  ┌────────────┐   CallTransport  ┌──────────────┐            │
//! │  │CallBuilder │ ───────────────► │ ScriptBridge │──► ScriptLoader (port)
//! │  └────────────┘                  │  registry    │            │
//! │                                  │  timer       │            │
//! │        ┌─────────────────────┐   └──────────────┘            │
//! │        │ ConnectivityState   │ ◄── one outcome per call      │
//! │        └─────────┬───────────┘                               │
//! └──────────────────┼───────────────────────────────────────────┘
//!                    ▼
//!               shared-bus (ConnectivityChanged)
//! ```
//!
//! ## Guarantees
//!
//! - A pending call settles exactly once; a late load error never downgrades
//!   a delivered payload.
//! - Handlers are released on every exit path, including cancellation.
//! - `success: false` is never retried.
//! - Connectivity transitions are published once per top-level call.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Scripted port implementations.
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

use std::sync::Arc;
use tracing::info;

pub use adapters::{HttpDirectFetcher, HttpScriptLoader};
pub use domain::{
    ApiConfig, ApiError, ApiResult, CallBuilder, CallFailure, CallParams, CallRequest,
    CallResult, CallTarget, ConfigError, ConnectivitySnapshot, ConnectivityState,
    CorrelationId, DirectFetchMode, HandlerRegistry, KeygateConfig, Operation, ParamValue,
    PendingCall, Reply, RetryConfig, ScriptResponse, TransportConfig,
};
pub use ports::{CallTransport, DirectFetcher, ScriptLoader, SystemTimeSource, TimeSource};
pub use service::{RetryCoordinator, ScriptBridge};

/// Wire the HTTP adapters into a ready coordinator.
///
/// Validates `config` first; every error here is a startup error.
pub fn connect(
    config: &KeygateConfig,
    connectivity: Arc<ConnectivityState>,
) -> Result<RetryCoordinator, ConfigError> {
    config.validate()?;

    let builder = Arc::new(CallBuilder::new(&config.api.base_url, config.api.secret.clone())?);
    let loader = Arc::new(HttpScriptLoader::new()?);
    let bridge = Arc::new(ScriptBridge::new(loader, &config.transport));

    let mut coordinator =
        RetryCoordinator::new(builder, bridge, connectivity, config.retry.clone());

    let fallback = config.direct_fetch_enabled();
    if fallback {
        coordinator =
            coordinator.with_fallback(Arc::new(HttpDirectFetcher::new(config.transport.timeout)?));
    }

    info!(
        base_url = %config.api.base_url,
        timeout_ms = config.transport.timeout.as_millis() as u64,
        max_attempts = config.retry.max_attempts,
        direct_fetch = fallback,
        "API bridge ready"
    );

    Ok(coordinator)
}
