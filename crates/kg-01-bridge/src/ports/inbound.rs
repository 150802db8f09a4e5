//! Inbound port: one remote call, settled exactly once.

use async_trait::async_trait;

use crate::domain::{CallResult, CallTarget};

/// Performs a single remote call.
///
/// Implementations must settle exactly once per invocation and release every
/// resource they registered before returning.
#[async_trait]
pub trait CallTransport: Send + Sync {
    /// Invoke `target` and wait for its payload, a transport error, or a timeout.
    async fn invoke(&self, target: &CallTarget) -> CallResult;
}
