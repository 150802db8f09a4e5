//! Outbound ports for the API bridge.

use async_trait::async_trait;
use url::Url;

use crate::domain::{CallFailure, HandlerRegistry};

/// Time source trait for testability
pub trait TimeSource: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System time implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            // Clock before Unix epoch - return 0 rather than panic
            .unwrap_or(0)
    }
}

/// Loads executable response content and evaluates it.
///
/// This is the seam where "insert a script element" lives: the loader fetches
/// `src`, and evaluating the body means invoking the named handler in
/// `registry` with the embedded payload. Returning `Err` models the element's
/// error event; a script that loads but names no live handler is *not* an
/// error.
#[async_trait]
pub trait ScriptLoader: Send + Sync {
    async fn load(&self, src: &Url, registry: &HandlerRegistry) -> Result<(), CallFailure>;
}

/// Plain JSON GET used as a fallback when the script transport fails.
#[async_trait]
pub trait DirectFetcher: Send + Sync {
    async fn fetch_json(&self, target: &Url) -> Result<serde_json::Value, CallFailure>;
}
