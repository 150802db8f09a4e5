//! Domain types for the API bridge.

pub mod call;
pub mod config;
pub mod connectivity;
pub mod correlation;
pub mod error;
pub mod pending;
pub mod reply;
pub mod script;

// Re-exports for convenience
pub use call::{CallBuilder, CallParams, CallRequest, CallTarget, Operation, ParamValue};
pub use config::{
    ApiConfig, ConfigError, DirectFetchMode, KeygateConfig, RetryConfig, TransportConfig,
};
pub use connectivity::{ConnectivitySnapshot, ConnectivityState};
pub use correlation::CorrelationId;
pub use error::{ApiError, ApiResult, CallFailure, CallResult};
pub use pending::{HandlerRegistry, PendingCall, RegistryStats};
pub use reply::Reply;
pub use script::ScriptResponse;
