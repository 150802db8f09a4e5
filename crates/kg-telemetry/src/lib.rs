//! # Keygate Telemetry
//!
//! Structured logging for the Keygate crates and tools.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kg_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::for_tool("kg-admin");
//! init_telemetry(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `KG_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `KG_JSON_LOGS` | `false` | One JSON object per line |
//! | `KG_LOG_SOURCE` | `false` | Include file and line |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
///
/// Fails if a global subscriber was already installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    logging::init_logging(config)
}
