//! Bridge configuration with validation.
//!
//! Loaded from an optional TOML file, then overridden from the environment:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `KG_API_URL` | `api.base_url` |
//! | `KG_SECRET` | `api.secret` |
//! | `KG_TIMEOUT_MS` | `transport.timeout` |
//! | `KG_MAX_RETRIES` | `retry.max_attempts` |

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upper bound on retry attempts. Anything higher is almost certainly a typo.
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeygateConfig {
    /// Remote API location and credentials
    pub api: ApiConfig,
    /// Script transport settings
    pub transport: TransportConfig,
    /// Retry policy
    pub retry: RetryConfig,
}

impl KeygateConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_base_url(&self.api.base_url)?;

        if self.api.secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        if self.transport.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "transport timeout cannot be 0".into(),
            ));
        }

        if !is_query_name(&self.transport.callback_param) {
            return Err(ConfigError::Invalid(format!(
                "callback parameter '{}' is not a plain query name",
                self.transport.callback_param
            )));
        }

        if self.retry.max_attempts == 0 || self.retry.max_attempts > MAX_ATTEMPTS_LIMIT {
            return Err(ConfigError::InvalidRetry(format!(
                "max_attempts must be between 1 and {}, got {}",
                MAX_ATTEMPTS_LIMIT, self.retry.max_attempts
            )));
        }

        Ok(())
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from an optional file, then apply environment overrides.
    ///
    /// Does not validate; callers decide whether demo mode needs a usable
    /// remote configuration.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply `KG_*` overrides from an arbitrary variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("KG_API_URL") {
            self.api.base_url = url;
        }
        if let Some(secret) = lookup("KG_SECRET") {
            self.api.secret = secret;
        }
        if let Some(raw) = lookup("KG_TIMEOUT_MS") {
            let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                var: "KG_TIMEOUT_MS".into(),
                value: raw.clone(),
            })?;
            self.transport.timeout = Duration::from_millis(ms);
        }
        if let Some(raw) = lookup("KG_MAX_RETRIES") {
            self.retry.max_attempts =
                raw.trim().parse().map_err(|_| ConfigError::InvalidOverride {
                    var: "KG_MAX_RETRIES".into(),
                    value: raw.clone(),
                })?;
        }
        Ok(())
    }

    /// Whether failed script attempts should be retried as a plain JSON GET.
    pub fn direct_fetch_enabled(&self) -> bool {
        match self.transport.direct_fetch {
            DirectFetchMode::Always => true,
            DirectFetchMode::Never => false,
            DirectFetchMode::Auto => self
                .api
                .base_url
                .trim()
                .to_ascii_lowercase()
                .starts_with("https://"),
        }
    }
}

/// Remote API configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Deployment URL; operations are appended as a path segment
    pub base_url: String,
    /// Shared secret sent with every request
    pub secret: String,
}

/// When to fall back to a plain JSON fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectFetchMode {
    /// Only for `https` base addresses
    #[default]
    Auto,
    Always,
    Never,
}

/// Script transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-attempt time budget
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
    /// Query parameter that names the response callback
    pub callback_param: String,
    /// Fallback policy
    pub direct_fetch: DirectFetchMode,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            callback_param: "callback".to_string(),
            direct_fetch: DirectFetchMode::Auto,
        }
    }
}

/// Retry policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Delay before retry n is `base_delay * n`
    #[serde(with = "duration_serde")]
    pub base_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Base URL missing or unusable
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
    /// No shared secret configured
    #[error("api secret is not configured")]
    MissingSecret,
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Invalid retry policy
    #[error("invalid retry policy: {0}")]
    InvalidRetry(String),
    /// Environment override could not be parsed
    #[error("invalid value '{value}' for {var}")]
    InvalidOverride { var: String, value: String },
    /// Config file could not be read
    #[error("cannot read {path}: {reason}")]
    Io { path: String, reason: String },
    /// Config file is not valid TOML for this schema
    #[error("cannot parse config: {0}")]
    Parse(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Parse and check a base URL.
///
/// Operations are appended as a path segment and the query is rebuilt per
/// call, so the base must be an absolute http(s) URL with no query or fragment.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConfigError::InvalidBaseUrl("base url is empty".into()));
    }

    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl(format!("{raw}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "{raw}: unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(ConfigError::InvalidBaseUrl(format!("{raw}: not a base url")));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidBaseUrl(format!(
            "{raw}: must not carry a query or fragment"
        )));
    }

    Ok(url)
}

fn is_query_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Serde helpers for human-readable durations ("15s", "1500ms", "2m").
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub(super) fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        // "ms" must be checked before the single-letter suffixes
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .map(|m| Duration::from_secs(m.saturating_mul(60)))
                .map_err(|_| "invalid minutes")
        } else {
            // Try parsing as plain seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}
