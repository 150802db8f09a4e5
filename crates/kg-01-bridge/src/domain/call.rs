//! Call Builder - turns an operation and its parameters into a request URL.
//!
//! Target shape: `<base>/<operation>?secret=<token>&_=<nonce>&<name>=<value>...`
//! Values are form-urlencoded; absent or empty values are left out entirely.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use url::Url;

use crate::domain::config::{parse_base_url, ConfigError};
use crate::ports::{SystemTimeSource, TimeSource};

/// Query parameter carrying the shared secret.
pub const SECRET_PARAM: &str = "secret";
/// Query parameter carrying the cache-busting nonce.
pub const NONCE_PARAM: &str = "_";
/// Query parameter carrying the script load timestamp.
pub const LOAD_TIME_PARAM: &str = "t";

/// Operations understood by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// List every key
    GetKeys,
    /// Ban a key (`key`)
    Ban,
    /// Delete a key (`key`)
    DeleteKey,
    /// Create a key (`key`, `expire_days`, `notes`)
    AddKey,
    /// Change a key (`key`, `expire_days`, `notes`)
    UpdateKey,
    /// Connectivity probe
    Test,
}

impl Operation {
    /// Path segment for this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::GetKeys => "getkeys",
            Operation::Ban => "ban",
            Operation::DeleteKey => "deletekey",
            Operation::AddKey => "addkey",
            Operation::UpdateKey => "updatekey",
            Operation::Test => "test",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl ParamValue {
    /// Wire form, or `None` when the value should be omitted.
    pub fn render(&self) -> Option<String> {
        match self {
            ParamValue::Text(s) if s.is_empty() => None,
            ParamValue::Text(s) => Some(s.clone()),
            ParamValue::Int(i) => Some(i.to_string()),
            ParamValue::Float(f) if f.is_finite() => Some(f.to_string()),
            ParamValue::Float(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

/// Ordered parameter list. Insertion order is preserved on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallParams(Vec<(String, Option<ParamValue>)>);

impl CallParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.0.push((name.into(), Some(value.into())));
        self
    }

    /// Add a parameter that may be unset.
    #[must_use]
    pub fn with_opt<V: Into<ParamValue>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.0.push((name.into(), value.map(Into::into)));
        self
    }

    /// Parameters that will actually be sent, rendered.
    pub fn present(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.0
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.as_ref()?.render()?)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Immutable description of one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    pub operation: Operation,
    pub params: CallParams,
    pub token: String,
    pub nonce: u64,
}

/// Fully qualified request URL for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTarget {
    url: Url,
    operation: Operation,
}

impl CallTarget {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Decoded value of the first query parameter called `name`.
    pub fn query_value(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }

    /// Script source for this target: the call URL plus the callback name and
    /// a load timestamp.
    pub fn script_src(&self, callback_param: &str, callback: &str, load_ms: u64) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair(callback_param, callback)
            .append_pair(LOAD_TIME_PARAM, &load_ms.to_string());
        url
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Builds call targets against one deployment.
pub struct CallBuilder {
    base: Url,
    token: String,
    last_nonce: AtomicU64,
    time: Arc<dyn TimeSource>,
}

impl CallBuilder {
    /// Create a builder; a malformed base URL is a startup error.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            base: parse_base_url(base_url)?,
            token: token.into(),
            last_nonce: AtomicU64::new(0),
            time: Arc::new(SystemTimeSource),
        })
    }

    /// Replace the clock used for nonces.
    #[must_use]
    pub fn with_time_source(mut self, time: Arc<dyn TimeSource>) -> Self {
        self.time = time;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Capture an attempt, allocating a fresh nonce.
    pub fn request(&self, operation: Operation, params: &CallParams) -> CallRequest {
        CallRequest {
            operation,
            params: params.clone(),
            token: self.token.clone(),
            nonce: self.next_nonce(),
        }
    }

    /// Render a request into its target URL.
    pub fn target(&self, request: &CallRequest) -> CallTarget {
        let mut url = self.base.clone();
        let path = format!(
            "{}/{}",
            self.base.path().trim_end_matches('/'),
            request.operation.as_str()
        );
        url.set_path(&path);

        // application/x-www-form-urlencoded: a space goes out as `+` and a
        // literal `+` as `%2B`. Apps Script decodes both forms.
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair(SECRET_PARAM, &request.token)
                .append_pair(NONCE_PARAM, &request.nonce.to_string());
            for (name, value) in request.params.present() {
                query.append_pair(name, &value);
            }
        }

        CallTarget {
            url,
            operation: request.operation,
        }
    }

    /// `request` followed by `target`.
    pub fn build(&self, operation: Operation, params: &CallParams) -> CallTarget {
        self.target(&self.request(operation, params))
    }

    /// Wall-clock milliseconds, bumped past the previous nonce when the clock
    /// has not moved (or went backwards).
    fn next_nonce(&self) -> u64 {
        let now = self.time.now_ms();
        let bump = |last: u64| now.max(last.saturating_add(1));
        let previous = self
            .last_nonce
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| Some(bump(last)))
            .unwrap_or_else(|last| last);
        bump(previous)
    }
}

impl fmt::Debug for CallBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallBuilder")
            .field("base", &self.base.as_str())
            .field("last_nonce", &self.last_nonce.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
