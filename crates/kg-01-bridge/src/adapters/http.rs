//! reqwest-backed script loader and JSON fetcher.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::domain::{CallFailure, ConfigError, HandlerRegistry, ScriptResponse};
use crate::ports::{DirectFetcher, ScriptLoader};

/// Connect timeout for both adapters. The overall budget is enforced by the
/// bridge's own timer, not by the client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

fn build_client(timeout: Option<Duration>) -> Result<Client, ConfigError> {
    let mut builder = Client::builder().connect_timeout(CONNECT_TIMEOUT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ConfigError::Invalid(format!("cannot build http client: {e}")))
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_connect() {
        format!("cannot connect: {err}")
    } else if err.is_timeout() {
        format!("request timed out: {err}")
    } else {
        err.to_string()
    }
}

/// Fetches response scripts over HTTP and evaluates them.
pub struct HttpScriptLoader {
    client: Client,
}

impl HttpScriptLoader {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(None)?,
        })
    }

    /// Use a preconfigured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScriptLoader for HttpScriptLoader {
    async fn load(&self, src: &Url, registry: &HandlerRegistry) -> Result<(), CallFailure> {
        let response = self
            .client
            .get(src.clone())
            .send()
            .await
            .map_err(|e| CallFailure::Transport(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallFailure::Transport(format!("HTTP error! status: {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| CallFailure::Transport(describe(&e)))?;

        let delivered = ScriptResponse::evaluate(&body, registry)?;
        if !delivered {
            warn!(src = %src, "Response script evaluated but no live handler took it");
        }
        Ok(())
    }
}

/// Plain JSON GET fallback.
pub struct HttpDirectFetcher {
    client: Client,
}

impl HttpDirectFetcher {
    /// `timeout` bounds the whole request; the fallback has no timer of its own.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            client: build_client(Some(timeout))?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DirectFetcher for HttpDirectFetcher {
    async fn fetch_json(&self, target: &Url) -> Result<serde_json::Value, CallFailure> {
        let response = self
            .client
            .get(target.clone())
            .send()
            .await
            .map_err(|e| CallFailure::Transport(describe(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallFailure::Transport(format!("HTTP error! status: {status}")));
        }

        let payload = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| CallFailure::Transport(format!("body is not JSON: {e}")))?;

        debug!(target = %target, "Direct fetch succeeded");
        Ok(payload)
    }
}
