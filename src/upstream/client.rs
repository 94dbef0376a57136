//! Photo API client with timeout and error handling.
//!
//! # Responsibilities
//! - Build upstream URLs from a fixed base, an endpoint segment and a query map
//! - Attach the `Client-ID` credential header
//! - Bound every call with a timeout
//! - Classify failures (transport, timeout, upstream error payload)

use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tokio::time::timeout;
use url::form_urlencoded;

use crate::config::UpstreamConfig;
use crate::http::request::QueryMap;
use crate::upstream::types::{UpstreamError, UpstreamResult};

/// HTTP client for the third-party photo API.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_duration: Duration,
}

impl UpstreamClient {
    /// Create a new client from configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let timeout_duration = Duration::from_millis(config.timeout_ms);
        let http = reqwest::Client::builder()
            .timeout(timeout_duration)
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            timeout_duration,
        })
    }

    /// Build the upstream URL for an endpoint.
    ///
    /// The endpoint is appended verbatim. Query pairs are form-urlencoded and
    /// joined with `&` in the map's order; an empty map adds no `?`.
    pub fn build_url(&self, endpoint: &str, query: &QueryMap) -> String {
        let mut url = format!("{}{}", self.base_url, endpoint);
        if !query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter())
                .finish();
            url.push('?');
            url.push_str(&encoded);
        }
        url
    }

    /// Fetch an endpoint and return its JSON document.
    ///
    /// Performs a single attempt. A document carrying a top-level `errors`
    /// field is returned as [`UpstreamError::Rejected`].
    pub async fn fetch_photo_endpoint(&self, endpoint: &str, query: &QueryMap) -> UpstreamResult<Value> {
        let url = self.build_url(endpoint, query);
        let timeout_ms = self.timeout_duration.as_millis() as u64;

        tracing::debug!(url = %url, "Upstream request");

        let body = match timeout(self.timeout_duration, self.send(&url)).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) if e.is_timeout() => return Err(UpstreamError::Timeout(timeout_ms)),
            Ok(Err(e)) => return Err(UpstreamError::Transport(e.to_string())),
            Err(_) => return Err(UpstreamError::Timeout(timeout_ms)),
        };

        let doc: Value = serde_json::from_slice(&body)
            .map_err(|e| UpstreamError::Transport(format!("upstream body is not JSON: {}", e)))?;

        match doc.get("errors") {
            Some(Value::Array(errors)) => Err(UpstreamError::Rejected(errors.clone())),
            Some(Value::Null) | None => Ok(doc),
            Some(other) => Err(UpstreamError::Rejected(vec![other.clone()])),
        }
    }

    async fn send(&self, url: &str) -> Result<Bytes, reqwest::Error> {
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Client-ID {}", self.api_key))
            .send()
            .await?;
        response.bytes().await
    }

    /// Base URL every endpoint is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_duration.as_millis())
            .finish()
    }
}
