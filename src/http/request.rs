//! Request tagging and per-request context.
//!
//! # Responsibilities
//! - Generate a unique correlation id (UUID v4) for every request
//! - Parse the query string into an ordered, last-value-wins map
//! - Attach a read-only [`RequestContext`] before dispatch
//! - Echo the correlation id back in the `x-request-id` response header
//!
//! # Design Decisions
//! - Tagging runs outermost so every log line can carry the id
//! - Tagging never fails; it always calls through

use axum::{
    body::Body,
    http::{HeaderValue, Method, Request},
    middleware::Next,
    response::Response,
};
use url::form_urlencoded;
use uuid::Uuid;

/// Header carrying the correlation id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Query parameters in first-seen key order; a repeated key keeps its
/// position and takes the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    pairs: Vec<(String, String)>,
}

impl QueryMap {
    /// Parse a raw (still percent-encoded) query string.
    pub fn parse(raw: &str) -> Self {
        let mut map = Self::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            map.insert(key, value);
        }
        map
    }

    /// Insert a pair, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, String)> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Per-request context, created at request entry and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: String,
    pub method: Method,
    pub path: String,
    pub query: QueryMap,
}

impl RequestContext {
    /// Build a context for a request, generating a fresh correlation id.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(QueryMap::parse).unwrap_or_default(),
        }
    }
}

/// Middleware that tags every request with a [`RequestContext`].
pub async fn tag_request(mut request: Request<Body>, next: Next) -> Response {
    let context = RequestContext::from_request(&request);
    let header = HeaderValue::from_str(&context.correlation_id).ok();

    if let Some(value) = header.clone() {
        request.headers_mut().insert(X_REQUEST_ID, value);
    }
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}
