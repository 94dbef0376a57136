//! Upstream error definitions.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while calling the photo API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network failure or a body that is not JSON.
    #[error("upstream transport error: {0}")]
    Transport(String),

    /// The call did not complete within the configured ceiling.
    #[error("upstream timeout after {0} ms")]
    Timeout(u64),

    /// The upstream answered with an `errors` payload.
    #[error("upstream rejected request: {}", Value::Array(.0.clone()))]
    Rejected(Vec<Value>),

    /// Client construction failed.
    #[error("upstream client error: {0}")]
    Client(String),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
