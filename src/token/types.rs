//! Token claims and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claims carried by a signed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issued-at, seconds since the Unix epoch.
    pub iat: u64,

    /// Expiry, seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,

    /// Caller-supplied claims.
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

/// Errors from issuing or verifying tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No token was supplied.
    #[error("missing token")]
    Missing,

    /// The token's `exp` is in the past.
    #[error("token expired")]
    Expired,

    /// Bad signature, wrong algorithm or malformed structure.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// True for failures caused by the presented token rather than the server.
    pub fn is_verification(&self) -> bool {
        !matches!(self, Self::Signing(_))
    }
}
