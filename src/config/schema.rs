//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root configuration for the photo gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Third-party photo API settings.
    pub upstream: UpstreamConfig,

    /// Signed token settings.
    pub token: TokenConfig,

    /// Frontend build output (SPA document and static assets).
    pub assets: AssetConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Contract served on the `/api/unsplash/*` passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PassthroughMode {
    /// Reshape upstream documents into the simplified schema.
    #[default]
    Translated,
    /// Return upstream JSON as received.
    Raw,
}

/// Upstream photo API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL; endpoint segments are appended verbatim.
    pub base_url: String,

    /// Access key sent as `Authorization: Client-ID <key>`.
    pub api_key: String,

    /// Ceiling for a single upstream call in milliseconds.
    pub timeout_ms: u64,

    /// Contract for the `/api/unsplash/*` route.
    pub mode: PassthroughMode,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.unsplash.com/".to_string(),
            api_key: String::new(),
            timeout_ms: 500,
            mode: PassthroughMode::Translated,
        }
    }
}

/// Signing algorithm for issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub enum SigningAlgorithm {
    #[default]
    HS256,
    HS512,
}

/// Token issuing/verification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Shared HMAC secret.
    pub secret: String,

    /// Declared signing algorithm.
    pub algorithm: SigningAlgorithm,

    /// Lifetime of issued tokens; `None` issues tokens without `exp`.
    pub ttl_secs: Option<u64>,

    /// Claims signed by the `/jwt/get` route.
    pub claims: Map<String, Value>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        let mut claims = Map::new();
        claims.insert("foo".to_string(), Value::String("bar".to_string()));
        Self {
            // WARNING: This is a placeholder! Change this in production.
            secret: "CHANGE_ME_IN_PRODUCTION".to_string(),
            algorithm: SigningAlgorithm::HS256,
            ttl_secs: None,
            claims,
        }
    }
}

/// Frontend asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding the frontend build (`static/` lives below it).
    pub root: String,

    /// SPA document, relative to `root`.
    pub index: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: "build".to_string(),
            index: "index.html".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
