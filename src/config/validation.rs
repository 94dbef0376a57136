//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the upstream base URL can take appended endpoint segments
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstream.base_url '{0}' is not an absolute URL")]
    BaseUrl(String),

    #[error("upstream.base_url '{0}' must end with '/'")]
    BaseUrlSlash(String),

    #[error("upstream.timeout_ms must be greater than zero")]
    UpstreamTimeout,

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("token.secret must not be empty")]
    EmptySecret,

    #[error("assets.index must not be empty")]
    EmptyIndex,
}

/// Validate a loaded configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let base_url = &config.upstream.base_url;
    match url::Url::parse(base_url) {
        Ok(_) if !base_url.ends_with('/') => {
            errors.push(ValidationError::BaseUrlSlash(base_url.clone()));
        }
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::BaseUrl(base_url.clone())),
    }

    if config.upstream.timeout_ms == 0 {
        errors.push(ValidationError::UpstreamTimeout);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }
    if config.token.secret.is_empty() {
        errors.push(ValidationError::EmptySecret);
    }
    if config.assets.index.is_empty() {
        errors.push(ValidationError::EmptyIndex);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
