//! Photo gateway library.
//!
//! Serves a single-page frontend, proxies a narrow set of photo API calls
//! into a simplified JSON schema, and issues/verifies signed tokens.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod token;
pub mod translate;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
