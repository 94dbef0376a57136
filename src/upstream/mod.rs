//! Upstream photo API subsystem.
//!
//! # Data Flow
//! ```text
//! endpoint segment + QueryMap
//!     → client.rs (URL build, credential header, single bounded attempt)
//!     → JSON document | UpstreamError
//!     → translate/ (simplified schema) or raw passthrough
//! ```
//!
//! # Design Decisions
//! - One attempt per request: no retry, no cache
//! - Every call is bounded by a timeout
//! - A top-level `errors` field is an upstream failure, whatever the status

pub mod client;
pub mod types;

pub use client::UpstreamClient;
pub use types::{UpstreamError, UpstreamResult};
