//! Signed token subsystem.
//!
//! # Data Flow
//! ```text
//! caller claims
//!     → service.rs issue (add iat / exp, sign with shared secret)
//!     → compact token string
//!
//! compact token string
//!     → service.rs verify (signature, algorithm, expiry)
//!     → TokenClaims | TokenError
//! ```
//!
//! # Security Constraints
//! - The secret never appears in logs or Debug output
//! - Only the configured algorithm is accepted on verification
//! - Stateless: no revocation list

pub mod service;
pub mod types;

pub use service::TokenService;
pub use types::{TokenClaims, TokenError};
