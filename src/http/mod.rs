//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (correlation id, RequestContext)
//!     → handlers.rs (dispatch through the routing table)
//!         → upstream/ + translate/ | token/ | static files | SPA document
//!     → response.rs (error mapping, 404/405 bodies)
//!     → Send to client
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{QueryMap, RequestContext, X_REQUEST_ID};
pub use response::{ApiError, ApiErrorKind};
pub use server::{AppState, HttpServer};
