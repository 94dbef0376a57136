//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered rule table lookup)
//!     → matcher.rs (evaluate method filter and path pattern)
//!     → Return: Handler { kind, endpoint } | Spa | MethodNotAllowed
//!
//! Route Compilation (at startup):
//!     RouteRule[]
//!     → Sort by precedence (exact, capture, longest wildcard prefix)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins; registration order never decides precedence

pub mod matcher;
pub mod router;

pub use matcher::{MethodFilter, PathPattern};
pub use router::{HandlerKind, Resolution, RouteRule, RouteTable};
