//! Response translation subsystem.
//!
//! # Data Flow
//! ```text
//! upstream JSON document
//!     → photo.rs (field extraction + per-field defaults)
//!     → SimplifiedPhoto | SearchResult | TranslateError
//! ```
//!
//! # Design Decisions
//! - Pure functions: no I/O, same input always yields same output
//! - Output types are closed structs; upstream field names never leak
//! - A missing required field fails the whole document (no partial output)

pub mod photo;
pub mod types;

pub use photo::{translate_document, translate_photo, translate_search};
pub use types::{PhotoUser, SearchResult, SimplifiedPhoto, TranslateError, Translated};
