//! Output schema of the gateway's photo API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DESC: &str = "no desc";
pub const DEFAULT_ALT: &str = "no alt available";
pub const DEFAULT_BIO: &str = "no bio available";

/// Photo author as exposed to the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoUser {
    pub name: String,
    pub location: Option<String>,
    pub bio: String,
}

/// Reduced photo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedPhoto {
    pub id: String,
    pub desc: String,
    pub alt: String,
    pub url: String,
    pub likes: i64,
    pub user: PhotoUser,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub total: u64,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
    pub results: Vec<SimplifiedPhoto>,
}

/// Any translated upstream document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Translated {
    Photo(SimplifiedPhoto),
    Photos(Vec<SimplifiedPhoto>),
    Search(SearchResult),
}

/// The upstream document lacks a field the output schema requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("malformed upstream response: missing or invalid '{0}'")]
    MissingField(&'static str),

    #[error("malformed upstream response: result {index}: {source}")]
    Result {
        index: usize,
        #[source]
        source: Box<TranslateError>,
    },
}
