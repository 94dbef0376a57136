//! Upstream photo and search documents to the simplified schema.

use serde_json::Value;

use crate::translate::types::{
    PhotoUser, SearchResult, SimplifiedPhoto, TranslateError, Translated, DEFAULT_ALT, DEFAULT_BIO,
    DEFAULT_DESC,
};

/// Translate a single upstream photo document.
///
/// `id` and `urls.regular` are required. Description, alt text and bio fall
/// back to fixed defaults when absent or empty; location passes through as-is.
pub fn translate_photo(doc: &Value) -> Result<SimplifiedPhoto, TranslateError> {
    let id = non_empty(doc.get("id")).ok_or(TranslateError::MissingField("id"))?;
    let url = non_empty(doc.pointer("/urls/regular")).ok_or(TranslateError::MissingField("urls.regular"))?;

    let user = doc.get("user");
    let user = PhotoUser {
        name: user
            .and_then(|u| u.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        location: user
            .and_then(|u| u.get("location"))
            .and_then(Value::as_str)
            .map(str::to_string),
        bio: text_or(user.and_then(|u| u.get("bio")), DEFAULT_BIO),
    };

    Ok(SimplifiedPhoto {
        id: id.to_string(),
        desc: text_or(doc.get("description"), DEFAULT_DESC),
        alt: text_or(doc.get("alt_description"), DEFAULT_ALT),
        url: url.to_string(),
        likes: doc.get("likes").and_then(Value::as_i64).unwrap_or(0),
        user,
    })
}

/// Translate an upstream search document, preserving result order.
pub fn translate_search(doc: &Value) -> Result<SearchResult, TranslateError> {
    let total = doc
        .get("total")
        .and_then(Value::as_u64)
        .ok_or(TranslateError::MissingField("total"))?;
    let total_pages = doc
        .get("total_pages")
        .and_then(Value::as_u64)
        .ok_or(TranslateError::MissingField("total_pages"))?;
    let results = doc
        .get("results")
        .and_then(Value::as_array)
        .ok_or(TranslateError::MissingField("results"))?;

    Ok(SearchResult {
        total,
        total_pages,
        results: translate_all(results)?,
    })
}

/// Translate any document an endpoint may return.
///
/// Objects with a `results` array are search pages, arrays are photo lists,
/// everything else is a single photo.
pub fn translate_document(doc: &Value) -> Result<Translated, TranslateError> {
    match doc {
        Value::Array(items) => translate_all(items).map(Translated::Photos),
        _ if doc.get("results").is_some_and(Value::is_array) => {
            translate_search(doc).map(Translated::Search)
        }
        _ => translate_photo(doc).map(Translated::Photo),
    }
}

fn translate_all(items: &[Value]) -> Result<Vec<SimplifiedPhoto>, TranslateError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            translate_photo(item).map_err(|e| TranslateError::Result {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// Returns the string value when present and non-empty.
fn non_empty(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn text_or(value: Option<&Value>, default: &str) -> String {
    non_empty(value).unwrap_or(default).to_string()
}
