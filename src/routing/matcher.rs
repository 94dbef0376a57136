//! Route matching logic.
//!
//! # Responsibilities
//! - Parse route patterns (literal, named capture, trailing wildcard)
//! - Match a request path against a pattern and extract the endpoint parameter
//! - Match the request method against a rule's allowed methods
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A wildcard is only allowed as the last character of a pattern
//! - No regex to guarantee O(n) matching

use axum::http::Method;

/// Compiled path pattern of a route rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches exactly this path.
    Exact(String),
    /// `"/users/{id}"`: the literal prefix followed by exactly one non-empty segment.
    Capture { prefix: String, name: String },
    /// `"/static/*"` or `"/api*"`: any path sharing the literal prefix.
    Prefix(String),
}

impl PathPattern {
    /// Parse a pattern string.
    ///
    /// A trailing `*` makes a prefix pattern; a trailing `{name}` segment makes
    /// a capture pattern; everything else is an exact literal.
    pub fn parse(pattern: &str) -> Self {
        if let Some(prefix) = pattern.strip_suffix('*') {
            return Self::Prefix(prefix.to_string());
        }

        if let Some((prefix, last)) = pattern.rsplit_once('/') {
            if let Some(name) = last.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                return Self::Capture {
                    prefix: format!("{}/", prefix),
                    name: name.to_string(),
                };
            }
        }

        Self::Exact(pattern.to_string())
    }

    /// Match a path, returning the extracted parameter on success.
    ///
    /// Exact patterns yield `Some(None)`; prefix patterns yield the remainder
    /// after the prefix; capture patterns yield the captured segment.
    pub fn matches(&self, path: &str) -> Option<Option<String>> {
        match self {
            Self::Exact(literal) => (path == literal).then_some(None),
            Self::Prefix(prefix) => path
                .strip_prefix(prefix.as_str())
                .map(|rest| Some(rest.to_string())),
            Self::Capture { prefix, .. } => {
                let segment = path.strip_prefix(prefix.as_str())?;
                if segment.is_empty() || segment.contains('/') {
                    return None;
                }
                Some(Some(segment.to_string()))
            }
        }
    }

    /// Precedence class: exact literals, then captures, then wildcards.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Exact(_) => 0,
            Self::Capture { .. } => 1,
            Self::Prefix(_) => 2,
        }
    }

    /// Length of the literal part of the pattern.
    pub fn literal_len(&self) -> usize {
        match self {
            Self::Exact(literal) => literal.len(),
            Self::Capture { prefix, .. } | Self::Prefix(prefix) => prefix.len(),
        }
    }
}

/// Methods accepted by a rule. GET also admits HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    Any,
    Only(Vec<Method>),
}

impl MethodFilter {
    pub fn get() -> Self {
        Self::Only(vec![Method::GET])
    }

    pub fn get_or_post() -> Self {
        Self::Only(vec![Method::GET, Method::POST])
    }

    /// Returns true if the method is accepted by this filter.
    pub fn allows(&self, method: &Method) -> bool {
        match self {
            Self::Any => true,
            Self::Only(methods) => methods
                .iter()
                .any(|m| m == method || (*m == Method::GET && *method == Method::HEAD)),
        }
    }
}
