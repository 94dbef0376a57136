//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled route rules
//! - Resolve (method, path) to a handler, the SPA fallback, or 405
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Rules sorted once: exact literals, then captures, then wildcards by
//!   longest literal prefix; declaration order breaks ties
//! - O(n) scan (acceptable for the handful of rules served)

use axum::http::Method;

use crate::routing::matcher::{MethodFilter, PathPattern};

/// Handler a rule dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// File under the asset root.
    Static,
    /// `/api/unsplash/*` passthrough.
    UnsplashPassthrough,
    /// One random photo, simplified.
    RandomPhoto,
    /// One photo by id, simplified.
    PhotoById,
    /// First page of search results, simplified.
    SearchPhotos,
    /// Issue a signed token.
    TokenIssue,
    /// Verify a signed token.
    TokenVerify,
    /// Unmatched path in the API namespace.
    ApiNotFound,
}

impl HandlerKind {
    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::UnsplashPassthrough => "unsplash",
            Self::RandomPhoto => "random",
            Self::PhotoById => "photo",
            Self::SearchPhotos => "search",
            Self::TokenIssue => "jwt_get",
            Self::TokenVerify => "jwt_test",
            Self::ApiNotFound => "api_not_found",
        }
    }
}

/// A single entry of the rule table.
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub methods: MethodFilter,
    pub pattern: PathPattern,
    pub handler: HandlerKind,
}

impl RouteRule {
    pub fn new(methods: MethodFilter, pattern: &str, handler: HandlerKind) -> Self {
        Self {
            methods,
            pattern: PathPattern::parse(pattern),
            handler,
        }
    }
}

/// Outcome of resolving a request against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A rule matched; `endpoint` holds the wildcard remainder or captured segment.
    Handler {
        handler: HandlerKind,
        endpoint: Option<String>,
    },
    /// No rule matched a GET: serve the SPA document.
    Spa,
    /// No rule matched a non-GET method.
    MethodNotAllowed,
}

/// Ordered, immutable route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Compile a rule list into precedence order.
    pub fn new(mut rules: Vec<RouteRule>) -> Self {
        // sort_by_key is stable, so declaration order survives among equals
        rules.sort_by_key(|r| (r.pattern.rank(), std::cmp::Reverse(r.pattern.literal_len())));
        Self { rules }
    }

    /// The gateway's HTTP surface.
    pub fn standard() -> Self {
        Self::new(vec![
            RouteRule::new(MethodFilter::get(), "/static/*", HandlerKind::Static),
            RouteRule::new(MethodFilter::get(), "/api/unsplash/*", HandlerKind::UnsplashPassthrough),
            RouteRule::new(MethodFilter::get(), "/api/random", HandlerKind::RandomPhoto),
            RouteRule::new(MethodFilter::get(), "/api/search", HandlerKind::SearchPhotos),
            RouteRule::new(MethodFilter::get(), "/api/photos/{id}", HandlerKind::PhotoById),
            RouteRule::new(MethodFilter::get(), "/jwt/get", HandlerKind::TokenIssue),
            RouteRule::new(MethodFilter::get_or_post(), "/jwt/test", HandlerKind::TokenVerify),
            RouteRule::new(MethodFilter::get_or_post(), "/login", HandlerKind::TokenVerify),
            RouteRule::new(MethodFilter::get(), "/api*", HandlerKind::ApiNotFound),
        ])
    }

    /// Compiled rules in match order.
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Resolve a request to its handler.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        for rule in &self.rules {
            if !rule.methods.allows(method) {
                continue;
            }
            if let Some(endpoint) = rule.pattern.matches(path) {
                return Resolution::Handler {
                    handler: rule.handler,
                    endpoint,
                };
            }
        }

        if MethodFilter::get().allows(method) {
            Resolution::Spa
        } else {
            Resolution::MethodNotAllowed
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}
