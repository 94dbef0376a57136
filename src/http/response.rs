//! Error-to-response mapping.
//!
//! # Responsibilities
//! - Convert handler failures into status codes and JSON bodies
//! - Log each failure once, with the correlation id
//! - Keep internals out of client-visible bodies (tokens, transport detail)
//!
//! # Status Mapping
//! - Upstream unreachable → 502, upstream timeout → 504
//! - Upstream error payload → 500 with the upstream `errors` list
//! - Malformed upstream document → 500 with the translation error
//! - Bad, missing or expired token → 401
//! - Unknown API route → 404 `{status, message, url}`

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::http::request::RequestContext;
use crate::token::TokenError;
use crate::translate::TranslateError;
use crate::upstream::UpstreamError;

/// Message of the API namespace 404 body.
pub const ROUTE_NOT_IN_USE: &str = "This route is not in use";

/// Body of the 405 response.
pub const METHOD_NOT_SUPPORTED_HTML: &str = "<p>Method Not Supported</p>";

/// What went wrong while handling a request.
#[derive(Debug)]
pub enum ApiErrorKind {
    Upstream(UpstreamError),
    Malformed(TranslateError),
    Token(TokenError),
    BadRequest(String),
    RouteNotFound,
}

impl From<UpstreamError> for ApiErrorKind {
    fn from(e: UpstreamError) -> Self {
        Self::Upstream(e)
    }
}

impl From<TranslateError> for ApiErrorKind {
    fn from(e: TranslateError) -> Self {
        Self::Malformed(e)
    }
}

impl From<TokenError> for ApiErrorKind {
    fn from(e: TokenError) -> Self {
        Self::Token(e)
    }
}

/// A handler failure bound to the request it happened in.
#[derive(Debug)]
pub struct ApiError {
    pub correlation_id: String,
    pub url: String,
    pub kind: ApiErrorKind,
}

impl ApiError {
    pub fn new(ctx: &RequestContext, kind: impl Into<ApiErrorKind>) -> Self {
        Self {
            correlation_id: ctx.correlation_id.clone(),
            url: ctx.path.clone(),
            kind: kind.into(),
        }
    }

    /// Status code this error is surfaced as.
    pub fn status(&self) -> StatusCode {
        match &self.kind {
            ApiErrorKind::Upstream(UpstreamError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiErrorKind::Upstream(UpstreamError::Transport(_)) => StatusCode::BAD_GATEWAY,
            ApiErrorKind::Upstream(_) | ApiErrorKind::Malformed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiErrorKind::Token(e) if e.is_verification() => StatusCode::UNAUTHORIZED,
            ApiErrorKind::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorKind::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiErrorKind::RouteNotFound => StatusCode::NOT_FOUND,
        }
    }

    fn body(&self, status: StatusCode) -> Value {
        let code = status.as_u16();
        match &self.kind {
            ApiErrorKind::RouteNotFound => json!({
                "status": code,
                "message": ROUTE_NOT_IN_USE,
                "url": self.url,
            }),
            ApiErrorKind::BadRequest(message) => json!({
                "status": code,
                "message": message,
                "url": self.url,
            }),
            ApiErrorKind::Upstream(UpstreamError::Rejected(errors)) => json!({
                "status": code,
                "message": "upstream returned an error",
                "correlationId": self.correlation_id,
                "errors": errors,
            }),
            ApiErrorKind::Upstream(UpstreamError::Timeout(_)) => json!({
                "status": code,
                "message": "upstream timed out",
                "correlationId": self.correlation_id,
            }),
            ApiErrorKind::Upstream(_) => json!({
                "status": code,
                "message": "upstream unavailable",
                "correlationId": self.correlation_id,
            }),
            ApiErrorKind::Malformed(e) => json!({
                "status": code,
                "message": "malformed upstream response",
                "correlationId": self.correlation_id,
                "error": e.to_string(),
            }),
            ApiErrorKind::Token(e) if e.is_verification() => json!({
                "status": code,
                "message": "invalid token",
                "correlationId": self.correlation_id,
            }),
            ApiErrorKind::Token(_) => json!({
                "status": code,
                "message": "token signing failed",
                "correlationId": self.correlation_id,
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self.kind {
            ApiErrorKind::RouteNotFound => {
                tracing::info!(correlation_id = %self.correlation_id, url = %self.url, "API route not found");
            }
            ApiErrorKind::BadRequest(message) => {
                tracing::info!(correlation_id = %self.correlation_id, reason = %message, "Bad request");
            }
            ApiErrorKind::Token(e) => {
                tracing::warn!(correlation_id = %self.correlation_id, error = %e, "Token rejected");
            }
            ApiErrorKind::Upstream(e) => {
                tracing::error!(correlation_id = %self.correlation_id, error = %e, status = status.as_u16(), "Upstream call failed");
            }
            ApiErrorKind::Malformed(e) => {
                tracing::error!(correlation_id = %self.correlation_id, error = %e, "Translation failed");
            }
        }

        (status, Json(self.body(status))).into_response()
    }
}

/// Terminal response for methods no rule accepts.
pub fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET")],
        Html(METHOD_NOT_SUPPORTED_HTML),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    use crate::http::request::QueryMap;

    fn ctx(path: &str) -> RequestContext {
        RequestContext {
            correlation_id: "cid-1".into(),
            method: Method::GET,
            path: path.into(),
            query: QueryMap::default(),
        }
    }

    #[test]
    fn test_status_mapping() {
        let c = ctx("/api/random");
        assert_eq!(ApiError::new(&c, UpstreamError::Timeout(500)).status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(ApiError::new(&c, UpstreamError::Transport("refused".into())).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::new(&c, UpstreamError::Rejected(vec![])).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::new(&c, TranslateError::MissingField("id")).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::new(&c, TokenError::Expired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::new(&c, TokenError::Signing("x".into())).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::new(&c, ApiErrorKind::RouteNotFound).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_found_body() {
        let err = ApiError::new(&ctx("/api/nope"), ApiErrorKind::RouteNotFound);
        assert_eq!(
            err.body(StatusCode::NOT_FOUND),
            json!({ "status": 404, "message": ROUTE_NOT_IN_USE, "url": "/api/nope" })
        );
    }

    #[test]
    fn test_token_body_hides_internals() {
        let err = ApiError::new(&ctx("/jwt/test"), TokenError::Invalid("InvalidSignature".into()));
        let body = err.body(StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "invalid token");
        assert!(!body.to_string().contains("InvalidSignature"));
    }

    #[test]
    fn test_transport_body_carries_correlation_id() {
        let err = ApiError::new(&ctx("/api/random"), UpstreamError::Transport("connection refused".into()));
        let body = err.body(StatusCode::BAD_GATEWAY);
        assert_eq!(body["correlationId"], "cid-1");
        assert!(!body.to_string().contains("connection refused"));
    }

    #[test]
    fn test_method_not_allowed_response() {
        let response = method_not_allowed();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET");
    }
}
