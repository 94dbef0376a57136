//! Request dispatch and route handlers.
//!
//! Every request lands in [`dispatch`], which resolves it against the
//! [`RouteTable`](crate::routing::RouteTable) and runs the selected handler.
//! Handler failures are converted at this boundary and never escape.

use std::convert::Infallible;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::PassthroughMode;
use crate::http::request::{QueryMap, RequestContext};
use crate::http::response::{method_not_allowed, ApiError, ApiErrorKind};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{HandlerKind, Resolution};
use crate::token::TokenError;
use crate::translate::{translate_document, translate_photo, translate_search};

/// Page size requested from the upstream search endpoint.
pub const SEARCH_PAGE_SIZE: u32 = 10;

type HandlerResult = Result<Response, ApiError>;

/// Entry point for every request.
pub async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let ctx = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(|| RequestContext::from_request(&request));

    tracing::info!(
        correlation_id = %ctx.correlation_id,
        method = %ctx.method,
        path = %ctx.path,
        "Dispatching request"
    );

    let (label, response) = match state.routes.resolve(&ctx.method, &ctx.path) {
        Resolution::Handler { handler, endpoint } => {
            let result = run_handler(&state, &ctx, handler, endpoint, request).await;
            (handler.label(), result.unwrap_or_else(IntoResponse::into_response))
        }
        Resolution::Spa => ("spa", serve_spa(&state, request).await),
        Resolution::MethodNotAllowed => {
            tracing::debug!(correlation_id = %ctx.correlation_id, method = %ctx.method, "Method not allowed");
            ("method_not_allowed", method_not_allowed())
        }
    };

    metrics::record_request(label, response.status().as_u16(), start);
    response
}

async fn run_handler(
    state: &AppState,
    ctx: &RequestContext,
    handler: HandlerKind,
    endpoint: Option<String>,
    request: Request<Body>,
) -> HandlerResult {
    let endpoint = endpoint.unwrap_or_default();

    match handler {
        HandlerKind::Static => Ok(serve_static(state, request).await),
        HandlerKind::UnsplashPassthrough => unsplash_passthrough(state, ctx, &endpoint).await,
        HandlerKind::RandomPhoto => single_photo(state, ctx, "photos/random").await,
        HandlerKind::PhotoById => single_photo(state, ctx, &format!("photos/{}", endpoint)).await,
        HandlerKind::SearchPhotos => search_photos(state, ctx).await,
        HandlerKind::TokenIssue => issue_token(state, ctx),
        HandlerKind::TokenVerify => verify_token(state, ctx, request).await,
        HandlerKind::ApiNotFound => Err(ApiError::new(ctx, ApiErrorKind::RouteNotFound)),
    }
}

async fn fetch(state: &AppState, ctx: &RequestContext, endpoint: &str, query: &QueryMap) -> Result<Value, ApiError> {
    tracing::debug!(correlation_id = %ctx.correlation_id, endpoint = %endpoint, "Upstream passthrough");
    state
        .upstream
        .fetch_photo_endpoint(endpoint, query)
        .await
        .map_err(|e| ApiError::new(ctx, e))
}

fn malformed(ctx: &RequestContext, doc: &Value, error: crate::translate::TranslateError) -> ApiError {
    tracing::error!(
        correlation_id = %ctx.correlation_id,
        payload = %doc,
        "Malformed upstream payload"
    );
    ApiError::new(ctx, error)
}

/// `/api/unsplash/*`: any upstream endpoint, translated or raw per config.
async fn unsplash_passthrough(state: &AppState, ctx: &RequestContext, endpoint: &str) -> HandlerResult {
    let doc = fetch(state, ctx, endpoint, &ctx.query).await?;

    match state.mode {
        PassthroughMode::Raw => Ok(Json(doc).into_response()),
        PassthroughMode::Translated => translate_document(&doc)
            .map(|translated| Json(translated).into_response())
            .map_err(|e| malformed(ctx, &doc, e)),
    }
}

async fn single_photo(state: &AppState, ctx: &RequestContext, endpoint: &str) -> HandlerResult {
    let doc = fetch(state, ctx, endpoint, &QueryMap::default()).await?;
    translate_photo(&doc)
        .map(|photo| Json(photo).into_response())
        .map_err(|e| malformed(ctx, &doc, e))
}

/// `/api/search?q=<term>`: first page, fixed page size.
async fn search_photos(state: &AppState, ctx: &RequestContext) -> HandlerResult {
    let term = ctx
        .query
        .get("q")
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::new(ctx, ApiErrorKind::BadRequest("missing query parameter q".into())))?;

    let mut query = QueryMap::default();
    query.insert("query", term);
    query.insert("page", "1");
    query.insert("per_page", SEARCH_PAGE_SIZE.to_string());

    let doc = fetch(state, ctx, "search/photos", &query).await?;
    translate_search(&doc)
        .map(|result| Json(result).into_response())
        .map_err(|e| malformed(ctx, &doc, e))
}

fn issue_token(state: &AppState, ctx: &RequestContext) -> HandlerResult {
    let claims = state.issue_claims.as_ref().clone();
    let token = state
        .tokens
        .issue(claims.clone())
        .map_err(|e| ApiError::new(ctx, e))?;

    tracing::debug!(correlation_id = %ctx.correlation_id, "Token issued");
    Ok(Json(json!({ "token": token, "claims": claims })).into_response())
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: Option<String>,
}

/// `/jwt/test` and `/login`: verify a token taken from the JSON body, the
/// `token` query parameter, or a bearer header, in that order.
async fn verify_token(state: &AppState, ctx: &RequestContext, request: Request<Body>) -> HandlerResult {
    let (parts, body) = request.into_parts();

    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    let from_body = match axum::body::to_bytes(body, state.max_body_size).await {
        Ok(bytes) if !bytes.is_empty() => serde_json::from_slice::<TokenBody>(&bytes)
            .ok()
            .and_then(|b| b.token),
        _ => None,
    };

    let token = from_body
        .or_else(|| ctx.query.get("token").map(str::to_string))
        .or(bearer)
        .ok_or_else(|| ApiError::new(ctx, TokenError::Missing))?;

    let claims = state.tokens.verify(&token).map_err(|e| ApiError::new(ctx, e))?;
    Ok(Json(json!({ "token": claims })).into_response())
}

/// Delegate to the file-serving collaborator rooted at the asset directory.
async fn serve_static(state: &AppState, request: Request<Body>) -> Response {
    let result: Result<_, Infallible> = ServeDir::new(&state.assets.root).oneshot(request).await;
    match result {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Serve the SPA document for any unmatched GET.
async fn serve_spa(state: &AppState, request: Request<Body>) -> Response {
    let result: Result<_, Infallible> = ServeFile::new(&state.assets.index).oneshot(request).await;
    match result {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}
