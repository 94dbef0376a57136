//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the dispatch handler
//! - Wire up middleware (request tagging, tracing, timeout, body limit, panic catch)
//! - Build the immutable per-process state shared by all requests
//! - Serve until the shutdown signal fires

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::any,
    Router,
};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{GatewayConfig, PassthroughMode};
use crate::http::handlers::dispatch;
use crate::http::request::{tag_request, RequestContext};
use crate::routing::RouteTable;
use crate::token::TokenService;
use crate::upstream::{UpstreamClient, UpstreamResult};

/// Resolved locations of the frontend build.
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub root: PathBuf,
    pub index: PathBuf,
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub upstream: Arc<UpstreamClient>,
    pub tokens: Arc<TokenService>,
    pub issue_claims: Arc<Map<String, Value>>,
    pub assets: Arc<AssetPaths>,
    pub mode: PassthroughMode,
    pub max_body_size: usize,
}

impl AppState {
    /// Build the shared state from configuration.
    pub fn from_config(config: &GatewayConfig) -> UpstreamResult<Self> {
        let root = PathBuf::from(&config.assets.root);
        let index = root.join(&config.assets.index);

        Ok(Self {
            routes: Arc::new(RouteTable::standard()),
            upstream: Arc::new(UpstreamClient::new(&config.upstream)?),
            tokens: Arc::new(TokenService::new(&config.token)),
            issue_claims: Arc::new(config.token.claims.clone()),
            assets: Arc::new(AssetPaths { root, index }),
            mode: config.upstream.mode,
            max_body_size: config.limits.max_body_size,
        })
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> UpstreamResult<Self> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost-last: tagging first, so every span and log line
    /// below it sees the correlation id.
    #[allow(deprecated)]
    pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(CatchPanicLayer::new())
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let correlation_id = request
                    .extensions()
                    .get::<RequestContext>()
                    .map(|ctx| ctx.correlation_id.as_str())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    correlation_id = %correlation_id,
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }))
            .layer(middleware::from_fn(tag_request))
    }

    /// Run the server until a shutdown signal is received.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            assets = %self.config.assets.root,
            mode = ?self.config.upstream.mode,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// The assembled router, for driving requests without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}
