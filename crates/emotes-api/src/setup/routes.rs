//! Route configuration and setup.

use crate::constants::API_BASE;
use crate::handlers::{emotes, health, root, submit};
use crate::middleware::{
    error_detail_middleware, rate_limit_middleware, security_headers_middleware,
    SecurityHeadersConfig,
};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use emotes_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
///
/// `/` and `/health` are open; everything under `/api` goes through the admission
/// limiter. Every route except `GET /api/emotes` is bounded by the request timeout.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    let timeout = TimeoutLayer::new(config.request_timeout());

    // A stale listing waits for a full refresh pass, which grows with the registry,
    // so the listing is the one route without a request timeout.
    let api_routes = Router::new()
        .route("/submit-emote", post(submit::submit_emote))
        .route_layer(timeout.clone())
        .route("/emotes", get(emotes::list_emotes))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit(),
        request_timeout_secs = config.request_timeout().as_secs(),
        "HTTP concurrency and timeout layers enabled"
    );

    let app = Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health_check))
        .route_layer(timeout)
        .nest(API_BASE, api_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            error_detail_middleware,
        ))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}
