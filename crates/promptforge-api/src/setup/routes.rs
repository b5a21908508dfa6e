//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use promptforge_core::constants::{MAX_FILE_COUNT, MAX_FILE_SIZE_BYTES};
use promptforge_core::Config;

use crate::handlers;
use crate::state::AppState;

/// Headroom for the text field and multipart framing on top of the file
/// payload budget.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let body_limit = MAX_FILE_COUNT * MAX_FILE_SIZE_BYTES + BODY_OVERHEAD_BYTES;

    let router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/v0/submissions",
            get(handlers::submissions::list_submissions).post(handlers::submissions::submit),
        )
        .route(
            "/api/v0/submissions/stats",
            get(handlers::submissions::submission_stats),
        )
        .route(
            "/api/v0/submissions/{id}",
            get(handlers::submissions::get_submission)
                .delete(handlers::submissions::delete_submission),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(router)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    if config.cors_origins.iter().any(|origin| origin == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("Invalid CORS origin {}: {}", origin, e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any))
}
