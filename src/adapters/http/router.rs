//! Assembles the full API router with the middleware stack.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;

use super::{coach, health, upload, AppState};

pub fn api_router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .nest("/api/upload", upload::routes())
        .nest("/api/coach", coach::routes())
        .nest("/api/analyze", coach::analyze_routes())
        .nest("/api/health", health::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(DefaultBodyLimit::max(config.upload.max_bytes))
        .with_state(state)
}

/// Locked-down CORS when origins are configured, permissive otherwise
/// (local development).
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
