use axum::routing::post;
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::send_message))
        .route("/stream", post(handlers::stream_message))
}

pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/", post(handlers::analyze_profile))
}
