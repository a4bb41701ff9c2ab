//! Health endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::domain::foundation::Timestamp;
use crate::ports::StorageStats;

use super::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: Timestamp,
    pub provider: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageStats>,
}

/// Reports liveness plus a quick storage census. A storage failure
/// degrades the report instead of failing it.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let storage = match state.chats.stats().await {
        Ok(stats) => Some(stats),
        Err(e) => {
            tracing::warn!(error = %e, "storage stats unavailable");
            None
        }
    };

    Json(HealthResponse {
        status: if storage.is_some() { "ok" } else { "degraded" },
        timestamp: Timestamp::now(),
        provider: state.provider_info.name.clone(),
        model: state.provider_info.model.clone(),
        storage,
    })
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}
