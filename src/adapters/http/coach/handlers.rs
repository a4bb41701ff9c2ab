//! Coaching request handling.

use std::convert::Infallible;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;

use crate::adapters::http::AppState;
use crate::application::handlers::CoachStreamEvent;

use super::dto::{AnalyzeRequest, CoachRequest};

/// One blocking coaching turn.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<CoachRequest>,
) -> Response {
    match state.send_message.handle(request.into_command()).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}

/// One streaming coaching turn over SSE.
///
/// Setup failures (validation, rate limits, unknown assessment) are plain
/// JSON errors; once the stream opens, failures arrive as `error` events.
pub async fn stream_message(
    State(state): State<AppState>,
    Json(request): Json<CoachRequest>,
) -> Response {
    let (session_id, events) = match state.stream_message.handle(request.into_command()).await {
        Ok(started) => started,
        Err(e) => return e.into_response(),
    };

    tracing::debug!(session_id = %session_id, "streaming coaching response");

    let sse_events = events.map(|event| Ok::<_, Infallible>(encode_event(&event)));
    Sse::new(sse_events)
        .keep_alive(KeepAlive::default())
        .into_response()
}

fn encode_event(event: &CoachStreamEvent) -> Event {
    match serde_json::to_string(event) {
        Ok(json) => Event::default().data(json),
        Err(e) => Event::default()
            .data(format!(r#"{{"type":"error","message":"encoding failed: {e}"}}"#)),
    }
}

/// Structured analysis of a stored profile.
pub async fn analyze_profile(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    match state.analyze_profile.handle(request.assessment_id).await {
        Ok(analysis) => Json(analysis).into_response(),
        Err(e) => e.into_response(),
    }
}
