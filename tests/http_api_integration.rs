//! Integration tests for the HTTP surface.
//!
//! The full router is driven with `tower::ServiceExt::oneshot`; storage is
//! real in-memory SQLite, the PDF extractor and AI provider are mocked.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use peakpath::adapters::ai::MockProvider;
use peakpath::adapters::http::{api_router, AppState};
use peakpath::adapters::rate_limiter::InMemoryRateLimiter;
use peakpath::adapters::sqlite::{
    connect, init_schema, SqliteAssessmentRepository, SqliteChatRepository,
};
use peakpath::application::handlers::{
    AnalyzeProfileHandler, ParseAssessmentHandler, SendCoachingMessageHandler,
    StreamCoachingMessageHandler,
};
use peakpath::config::{AppConfig, DatabaseConfig};
use peakpath::domain::extraction::ExtractionError;
use peakpath::domain::strengths::StrengthProfile;
use peakpath::ports::{
    AIProvider, FallbackExtractor, PdfError, PdfExtractor, RateLimiter,
};

const REPORT_TEXT: &str = "CliftonStrengths Top 5 for Jane Doe\n\
    1. Learner\n2. Input\n3. Intellection\n4. Empathy\n5. Achiever\n";

struct StubPdf;

#[async_trait]
impl PdfExtractor for StubPdf {
    async fn extract_text(&self, _bytes: &[u8]) -> Result<String, PdfError> {
        Ok(REPORT_TEXT.to_string())
    }
}

struct NoFallback;

#[async_trait]
impl FallbackExtractor for NoFallback {
    async fn extract(&self, _text: &str) -> Result<StrengthProfile, ExtractionError> {
        Err(ExtractionError::AiFallbackUnavailable(
            "disabled in tests".to_string(),
        ))
    }
}

async fn test_router(provider: Arc<MockProvider>) -> Router {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        create_if_missing: true,
    };
    let pool = connect(&config).await.unwrap();
    init_schema(&pool).await.unwrap();

    let assessments = Arc::new(SqliteAssessmentRepository::new(pool.clone()));
    let chats = Arc::new(SqliteChatRepository::new(pool));
    let limiter: Arc<dyn RateLimiter> = Arc::new(InMemoryRateLimiter::with_defaults());
    let provider: Arc<dyn AIProvider> = provider;

    let state = AppState {
        parse_assessment: Arc::new(ParseAssessmentHandler::new(
            Arc::new(StubPdf),
            Arc::new(NoFallback),
            assessments.clone(),
        )),
        send_message: Arc::new(SendCoachingMessageHandler::new(
            provider.clone(),
            assessments.clone(),
            chats.clone(),
            limiter.clone(),
            1024,
            0.7,
        )),
        stream_message: Arc::new(StreamCoachingMessageHandler::new(
            provider.clone(),
            assessments.clone(),
            chats.clone(),
            limiter.clone(),
            1024,
            0.7,
        )),
        analyze_profile: Arc::new(AnalyzeProfileHandler::new(
            provider.clone(),
            assessments,
            limiter,
            1024,
        )),
        chats,
        provider_info: provider.provider_info(),
    };

    api_router(state, &AppConfig::default())
}

fn pdf_upload_request(filename: &str, content_type: &str) -> Request<Body> {
    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"pdf\"; filename=\"{filename}\"\r\n\
         Content-Type: {content_type}\r\n\r\n\
         %PDF-1.7 stub bytes\r\n\
         --{boundary}--\r\n"
    );
    Request::post("/api/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok_with_storage_stats() {
    let router = test_router(Arc::new(MockProvider::with_response("unused"))).await;

    let response = router
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "mock");
    assert_eq!(body["storage"]["assessments"], 0);
}

#[tokio::test]
async fn upload_parses_a_report() {
    let router = test_router(Arc::new(MockProvider::with_response("unused"))).await;

    let response = router
        .oneshot(pdf_upload_request("report.pdf", "application/pdf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["profile"]["name"], "Jane Doe");
    assert_eq!(body["profile"]["format"], "top5");
    assert_eq!(body["userId"], "user_jane_doe");
}

#[tokio::test]
async fn upload_rejects_non_pdf_files() {
    let router = test_router(Arc::new(MockProvider::with_response("unused"))).await;

    let response = router
        .oneshot(pdf_upload_request("notes.txt", "text/plain"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], "INVALID_FORMAT");
}

#[tokio::test]
async fn coach_answers_without_an_assessment() {
    let router = test_router(Arc::new(MockProvider::with_response(
        "Happy to help even without a profile on file.",
    )))
    .await;

    let response = router
        .oneshot(
            Request::post("/api/coach")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message": "What are strengths domains?"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["response"]
        .as_str()
        .unwrap()
        .contains("Happy to help"));
    assert!(body["sessionId"].is_string());
}

#[tokio::test]
async fn coach_rejects_empty_messages() {
    let router = test_router(Arc::new(MockProvider::with_response("unused"))).await;

    let response = router
        .oneshot(
            Request::post("/api/coach")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message": "   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn analyze_unknown_assessment_is_404() {
    let router = test_router(Arc::new(MockProvider::with_response("unused"))).await;

    let response = router
        .oneshot(
            Request::post("/api/analyze")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"assessmentId": "00000000-0000-0000-0000-000000000000"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["code"], "ASSESSMENT_NOT_FOUND");
}

#[tokio::test]
async fn stream_endpoint_returns_event_stream() {
    let router = test_router(Arc::new(MockProvider::with_response(
        "Short streamed answer",
    )))
    .await;

    let response = router
        .oneshot(
            Request::post("/api/coach/stream")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message": "stream please"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/event-stream"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains(r#""type":"chunk""#));
    assert!(text.contains(r#""type":"complete""#));
}
