//! Error body shape and status mapping for the API.
//!
//! Every failure leaves the API as `{ "code": ..., "message": ... }` with
//! the stable codes from the domain error taxonomy.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::handlers::{CoachingError, ParseAssessmentError};
use crate::domain::foundation::ErrorCode;
use crate::ports::AIError;

/// JSON error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl ToString, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

pub(crate) fn error_response(
    status: StatusCode,
    code: impl ToString,
    message: impl Into<String>,
) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}

impl IntoResponse for ParseAssessmentError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ParseAssessmentError::Extraction(e) => {
                let status = match e.code() {
                    ErrorCode::EmptyOrUnreadablePdf
                    | ErrorCode::NotACliftonStrengthsReport => StatusCode::BAD_REQUEST,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                error_response(status, e.code(), message)
            }
            ParseAssessmentError::Storage(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                message,
            ),
        }
    }
}

impl IntoResponse for CoachingError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            CoachingError::EmptyMessage => {
                error_response(StatusCode::BAD_REQUEST, ErrorCode::ValidationFailed, message)
            }
            CoachingError::AssessmentNotFound(_) => {
                error_response(StatusCode::NOT_FOUND, ErrorCode::AssessmentNotFound, message)
            }
            CoachingError::RateLimited { retry_after_secs } => {
                let mut response =
                    error_response(StatusCode::TOO_MANY_REQUESTS, ErrorCode::RateLimited, message);
                if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            CoachingError::Provider(AIError::RateLimited { retry_after_secs }) => {
                let mut response =
                    error_response(StatusCode::TOO_MANY_REQUESTS, ErrorCode::RateLimited, message);
                if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                    response.headers_mut().insert(header::RETRY_AFTER, value);
                }
                response
            }
            CoachingError::Provider(_) => error_response(
                StatusCode::BAD_GATEWAY,
                ErrorCode::AiProviderError,
                message,
            ),
            CoachingError::Storage(_) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                message,
            ),
        }
    }
}
