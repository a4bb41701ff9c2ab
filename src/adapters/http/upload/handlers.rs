//! Upload request handling.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::error::error_response;
use crate::adapters::http::AppState;
use crate::domain::foundation::ErrorCode;

use super::dto::UploadResponse;

/// Accepts a multipart form with a `pdf` field and returns the parsed
/// assessment.
pub async fn upload_report(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let bytes = match read_pdf_field(&mut multipart).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };

    tracing::info!(size_bytes = bytes.len(), "received report upload");

    match state.parse_assessment.handle(&bytes).await {
        Ok(record) => (StatusCode::OK, Json(UploadResponse::from(record))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Pulls the `pdf` field out of the form, rejecting anything that does not
/// look like a PDF before the parser sees it.
async fn read_pdf_field(multipart: &mut Multipart) -> Result<Vec<u8>, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationFailed,
                    "missing 'pdf' form field",
                ))
            }
            Err(e) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::ValidationFailed,
                    format!("malformed multipart body: {e}"),
                ))
            }
        };

        if field.name() != Some("pdf") {
            continue;
        }

        let looks_like_pdf = field
            .content_type()
            .map(|ct| ct == "application/pdf")
            .unwrap_or(false)
            || field
                .file_name()
                .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
                .unwrap_or(false);
        if !looks_like_pdf {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidFormat,
                "only PDF uploads are accepted",
            ));
        }

        return match field.bytes().await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(e) => Err(error_response(
                StatusCode::BAD_REQUEST,
                ErrorCode::ValidationFailed,
                format!("failed to read upload: {e}"),
            )),
        };
    }
}
