//! ParseAssessment command handler.
//!
//! Turns uploaded PDF bytes into a persisted assessment: text extraction,
//! the regex parse, the AI fallback when the regex pass finds nothing, and
//! storage of the assembled profile.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::extraction::{parse_report, ExtractionError};
use crate::domain::foundation::UserId;
use crate::ports::{
    AssessmentRecord, AssessmentRepository, FallbackExtractor, PdfError, PdfExtractor,
    RepositoryError,
};

/// Errors that can occur while parsing an upload.
#[derive(Debug, Error)]
pub enum ParseAssessmentError {
    /// The report could not be turned into a profile.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The profile parsed but could not be stored.
    #[error("failed to store assessment: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ParseAssessmentError {
    fn from(err: RepositoryError) -> Self {
        ParseAssessmentError::Storage(err.to_string())
    }
}

/// Handler for the upload-and-parse operation.
pub struct ParseAssessmentHandler {
    pdf: Arc<dyn PdfExtractor>,
    fallback: Arc<dyn FallbackExtractor>,
    assessments: Arc<dyn AssessmentRepository>,
}

impl ParseAssessmentHandler {
    pub fn new(
        pdf: Arc<dyn PdfExtractor>,
        fallback: Arc<dyn FallbackExtractor>,
        assessments: Arc<dyn AssessmentRepository>,
    ) -> Self {
        Self {
            pdf,
            fallback,
            assessments,
        }
    }

    /// Parses PDF bytes into a stored assessment.
    ///
    /// The regex pipeline is authoritative; the AI fallback runs only when
    /// it finds zero strengths, and a fallback failure degrades back to
    /// `ExtractionFailed` rather than surfacing its own error.
    pub async fn handle(&self, bytes: &[u8]) -> Result<AssessmentRecord, ParseAssessmentError> {
        let text = self.pdf.extract_text(bytes).await.map_err(|e| {
            tracing::warn!(error = %e, "PDF text extraction failed");
            match e {
                PdfError::NoText | PdfError::InvalidDocument(_) | PdfError::TaskFailed(_) => {
                    ExtractionError::EmptyOrUnreadablePdf
                }
            }
        })?;

        let profile = match parse_report(&text) {
            Ok(profile) => profile,
            Err(ExtractionError::ExtractionFailed) => {
                tracing::info!("regex pipeline found no strengths, trying AI fallback");
                match self.fallback.extract(&text).await {
                    Ok(profile) => profile,
                    Err(e) => {
                        tracing::warn!(error = %e, "AI fallback unavailable");
                        return Err(ExtractionError::ExtractionFailed.into());
                    }
                }
            }
            Err(e) => return Err(e.into()),
        };

        let user_id = UserId::from_name(&profile.name);
        let record = AssessmentRecord::new(user_id, profile);
        self.assessments.save(&record).await?;

        tracing::info!(
            assessment_id = %record.id,
            user_id = %record.user_id,
            strengths = record.profile.len(),
            format = record.profile.format.as_str(),
            "assessment parsed and stored"
        );

        Ok(record)
    }
}
