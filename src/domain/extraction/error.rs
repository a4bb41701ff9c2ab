//! Extraction failure taxonomy.

use thiserror::Error;

use crate::domain::foundation::ErrorCode;

/// Why a report could not be turned into a profile.
///
/// All variants are terminal for the request except `AiFallbackUnavailable`,
/// which callers log and degrade from rather than surface to users.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    /// Text extraction yielded nothing usable.
    #[error("PDF appears to be empty or unreadable")]
    EmptyOrUnreadablePdf,

    /// Text extracted but no CliftonStrengths indicator phrases present.
    #[error("PDF does not appear to be a valid CliftonStrengths assessment report")]
    NotAStrengthsReport,

    /// Plausible report text, but zero canonical strengths matched.
    #[error("No CliftonStrengths could be extracted from the report")]
    ExtractionFailed,

    /// The LLM fallback failed or returned unusable data.
    ///
    /// Never user-facing on its own; the caller falls back to the regex
    /// pipeline result (or `ExtractionFailed`).
    #[error("AI extraction unavailable: {0}")]
    AiFallbackUnavailable(String),
}

impl ExtractionError {
    /// Stable error code surfaced over the API.
    pub fn code(&self) -> ErrorCode {
        match self {
            ExtractionError::EmptyOrUnreadablePdf => ErrorCode::EmptyOrUnreadablePdf,
            ExtractionError::NotAStrengthsReport => ErrorCode::NotACliftonStrengthsReport,
            ExtractionError::ExtractionFailed => ErrorCode::ExtractionFailed,
            ExtractionError::AiFallbackUnavailable(_) => ErrorCode::AiFallbackUnavailable,
        }
    }
}
