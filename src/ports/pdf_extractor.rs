//! PDF Extractor Port - raw document bytes to plain text.

use async_trait::async_trait;
use thiserror::Error;

/// Port for extracting plain text from an uploaded PDF.
///
/// Extraction is async because real implementations run the CPU-heavy
/// decode off the async runtime's worker threads.
#[async_trait]
pub trait PdfExtractor: Send + Sync {
    /// Extracts all text content from the document, page order preserved.
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError>;
}

/// Errors from PDF text extraction.
#[derive(Debug, Clone, Error)]
pub enum PdfError {
    /// The bytes are not a parseable PDF document.
    #[error("invalid PDF document: {0}")]
    InvalidDocument(String),

    /// The document parsed but produced no text (scanned images, empty pages).
    #[error("document contains no extractable text")]
    NoText,

    /// Extraction task failed to run.
    #[error("extraction failed: {0}")]
    TaskFailed(String),
}
