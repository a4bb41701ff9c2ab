//! PDF text extraction backed by the `pdf-extract` crate.
//!
//! Decoding is CPU-bound, so it runs under `spawn_blocking` to keep the
//! async worker threads free during large uploads.

use async_trait::async_trait;

use crate::ports::{PdfError, PdfExtractor};

/// PdfExtractor implementation over `pdf_extract`.
#[derive(Debug, Default, Clone)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PdfExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, PdfError> {
        let bytes = bytes.to_vec();

        let text = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| PdfError::InvalidDocument(e.to_string()))
        })
        .await
        .map_err(|e| PdfError::TaskFailed(e.to_string()))??;

        if text.trim().is_empty() {
            return Err(PdfError::NoText);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn garbage_bytes_are_invalid() {
        let extractor = PdfTextExtractor::new();
        let err = extractor.extract_text(b"not a pdf at all").await.unwrap_err();
        assert!(matches!(err, PdfError::InvalidDocument(_)));
    }

    #[tokio::test]
    async fn empty_input_is_invalid() {
        let extractor = PdfTextExtractor::new();
        assert!(extractor.extract_text(&[]).await.is_err());
    }
}
