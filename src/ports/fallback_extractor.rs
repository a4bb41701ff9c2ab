//! Fallback Extractor Port - AI-backed report extraction.
//!
//! The regex pipeline is always tried first; this port is consulted only
//! when it finds zero strengths. Implementations send the report text to
//! an LLM and decode its schema-validated answer.

use async_trait::async_trait;

use crate::domain::extraction::ExtractionError;
use crate::domain::strengths::StrengthProfile;

/// Port for the AI extraction fallback.
///
/// # Contract
///
/// Implementations must:
/// - Enforce a request timeout so a slow provider cannot stall uploads
/// - Validate the model output before building a profile
/// - Return `AiFallbackUnavailable` for every failure mode; callers treat
///   that as "the fallback had nothing to add", never as a hard error
#[async_trait]
pub trait FallbackExtractor: Send + Sync {
    /// Attempts to extract a full profile from raw report text.
    async fn extract(&self, text: &str) -> Result<StrengthProfile, ExtractionError>;
}
