//! AI extraction fallback over the AIProvider port.
//!
//! Asks the model for one exact JSON shape and refuses everything else.
//! Every failure maps to `AiFallbackUnavailable`, which callers treat as
//! "the fallback had nothing to add".

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::extraction::{ai_output::AiExtraction, ExtractionError};
use crate::domain::strengths::StrengthProfile;
use crate::ports::{AIProvider, CompletionRequest, FallbackExtractor, MessageRole};

/// Report text beyond this length is truncated before prompting; the
/// strengths list always appears in the first pages of a report.
const MAX_REPORT_CHARS: usize = 12_000;

/// FallbackExtractor implementation that prompts an LLM.
pub struct LlmExtractor {
    provider: Arc<dyn AIProvider>,
    timeout: Duration,
}

impl LlmExtractor {
    pub fn new(provider: Arc<dyn AIProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    fn build_prompt(text: &str) -> String {
        let mut end = text.len().min(MAX_REPORT_CHARS);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let truncated = &text[..end];

        format!(
            "Extract the CliftonStrengths assessment data from the following report text.\n\n\
             Respond with ONLY a JSON object in exactly this shape, no markdown, no prose:\n\
             {{\n\
             \x20 \"userName\": \"Full Name\",\n\
             \x20 \"assessmentDate\": \"YYYY-MM-DD or null\",\n\
             \x20 \"reportType\": \"top5, top10, or full34\",\n\
             \x20 \"strengths\": [\n\
             \x20   {{\"name\": \"Achiever\", \"rank\": 1, \"description\": \"optional\"}}\n\
             \x20 ],\n\
             \x20 \"additionalInfo\": null\n\
             }}\n\n\
             Rules:\n\
             - Only use official CliftonStrengths theme names\n\
             - Ranks must match the order in the report\n\
             - If no name is present, use \"Unknown User\"\n\n\
             Report text:\n{truncated}"
        )
    }
}

#[async_trait]
impl FallbackExtractor for LlmExtractor {
    async fn extract(&self, text: &str) -> Result<StrengthProfile, ExtractionError> {
        let request = CompletionRequest::new()
            .with_message(MessageRole::User, Self::build_prompt(text))
            .with_max_tokens(2048)
            // Extraction wants determinism, not creativity.
            .with_temperature(0.0);

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| {
                ExtractionError::AiFallbackUnavailable(format!(
                    "extraction timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| ExtractionError::AiFallbackUnavailable(e.to_string()))?;

        AiExtraction::parse(&response.content)?.into_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockProvider;
    use crate::domain::strengths::ReportFormat;

    fn extractor_with(provider: MockProvider) -> LlmExtractor {
        LlmExtractor::new(Arc::new(provider), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn extracts_profile_from_valid_json() {
        let provider = MockProvider::with_response(
            r#"{"userName": "Jane Doe", "assessmentDate": "2025-03-09",
               "reportType": "top5",
               "strengths": [
                 {"name": "Empathy", "rank": 1},
                 {"name": "Ideation", "rank": 2}
               ],
               "additionalInfo": null}"#,
        );
        let extractor = extractor_with(provider);

        let profile = extractor.extract("unreadable report text").await.unwrap();
        assert_eq!(profile.name, "Jane Doe");
        assert_eq!(profile.format, ReportFormat::Top5);
        assert_eq!(profile.strengths[0].name, "Empathy");
    }

    #[tokio::test]
    async fn provider_failure_maps_to_fallback_unavailable() {
        let extractor = extractor_with(MockProvider::failing("overloaded"));
        let err = extractor.extract("text").await.unwrap_err();
        assert!(matches!(err, ExtractionError::AiFallbackUnavailable(_)));
    }

    #[tokio::test]
    async fn non_json_answer_maps_to_fallback_unavailable() {
        let extractor = extractor_with(MockProvider::with_response("I cannot read this."));
        let err = extractor.extract("text").await.unwrap_err();
        assert!(matches!(err, ExtractionError::AiFallbackUnavailable(_)));
    }

    #[test]
    fn prompt_embeds_report_text_and_caps_length() {
        let long_text = "x".repeat(MAX_REPORT_CHARS * 2);
        let prompt = LlmExtractor::build_prompt(&long_text);
        assert!(prompt.len() < MAX_REPORT_CHARS + 2000);
        assert!(prompt.contains("userName"));
        assert!(prompt.contains("Unknown User"));
    }

    #[tokio::test]
    async fn request_is_deterministic_and_bounded() {
        let provider = Arc::new(MockProvider::with_response("not json"));
        let extractor = LlmExtractor::new(provider.clone(), Duration::from_secs(5));
        let _ = extractor.extract("report").await;

        let requests = provider.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(0.0));
        assert_eq!(requests[0].max_tokens, Some(2048));
    }
}
