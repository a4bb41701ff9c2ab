//! AnalyzeProfile command handler.
//!
//! One lower-temperature completion over the whole profile, decoded as
//! structured JSON when the model cooperates and as plain text when it
//! does not.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::coaching::{build_analysis_prompt, clean_response};
use crate::domain::extraction::ai_output::{json_object_span, strip_markdown_fences};
use crate::domain::foundation::AssessmentId;
use crate::ports::{
    AIProvider, AssessmentRepository, CompletionRequest, MessageRole, RateLimiter,
};

use super::{enforce_rate_limits, load_assessment, CoachingError};

/// Analysis runs colder than coaching chat; structure matters more than
/// voice here.
const ANALYSIS_TEMPERATURE: f32 = 0.3;

/// Structured analysis of one profile.
///
/// Every field defaults so a partially-shaped model response still decodes;
/// a response that is not JSON at all lands whole in `summary`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAnalysis {
    #[serde(default)]
    pub strength_insights: Vec<serde_json::Value>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub recommendations: Vec<serde_json::Value>,
    #[serde(default)]
    pub dominant_domains: Vec<serde_json::Value>,
    #[serde(default)]
    pub growth_opportunities: Vec<serde_json::Value>,
}

impl ProfileAnalysis {
    /// Decodes model output, falling back to a text-only analysis.
    pub fn from_model_output(raw: &str) -> Self {
        let stripped = strip_markdown_fences(raw);
        if let Some(json) = json_object_span(&stripped) {
            if let Ok(analysis) = serde_json::from_str::<ProfileAnalysis>(json) {
                return analysis;
            }
        }
        tracing::debug!("analysis response was not structured JSON, using text fallback");
        Self {
            summary: clean_response(raw),
            ..Self::default()
        }
    }
}

/// Handler for the structured profile analysis operation.
pub struct AnalyzeProfileHandler {
    provider: Arc<dyn AIProvider>,
    assessments: Arc<dyn AssessmentRepository>,
    limiter: Arc<dyn RateLimiter>,
    max_tokens: u32,
}

impl AnalyzeProfileHandler {
    pub fn new(
        provider: Arc<dyn AIProvider>,
        assessments: Arc<dyn AssessmentRepository>,
        limiter: Arc<dyn RateLimiter>,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            assessments,
            limiter,
            max_tokens,
        }
    }

    pub async fn handle(&self, id: AssessmentId) -> Result<ProfileAnalysis, CoachingError> {
        enforce_rate_limits(&self.limiter).await?;

        let record = load_assessment(&self.assessments, Some(id))
            .await?
            .ok_or(CoachingError::AssessmentNotFound(id))?;

        let request = CompletionRequest::new()
            .with_message(MessageRole::User, build_analysis_prompt(&record.profile))
            .with_max_tokens(self.max_tokens)
            .with_temperature(ANALYSIS_TEMPERATURE);

        let completion = self.provider.complete(request).await?;
        Ok(ProfileAnalysis::from_model_output(&completion.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockProvider;
    use crate::adapters::rate_limiter::InMemoryRateLimiter;

    use super::super::test_support::{sample_record, InMemoryAssessments};

    fn handler_with(
        provider: Arc<MockProvider>,
        records: Vec<crate::ports::AssessmentRecord>,
    ) -> AnalyzeProfileHandler {
        AnalyzeProfileHandler::new(
            provider,
            Arc::new(InMemoryAssessments::with(records)),
            Arc::new(InMemoryRateLimiter::with_defaults()),
            4096,
        )
    }

    #[tokio::test]
    async fn decodes_structured_json() {
        let record = sample_record();
        let provider = Arc::new(MockProvider::with_response(
            r#"```json
            {
              "strengthInsights": [{"strength": "Achiever", "insight": "momentum"}],
              "summary": "An execution-heavy profile.",
              "recommendations": ["protect focus time"],
              "dominantDomains": [{"domain": "Executing"}],
              "growthOpportunities": ["delegation"]
            }
            ```"#,
        ));
        let handler = handler_with(provider.clone(), vec![record.clone()]);

        let analysis = handler.handle(record.id).await.unwrap();
        assert_eq!(analysis.summary, "An execution-heavy profile.");
        assert_eq!(analysis.strength_insights.len(), 1);
        assert_eq!(analysis.recommendations.len(), 1);

        // Full strengths list, not just the top five, goes into the prompt.
        let requests = provider.recorded_requests();
        assert!(requests[0].messages[0].content.contains("All Strengths"));
        assert_eq!(requests[0].temperature, Some(ANALYSIS_TEMPERATURE));
    }

    #[tokio::test]
    async fn prose_response_becomes_text_summary() {
        let record = sample_record();
        let provider = Arc::new(MockProvider::with_response(
            "This profile leans on Executing themes.",
        ));
        let handler = handler_with(provider, vec![record.clone()]);

        let analysis = handler.handle(record.id).await.unwrap();
        assert_eq!(analysis.summary, "This profile leans on Executing themes.");
        assert!(analysis.strength_insights.is_empty());
    }

    #[tokio::test]
    async fn unknown_assessment_is_not_found() {
        let handler = handler_with(Arc::new(MockProvider::with_response("ok")), Vec::new());
        assert!(matches!(
            handler.handle(AssessmentId::new()).await,
            Err(CoachingError::AssessmentNotFound(_))
        ));
    }
}
