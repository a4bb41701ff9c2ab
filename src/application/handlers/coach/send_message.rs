//! SendCoachingMessage command handler - the blocking chat turn.

use std::sync::Arc;

use crate::domain::coaching::{
    build_contextual_prompt, CoachingRequest, CoachingResponse, COACH_SYSTEM_PROMPT,
};
use crate::ports::{
    AIProvider, AssessmentRepository, ChatRepository, CompletionRequest, MessageRole, RateLimiter,
};

use super::{
    enforce_rate_limits, load_assessment, persist_exchange, resolve_session, CoachingCommand,
    CoachingError,
};

/// Handler for one blocking coaching turn.
pub struct SendCoachingMessageHandler {
    provider: Arc<dyn AIProvider>,
    assessments: Arc<dyn AssessmentRepository>,
    chats: Arc<dyn ChatRepository>,
    limiter: Arc<dyn RateLimiter>,
    max_tokens: u32,
    temperature: f32,
}

impl SendCoachingMessageHandler {
    pub fn new(
        provider: Arc<dyn AIProvider>,
        assessments: Arc<dyn AssessmentRepository>,
        chats: Arc<dyn ChatRepository>,
        limiter: Arc<dyn RateLimiter>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            assessments,
            chats,
            limiter,
            max_tokens,
            temperature,
        }
    }

    pub async fn handle(&self, cmd: CoachingCommand) -> Result<CoachingResponse, CoachingError> {
        cmd.validate()?;
        enforce_rate_limits(&self.limiter).await?;

        let record = load_assessment(&self.assessments, cmd.assessment_id).await?;
        let (session, history) =
            resolve_session(&self.chats, cmd.session_id, record.as_ref()).await;

        let mut coaching = CoachingRequest::new(cmd.request_type, &cmd.message);
        if let Some(record) = &record {
            coaching = coaching.with_profile(record.profile.clone());
        }
        if let Some(context) = &cmd.context {
            coaching = coaching.with_context(context);
        }
        let prompt = build_contextual_prompt(&coaching);

        let mut request = CompletionRequest::new()
            .with_system_prompt(COACH_SYSTEM_PROMPT)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);
        for message in history {
            request = request.with_message(message.role, message.content);
        }
        let request = request.with_message(MessageRole::User, prompt);

        let completion = self.provider.complete(request).await?;
        let response =
            CoachingResponse::from_model_output(&completion.content, session.id, cmd.request_type);

        persist_exchange(&self.chats, session.id, &cmd.message, &response.response).await;

        tracing::debug!(
            session_id = %session.id,
            request_type = cmd.request_type.as_str(),
            completion_tokens = completion.usage.completion_tokens,
            "coaching turn completed"
        );

        Ok(response)
    }
}
