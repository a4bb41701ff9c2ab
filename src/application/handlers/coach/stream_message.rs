//! StreamCoachingMessage command handler - the SSE chat turn.
//!
//! Same setup as the blocking turn, but the provider stream is forwarded
//! chunk by chunk through a `StreamSanitizer` so bracketed meta-commentary
//! never reaches the client, even when a bracket spans two chunks.

use futures::StreamExt;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::domain::coaching::{
    build_contextual_prompt, CoachingRequest, CoachingResponse, StreamSanitizer,
    COACH_SYSTEM_PROMPT,
};
use crate::domain::foundation::SessionId;
use crate::ports::{
    AIProvider, AssessmentRepository, ChatRepository, CompletionRequest, MessageRole, RateLimiter,
};

use super::{
    enforce_rate_limits, load_assessment, persist_exchange, resolve_session, CoachingCommand,
    CoachingError,
};

/// Events emitted over the SSE connection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoachStreamEvent {
    /// A sanitized slice of the response.
    Chunk { content: String },
    /// The turn finished; carries the full post-processed response.
    Complete { response: CoachingResponse },
    /// The provider stream failed mid-turn.
    Error { message: String },
}

/// Handler for one streaming coaching turn.
pub struct StreamCoachingMessageHandler {
    provider: Arc<dyn AIProvider>,
    assessments: Arc<dyn AssessmentRepository>,
    chats: Arc<dyn ChatRepository>,
    limiter: Arc<dyn RateLimiter>,
    max_tokens: u32,
    temperature: f32,
}

impl StreamCoachingMessageHandler {
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

    /// Starts a streaming turn.
    ///
    /// Errors before the provider stream opens (validation, rate limits,
    /// unknown assessment) are returned directly; errors after that arrive
    /// as an `Error` event on the stream.
    pub async fn handle(
        &self,
        cmd: CoachingCommand,
    ) -> Result<
        (
            SessionId,
            Pin<Box<dyn futures::Stream<Item = CoachStreamEvent> + Send>>,
        ),
        CoachingError,
    > {
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

        let mut provider_stream = self.provider.stream_complete(request).await?;

        let (tx, rx) = mpsc::channel::<CoachStreamEvent>(32);
        let chats = Arc::clone(&self.chats);
        let session_id = session.id;
        let request_type = cmd.request_type;
        let user_message = cmd.message.clone();

        tokio::spawn(async move {
            let mut sanitizer = StreamSanitizer::new();
            let mut full_content = String::new();

            while let Some(item) = provider_stream.next().await {
                match item {
                    Ok(chunk) => {
                        if !chunk.delta.is_empty() {
                            full_content.push_str(&chunk.delta);
                            let safe = sanitizer.feed(&chunk.delta);
                            if !safe.is_empty() {
                                let _ = tx.send(CoachStreamEvent::Chunk { content: safe }).await;
                            }
                        }
                        if chunk.is_final() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "provider stream failed mid-turn");
                        let _ = tx
                            .send(CoachStreamEvent::Error {
                                message: e.to_string(),
                            })
                            .await;
                        return;
                    }
                }
            }

            let response =
                CoachingResponse::from_model_output(&full_content, session_id, request_type);
            persist_exchange(&chats, session_id, &user_message, &response.response).await;
            let _ = tx.send(CoachStreamEvent::Complete { response }).await;
        });

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        Ok((session_id, Box::pin(stream)))
    }
}
