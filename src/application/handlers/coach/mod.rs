//! Coaching command handlers.
//!
//! All three operations (blocking chat, streaming chat, profile analysis)
//! share the same shape: enforce rate limits, load the profile, build the
//! prompt, call the provider. Session and message persistence is
//! best-effort; a storage failure degrades to a stateless chat instead of
//! failing the request.

mod analyze_profile;
mod send_message;
mod stream_message;

pub use analyze_profile::{AnalyzeProfileHandler, ProfileAnalysis};
pub use send_message::SendCoachingMessageHandler;
pub use stream_message::{CoachStreamEvent, StreamCoachingMessageHandler};

use std::sync::Arc;
use thiserror::Error;

use crate::domain::coaching::{ChatMessage, ChatRole, ChatSession, CoachingRequestType};
use crate::domain::foundation::{AssessmentId, SessionId, UserId};
use crate::ports::{
    AIError, AssessmentRecord, AssessmentRepository, ChatRepository, Message, RateLimitKey,
    RateLimitResult, RateLimiter,
};

/// Rate limit identifier shared by every provider-backed operation.
const AI_LIMIT_ID: &str = "ai_requests";

/// One coaching command from the API.
#[derive(Debug, Clone)]
pub struct CoachingCommand {
    pub request_type: CoachingRequestType,
    pub message: String,
    /// Assessment to ground the conversation in, if any.
    pub assessment_id: Option<AssessmentId>,
    /// Existing session to continue; a new one is started otherwise.
    pub session_id: Option<SessionId>,
    pub context: Option<String>,
}

impl CoachingCommand {
    pub fn new(request_type: CoachingRequestType, message: impl Into<String>) -> Self {
        Self {
            request_type,
            message: message.into(),
            assessment_id: None,
            session_id: None,
            context: None,
        }
    }

    pub fn with_assessment(mut self, id: AssessmentId) -> Self {
        self.assessment_id = Some(id);
        self
    }

    pub fn with_session(mut self, id: SessionId) -> Self {
        self.session_id = Some(id);
        self
    }

    /// Summary requests carry no free-text question; everything else must.
    pub(crate) fn validate(&self) -> Result<(), CoachingError> {
        if self.request_type != CoachingRequestType::Summary && self.message.trim().is_empty() {
            return Err(CoachingError::EmptyMessage);
        }
        Ok(())
    }
}

/// Errors from the coaching operations.
#[derive(Debug, Error)]
pub enum CoachingError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error("assessment not found: {0}")]
    AssessmentNotFound(AssessmentId),

    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error(transparent)]
    Provider(#[from] AIError),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Consumes one slot from both AI windows, denying on either.
///
/// A limiter backend failure fails open: coaching keeps working without
/// protection and the failure is logged.
pub(crate) async fn enforce_rate_limits(
    limiter: &Arc<dyn RateLimiter>,
) -> Result<(), CoachingError> {
    for key in [
        RateLimitKey::per_minute(AI_LIMIT_ID),
        RateLimitKey::per_hour(AI_LIMIT_ID),
    ] {
        match limiter.check(key).await {
            Ok(RateLimitResult::Denied(denied)) => {
                return Err(CoachingError::RateLimited {
                    retry_after_secs: denied.retry_after_secs,
                })
            }
            Ok(RateLimitResult::Allowed(_)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "rate limiter unavailable, allowing request");
            }
        }
    }
    Ok(())
}

/// Loads the assessment named by the command, if any.
pub(crate) async fn load_assessment(
    assessments: &Arc<dyn AssessmentRepository>,
    id: Option<AssessmentId>,
) -> Result<Option<AssessmentRecord>, CoachingError> {
    let Some(id) = id else { return Ok(None) };
    assessments
        .find(&id)
        .await
        .map_err(|e| CoachingError::Storage(e.to_string()))?
        .map(Some)
        .ok_or(CoachingError::AssessmentNotFound(id))
}

fn to_ai_message(message: &ChatMessage) -> Message {
    match message.role {
        ChatRole::User => Message::user(&message.content),
        ChatRole::Assistant => Message::assistant(&message.content),
    }
}

/// Continues the named session or starts a fresh one.
///
/// Returns the session plus the prior conversation as provider messages.
/// Every storage failure degrades: unknown or unreadable sessions become
/// new sessions, unloadable history becomes an empty history.
pub(crate) async fn resolve_session(
    chats: &Arc<dyn ChatRepository>,
    session_id: Option<SessionId>,
    record: Option<&AssessmentRecord>,
) -> (ChatSession, Vec<Message>) {
    if let Some(id) = session_id {
        match chats.find_session(&id).await {
            Ok(Some(session)) => {
                let history = match chats.messages_for_session(&id).await {
                    Ok(messages) => messages.iter().map(to_ai_message).collect(),
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to load session history");
                        Vec::new()
                    }
                };
                return (session, history);
            }
            Ok(None) => {
                tracing::warn!(session_id = %id, "unknown session id, starting a new session");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to look up session, starting a new one");
            }
        }
    }

    let user_id = record
        .map(|r| r.user_id.clone())
        .unwrap_or_else(|| UserId::from_name("Anonymous"));
    let session = ChatSession::start(user_id, record.map(|r| r.id));
    if let Err(e) = chats.create_session(&session).await {
        tracing::warn!(error = %e, "failed to persist chat session");
    }
    (session, Vec::new())
}

/// Persists both sides of an exchange, best-effort.
pub(crate) async fn persist_exchange(
    chats: &Arc<dyn ChatRepository>,
    session_id: SessionId,
    user_text: &str,
    assistant_text: &str,
) {
    if !user_text.trim().is_empty() {
        let message = ChatMessage::new(session_id, ChatRole::User, user_text);
        if let Err(e) = chats.save_message(&message).await {
            tracing::warn!(error = %e, "failed to persist user message");
        }
    }
    let message = ChatMessage::new(session_id, ChatRole::Assistant, assistant_text);
    if let Err(e) = chats.save_message(&message).await {
        tracing::warn!(error = %e, "failed to persist assistant message");
    }
    if let Err(e) = chats.touch_session(&session_id).await {
        tracing::warn!(error = %e, "failed to touch session");
    }
}
