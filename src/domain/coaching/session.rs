//! Persisted chat sessions and messages.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AssessmentId, MessageId, SessionId, Timestamp, UserId};

/// Who authored a persisted chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Storage tag for the role column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

/// A coaching conversation, optionally tied to one assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: SessionId,
    pub user_id: UserId,
    /// Absent for profile-free general chat.
    pub assessment_id: Option<AssessmentId>,
    pub started_at: Timestamp,
    pub last_active_at: Timestamp,
}

impl ChatSession {
    /// Starts a new session for a user.
    pub fn start(user_id: UserId, assessment_id: Option<AssessmentId>) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            user_id,
            assessment_id,
            started_at: now,
            last_active_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_active_at = Timestamp::now();
    }
}

/// One persisted message within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub session_id: SessionId,
    pub role: ChatRole,
    pub content: String,
    pub created_at: Timestamp,
}

impl ChatMessage {
    pub fn new(session_id: SessionId, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            session_id,
            role,
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tags_round_trip() {
        assert_eq!(ChatRole::parse(ChatRole::User.as_str()), Some(ChatRole::User));
        assert_eq!(
            ChatRole::parse(ChatRole::Assistant.as_str()),
            Some(ChatRole::Assistant)
        );
        assert_eq!(ChatRole::parse("system"), None);
    }

    #[test]
    fn start_sets_both_timestamps() {
        let user = UserId::new("user_jane_doe").unwrap();
        let session = ChatSession::start(user, None);
        assert_eq!(session.started_at, session.last_active_at);
        assert!(session.assessment_id.is_none());
    }

    #[test]
    fn message_belongs_to_session() {
        let user = UserId::new("user_jane_doe").unwrap();
        let session = ChatSession::start(user, None);
        let msg = ChatMessage::new(session.id, ChatRole::User, "hello");
        assert_eq!(msg.session_id, session.id);
        assert_eq!(msg.role, ChatRole::User);
    }
}
