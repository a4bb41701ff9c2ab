//! Chat Repository Port - persistence for coaching conversations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::coaching::{ChatMessage, ChatSession};
use crate::domain::foundation::SessionId;

use super::assessment_repository::RepositoryError;

/// Row counts reported by the health endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    pub users: u64,
    pub assessments: u64,
    pub sessions: u64,
    pub messages: u64,
}

/// Port for chat session and message persistence.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Persists a new session.
    async fn create_session(&self, session: &ChatSession) -> Result<(), RepositoryError>;

    /// Fetches a session by id.
    async fn find_session(&self, id: &SessionId) -> Result<Option<ChatSession>, RepositoryError>;

    /// Updates a session's last-active timestamp.
    async fn touch_session(&self, id: &SessionId) -> Result<(), RepositoryError>;

    /// Appends a message to its session.
    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError>;

    /// All messages in a session, oldest first.
    async fn messages_for_session(
        &self,
        id: &SessionId,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// Row counts across all tables, for health reporting.
    async fn stats(&self) -> Result<StorageStats, RepositoryError>;
}
