//! SQLite implementation of ChatRepository.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::domain::coaching::{ChatMessage, ChatRole, ChatSession};
use crate::domain::foundation::{AssessmentId, MessageId, SessionId, UserId};
use crate::ports::{ChatRepository, RepositoryError, StorageStats};

use super::assessment_repository::{format_timestamp, parse_timestamp};

/// SQLite implementation of ChatRepository.
#[derive(Clone)]
pub struct SqliteChatRepository {
    pool: SqlitePool,
}

impl SqliteChatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_session(row: &sqlx::sqlite::SqliteRow) -> Result<ChatSession, RepositoryError> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let assessment_id: Option<String> = row.try_get("assessment_id")?;
        let started_at: String = row.try_get("started_at")?;
        let last_active_at: String = row.try_get("last_active_at")?;

        Ok(ChatSession {
            id: SessionId::from_str(&id).map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
            user_id: UserId::new(user_id).map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
            assessment_id: assessment_id
                .map(|raw| {
                    AssessmentId::from_str(&raw)
                        .map_err(|e| RepositoryError::Corrupt(e.to_string()))
                })
                .transpose()?,
            started_at: parse_timestamp(&started_at)?,
            last_active_at: parse_timestamp(&last_active_at)?,
        })
    }

    fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Result<ChatMessage, RepositoryError> {
        let id: String = row.try_get("id")?;
        let session_id: String = row.try_get("session_id")?;
        let role: String = row.try_get("role")?;
        let content: String = row.try_get("content")?;
        let created_at: String = row.try_get("created_at")?;

        Ok(ChatMessage {
            id: MessageId::from_str(&id).map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
            session_id: SessionId::from_str(&session_id)
                .map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
            role: ChatRole::parse(&role)
                .ok_or_else(|| RepositoryError::Corrupt(format!("unknown role: {}", role)))?,
            content,
            created_at: parse_timestamp(&created_at)?,
        })
    }
}

#[async_trait]
impl ChatRepository for SqliteChatRepository {
    async fn create_session(&self, session: &ChatSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chat_sessions (id, user_id, assessment_id, started_at, last_active_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(session.id.to_string())
        .bind(session.user_id.as_str())
        .bind(session.assessment_id.as_ref().map(|id| id.to_string()))
        .bind(format_timestamp(&session.started_at))
        .bind(format_timestamp(&session.last_active_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to insert session: {}", e)))?;

        Ok(())
    }

    async fn find_session(&self, id: &SessionId) -> Result<Option<ChatSession>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, user_id, assessment_id, started_at, last_active_at FROM chat_sessions WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_session).transpose()
    }

    async fn touch_session(&self, id: &SessionId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE chat_sessions SET last_active_at = ?2 WHERE id = ?1")
            .bind(id.to_string())
            .bind(format_timestamp(&crate::domain::foundation::Timestamp::now()))
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to touch session: {}", e)))?;
        Ok(())
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, session_id, role, content, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(message.id.to_string())
        .bind(message.session_id.to_string())
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(format_timestamp(&message.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to insert message: {}", e)))?;

        Ok(())
    }

    async fn messages_for_session(
        &self,
        id: &SessionId,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, session_id, role, content, created_at
            FROM chat_messages
            WHERE session_id = ?1
            ORDER BY created_at ASC
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_message).collect()
    }

    async fn stats(&self) -> Result<StorageStats, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM strength_assessments) AS assessments,
                (SELECT COUNT(*) FROM chat_sessions) AS sessions,
                (SELECT COUNT(*) FROM chat_messages) AS messages
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StorageStats {
            users: row.try_get::<i64, _>("users")? as u64,
            assessments: row.try_get::<i64, _>("assessments")? as u64,
            sessions: row.try_get::<i64, _>("sessions")? as u64,
            messages: row.try_get::<i64, _>("messages")? as u64,
        })
    }
}
