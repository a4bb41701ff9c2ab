//! Connection setup and schema initialization.
//!
//! The schema is created on startup with idempotent statements; there is no
//! separate migration step for a single-file embedded database.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::ports::RepositoryError;

/// Opens a connection pool for the configured database.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| RepositoryError::Database(format!("Invalid database URL: {}", e)))?
        .create_if_missing(config.create_if_missing)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to connect: {}", e)))
}

/// Creates all tables and indexes if they do not exist.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS strength_assessments (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id),
            strengths_data TEXT NOT NULL,
            format TEXT NOT NULL CHECK (format IN ('top5', 'top10', 'full34')),
            assessment_date TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id),
            assessment_id TEXT REFERENCES strength_assessments(id),
            started_at TEXT NOT NULL,
            last_active_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_messages (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES chat_sessions(id),
            role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
            content TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    for index in [
        "CREATE INDEX IF NOT EXISTS idx_assessments_user ON strength_assessments(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_sessions_user ON chat_sessions(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_messages_session ON chat_messages(session_id)",
    ] {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        create_if_missing: true,
    };
    let pool = connect(&config).await.expect("in-memory pool");
    init_schema(&pool).await.expect("schema");
    pool
}
