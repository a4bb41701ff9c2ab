//! SQLite adapters - persistence implementations over sqlx.

mod assessment_repository;
mod chat_repository;
mod schema;

pub use assessment_repository::SqliteAssessmentRepository;
pub use chat_repository::SqliteChatRepository;
pub use schema::{connect, init_schema};
