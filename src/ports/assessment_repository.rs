//! Assessment Repository Port - persistence for parsed profiles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{AssessmentId, Timestamp, UserId};
use crate::domain::strengths::StrengthProfile;

/// A stored assessment: one parsed profile for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRecord {
    pub id: AssessmentId,
    pub user_id: UserId,
    pub profile: StrengthProfile,
    pub created_at: Timestamp,
}

impl AssessmentRecord {
    pub fn new(user_id: UserId, profile: StrengthProfile) -> Self {
        Self {
            id: AssessmentId::new(),
            user_id,
            profile,
            created_at: Timestamp::now(),
        }
    }
}

/// Port for assessment persistence.
///
/// Saving an assessment upserts its user row first; a user exists exactly
/// when at least one upload has been stored for them.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    /// Persists a record, upserting the owning user.
    async fn save(&self, record: &AssessmentRecord) -> Result<(), RepositoryError>;

    /// Fetches one assessment by id.
    async fn find(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;

    /// The most recently stored assessment for a user, if any.
    async fn latest_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError>;
}

/// Errors from persistence operations, shared by all repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The backing store rejected or failed the operation.
    #[error("database error: {0}")]
    Database(String),

    /// Stored data failed to decode into domain types.
    #[error("corrupt stored data: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}
