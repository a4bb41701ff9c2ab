//! SQLite implementation of AssessmentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;

use crate::domain::foundation::{AssessmentId, Timestamp, UserId};
use crate::domain::strengths::StrengthProfile;
use crate::ports::{AssessmentRecord, AssessmentRepository, RepositoryError};

/// SQLite implementation of AssessmentRepository.
#[derive(Clone)]
pub struct SqliteAssessmentRepository {
    pool: SqlitePool,
}

impl SqliteAssessmentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<AssessmentRecord, RepositoryError> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let strengths_data: String = row.try_get("strengths_data")?;
        let created_at: String = row.try_get("created_at")?;

        let profile: StrengthProfile = serde_json::from_str(&strengths_data)
            .map_err(|e| RepositoryError::Corrupt(format!("strengths_data: {}", e)))?;

        Ok(AssessmentRecord {
            id: AssessmentId::from_str(&id)
                .map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
            user_id: UserId::new(user_id).map_err(|e| RepositoryError::Corrupt(e.to_string()))?,
            profile,
            created_at: parse_timestamp(&created_at)?,
        })
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<Timestamp, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc)))
        .map_err(|e| RepositoryError::Corrupt(format!("timestamp {:?}: {}", raw, e)))
}

pub(crate) fn format_timestamp(ts: &Timestamp) -> String {
    ts.as_datetime().to_rfc3339()
}

#[async_trait]
impl AssessmentRepository for SqliteAssessmentRepository {
    async fn save(&self, record: &AssessmentRecord) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to start transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO users (id, name, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name
            "#,
        )
        .bind(record.user_id.as_str())
        .bind(&record.profile.name)
        .bind(format_timestamp(&record.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to upsert user: {}", e)))?;

        let strengths_data = serde_json::to_string(&record.profile)
            .map_err(|e| RepositoryError::Database(format!("Failed to encode profile: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO strength_assessments (
                id, user_id, strengths_data, format, assessment_date, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.user_id.as_str())
        .bind(strengths_data)
        .bind(record.profile.format.as_str())
        .bind(format_timestamp(&record.profile.assessment_date))
        .bind(format_timestamp(&record.created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to insert assessment: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to commit: {}", e)))?;

        Ok(())
    }

    async fn find(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, user_id, strengths_data, created_at FROM strength_assessments WHERE id = ?1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn latest_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, strengths_data, created_at
            FROM strength_assessments
            WHERE user_id = ?1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_record).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::schema::test_pool;
    use crate::domain::strengths::{ReportFormat, Strength};

    fn sample_record(user: &str) -> AssessmentRecord {
        let strengths = ["Achiever", "Strategic", "Focus", "Responsibility", "Learner"]
            .iter()
            .enumerate()
            .map(|(i, n)| Strength::from_catalog(n, i as u32 + 1, false))
            .collect();
        let profile = StrengthProfile::assemble(
            "Jane Doe".into(),
            Timestamp::from_ymd(2025, 8, 8).unwrap(),
            strengths,
        );
        AssessmentRecord::new(UserId::new(user).unwrap(), profile)
    }

    #[tokio::test]
    async fn save_and_find_round_trips_profile() {
        let repo = SqliteAssessmentRepository::new(test_pool().await);
        let record = sample_record("user_jane_doe");
        repo.save(&record).await.unwrap();

        let found = repo.find(&record.id).await.unwrap().unwrap();
        assert_eq!(found.id, record.id);
        assert_eq!(found.profile.name, "Jane Doe");
        assert_eq!(found.profile.format, ReportFormat::Top5);
        assert_eq!(found.profile.strengths.len(), 5);
        assert_eq!(found.profile.assessment_date.date_string(), "2025-08-08");
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let repo = SqliteAssessmentRepository::new(test_pool().await);
        assert!(repo.find(&AssessmentId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn latest_for_user_picks_newest() {
        let repo = SqliteAssessmentRepository::new(test_pool().await);

        let mut first = sample_record("user_jane_doe");
        first.created_at = Timestamp::from_ymd(2025, 1, 1).unwrap();
        let mut second = sample_record("user_jane_doe");
        second.created_at = Timestamp::from_ymd(2025, 6, 1).unwrap();

        repo.save(&first).await.unwrap();
        repo.save(&second).await.unwrap();

        let latest = repo
            .latest_for_user(&UserId::new("user_jane_doe").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, second.id);
    }

    #[tokio::test]
    async fn re_upload_updates_user_name() {
        let repo = SqliteAssessmentRepository::new(test_pool().await);
        repo.save(&sample_record("user_jane_doe")).await.unwrap();
        // Second upload for the same user must not violate the users PK.
        repo.save(&sample_record("user_jane_doe")).await.unwrap();
    }
}
