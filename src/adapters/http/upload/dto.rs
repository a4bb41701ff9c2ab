//! Wire types for the upload endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AssessmentId, Timestamp, UserId};
use crate::domain::strengths::StrengthProfile;
use crate::ports::AssessmentRecord;

/// Body returned after a report has been parsed and stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub assessment_id: AssessmentId,
    pub user_id: UserId,
    pub profile: StrengthProfile,
    pub uploaded_at: Timestamp,
}

impl From<AssessmentRecord> for UploadResponse {
    fn from(record: AssessmentRecord) -> Self {
        Self {
            assessment_id: record.id,
            user_id: record.user_id,
            profile: record.profile,
            uploaded_at: record.created_at,
        }
    }
}
