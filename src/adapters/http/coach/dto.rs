//! Wire types for the coaching endpoints.

use serde::Deserialize;

use crate::application::handlers::CoachingCommand;
use crate::domain::coaching::CoachingRequestType;
use crate::domain::foundation::{AssessmentId, SessionId};

fn general_chat() -> CoachingRequestType {
    CoachingRequestType::GeneralChat
}

/// Body for both the blocking and streaming chat endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachRequest {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default = "general_chat")]
    pub request_type: CoachingRequestType,
    pub assessment_id: Option<AssessmentId>,
    pub session_id: Option<SessionId>,
    pub context: Option<String>,
}

impl CoachRequest {
    pub fn into_command(self) -> CoachingCommand {
        let mut cmd = CoachingCommand::new(self.request_type, self.message);
        cmd.assessment_id = self.assessment_id;
        cmd.session_id = self.session_id;
        cmd.context = self.context;
        cmd
    }
}

/// Body for the profile analysis endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub assessment_id: AssessmentId,
}
