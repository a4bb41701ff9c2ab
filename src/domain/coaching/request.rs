//! Coaching request types.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;
use crate::domain::strengths::StrengthProfile;

/// What kind of coaching interaction the user is asking for.
///
/// The type selects the contextual prompt shape; see `prompts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingRequestType {
    /// Whole-profile summary, no free-text question needed.
    Summary,
    /// Focused analysis of one topic against the profile.
    DeepDive,
    /// Strengths-based development plan for a focus area.
    GrowthPlanning,
    /// Open-ended conversation.
    GeneralChat,
}

impl CoachingRequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoachingRequestType::Summary => "summary",
            CoachingRequestType::DeepDive => "deep_dive",
            CoachingRequestType::GrowthPlanning => "growth_planning",
            CoachingRequestType::GeneralChat => "general_chat",
        }
    }
}

/// One coaching turn: the user's message plus everything needed to ground
/// the model in their profile.
#[derive(Debug, Clone)]
pub struct CoachingRequest {
    pub request_type: CoachingRequestType,
    pub message: String,
    /// Absent for profile-free general chat.
    pub profile: Option<StrengthProfile>,
    /// Absent on the first turn of a conversation.
    pub session_id: Option<SessionId>,
    /// Free-form extra context appended to the prompt.
    pub context: Option<String>,
}

impl CoachingRequest {
    pub fn new(request_type: CoachingRequestType, message: impl Into<String>) -> Self {
        Self {
            request_type,
            message: message.into(),
            profile: None,
            session_id: None,
            context: None,
        }
    }

    pub fn with_profile(mut self, profile: StrengthProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
