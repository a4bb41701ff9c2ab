//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::{
    AnalyzeProfileHandler, ParseAssessmentHandler, SendCoachingMessageHandler,
    StreamCoachingMessageHandler,
};
use crate::ports::{ChatRepository, ProviderInfo};

/// Everything the HTTP handlers need, injected once at startup.
#[derive(Clone)]
pub struct AppState {
    pub parse_assessment: Arc<ParseAssessmentHandler>,
    pub send_message: Arc<SendCoachingMessageHandler>,
    pub stream_message: Arc<StreamCoachingMessageHandler>,
    pub analyze_profile: Arc<AnalyzeProfileHandler>,
    /// For the health endpoint's storage stats.
    pub chats: Arc<dyn ChatRepository>,
    /// For the health endpoint's provider report.
    pub provider_info: ProviderInfo,
}
