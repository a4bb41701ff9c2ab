//! Command handlers.
//!
//! Each handler owns one operation end to end: it validates input, calls
//! ports, and returns domain types. HTTP concerns stay in the adapters.

pub mod assessment;
pub mod coach;

pub use assessment::{ParseAssessmentError, ParseAssessmentHandler};
pub use coach::{
    AnalyzeProfileHandler, CoachStreamEvent, CoachingCommand, CoachingError, ProfileAnalysis,
    SendCoachingMessageHandler, StreamCoachingMessageHandler,
};
