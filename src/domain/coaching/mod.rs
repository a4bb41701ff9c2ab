//! Coaching conversation domain: request shaping, prompt construction,
//! and response post-processing.

mod prompts;
mod request;
mod response;
mod session;

pub use prompts::{
    build_analysis_prompt, build_contextual_prompt, profile_context, COACH_SYSTEM_PROMPT,
};
pub use request::{CoachingRequest, CoachingRequestType};
pub use response::{clean_response, CoachingResponse, StreamSanitizer};
pub use session::{ChatMessage, ChatRole, ChatSession};
