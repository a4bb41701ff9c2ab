//! Coaching chat endpoints - blocking, streaming, and profile analysis.

mod dto;
mod handlers;
mod routes;

pub use dto::{AnalyzeRequest, CoachRequest};
pub use routes::{analyze_routes, routes};
