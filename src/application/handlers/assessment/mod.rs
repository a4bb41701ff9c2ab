//! Assessment upload handling.

mod parse_assessment;

pub use parse_assessment::{ParseAssessmentError, ParseAssessmentHandler};
