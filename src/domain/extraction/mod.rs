//! Turning raw report text into a strengths profile.
//!
//! The text parser is the primary, dependency-free pipeline. The AI
//! fallback (ports::FallbackExtractor) supplements it when the regex pass
//! finds nothing; its schema-validated output types live in `ai_output`.

pub mod ai_output;
mod error;
mod text_parser;

pub use error::ExtractionError;
pub use text_parser::{
    extract_assessment_date, extract_strengths, extract_user_name, is_strengths_report,
    parse_report,
};
