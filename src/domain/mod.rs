//! Domain layer - pure types and business logic.
//!
//! No I/O happens here. The extraction module turns report text into
//! strengths, the strengths module owns the catalog and profile aggregate,
//! and the coaching module builds prompts and post-processes responses.

pub mod coaching;
pub mod extraction;
pub mod foundation;
pub mod strengths;
