//! The CliftonStrengths catalog and profile aggregate.

mod catalog;
mod profile;
mod strength;

pub use catalog::{
    canonical_name, description_for, domain_for, is_canonical, normalize_name, CANONICAL_NAMES,
};
pub use profile::{DomainSummary, ReportFormat, StrengthProfile};
pub use strength::{Strength, StrengthDomain};
