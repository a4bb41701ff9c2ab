//! A single ranked strength and the four CliftonStrengths domains.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four CliftonStrengths domains.
///
/// Declaration order is significant: deterministic tie-breaks (leading
/// domain, equal-count summary ordering) resolve to the earliest variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthDomain {
    Executing,
    Influencing,
    RelationshipBuilding,
    StrategicThinking,
}

impl StrengthDomain {
    /// All domains in declaration order.
    pub const ALL: [StrengthDomain; 4] = [
        StrengthDomain::Executing,
        StrengthDomain::Influencing,
        StrengthDomain::RelationshipBuilding,
        StrengthDomain::StrategicThinking,
    ];

    /// Human-readable domain name as used in Gallup reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            StrengthDomain::Executing => "Executing",
            StrengthDomain::Influencing => "Influencing",
            StrengthDomain::RelationshipBuilding => "Relationship Building",
            StrengthDomain::StrategicThinking => "Strategic Thinking",
        }
    }

    /// Position in declaration order, used for tie-breaking.
    pub fn order(&self) -> usize {
        Self::ALL.iter().position(|d| d == self).unwrap_or(usize::MAX)
    }

    /// Leadership style description associated with this domain.
    pub fn leadership_style(&self) -> &'static str {
        match self {
            StrengthDomain::Executing => {
                "Task-oriented leadership focused on getting things done"
            }
            StrengthDomain::Influencing => {
                "Inspirational leadership that motivates and directs others"
            }
            StrengthDomain::RelationshipBuilding => {
                "People-focused leadership that builds strong teams"
            }
            StrengthDomain::StrategicThinking => {
                "Visionary leadership that provides direction and focus"
            }
        }
    }
}

impl fmt::Display for StrengthDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A single strength within a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strength {
    /// Canonical strength name (e.g. "Achiever").
    pub name: String,
    /// Rank within the profile, 1 = strongest.
    pub rank: u32,
    /// Domain the strength belongs to (derived from the catalog).
    pub domain: StrengthDomain,
    /// Reference description text for the strength.
    pub description: String,
    /// Whether the source text carried a trademark glyph after the name.
    #[serde(default)]
    pub has_trademark_symbol: bool,
}

impl Strength {
    /// Builds a strength from a canonical name, deriving domain and
    /// description from the catalog.
    pub fn from_catalog(name: &str, rank: u32, has_trademark_symbol: bool) -> Self {
        use super::catalog::{description_for, domain_for};
        Self {
            name: name.to_string(),
            rank,
            domain: domain_for(name),
            description: description_for(name).unwrap_or_default().to_string(),
            has_trademark_symbol,
        }
    }

    /// Whether this strength sits in the top five of its profile.
    pub fn is_top_five(&self) -> bool {
        self.rank <= 5
    }
}
