//! Static catalog of the 34 CliftonStrengths themes.
//!
//! Names, domain membership, and description text are fixed by the Gallup
//! framework. The catalog is the single source of truth for what counts as
//! a canonical strength name.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::strength::StrengthDomain;

/// All 34 canonical strength names, grouped by domain.
///
/// Executing has 9 members, Influencing 8, Relationship Building 9,
/// Strategic Thinking 8.
pub const CANONICAL_NAMES: [(&str, StrengthDomain); 34] = [
    // Executing
    ("Achiever", StrengthDomain::Executing),
    ("Arranger", StrengthDomain::Executing),
    ("Belief", StrengthDomain::Executing),
    ("Consistency", StrengthDomain::Executing),
    ("Deliberative", StrengthDomain::Executing),
    ("Discipline", StrengthDomain::Executing),
    ("Focus", StrengthDomain::Executing),
    ("Responsibility", StrengthDomain::Executing),
    ("Restorative", StrengthDomain::Executing),
    // Influencing
    ("Activator", StrengthDomain::Influencing),
    ("Command", StrengthDomain::Influencing),
    ("Communication", StrengthDomain::Influencing),
    ("Competition", StrengthDomain::Influencing),
    ("Maximizer", StrengthDomain::Influencing),
    ("Self-Assurance", StrengthDomain::Influencing),
    ("Significance", StrengthDomain::Influencing),
    ("Woo", StrengthDomain::Influencing),
    // Relationship Building
    ("Adaptability", StrengthDomain::RelationshipBuilding),
    ("Connectedness", StrengthDomain::RelationshipBuilding),
    ("Developer", StrengthDomain::RelationshipBuilding),
    ("Empathy", StrengthDomain::RelationshipBuilding),
    ("Harmony", StrengthDomain::RelationshipBuilding),
    ("Includer", StrengthDomain::RelationshipBuilding),
    ("Individualization", StrengthDomain::RelationshipBuilding),
    ("Positivity", StrengthDomain::RelationshipBuilding),
    ("Relator", StrengthDomain::RelationshipBuilding),
    // Strategic Thinking
    ("Analytical", StrengthDomain::StrategicThinking),
    ("Context", StrengthDomain::StrategicThinking),
    ("Futuristic", StrengthDomain::StrategicThinking),
    ("Ideation", StrengthDomain::StrategicThinking),
    ("Input", StrengthDomain::StrategicThinking),
    ("Intellection", StrengthDomain::StrategicThinking),
    ("Learner", StrengthDomain::StrategicThinking),
    ("Strategic", StrengthDomain::StrategicThinking),
];

static DOMAIN_MAP: Lazy<HashMap<&'static str, StrengthDomain>> =
    Lazy::new(|| CANONICAL_NAMES.iter().copied().collect());

static DESCRIPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("Achiever", "You work hard and possess a great deal of stamina. You take immense satisfaction in being busy and productive."),
        ("Activator", "You can make things happen by turning thoughts into action. You want to do things now, rather than simply talk about them."),
        ("Adaptability", "You prefer to go with the flow. You tend to be \"now\" people who take things as they come and discover the future one day at a time."),
        ("Analytical", "You search for reasons and causes. You have the ability to think about all of the factors that might affect a situation."),
        ("Arranger", "You can organize, but you also have a flexibility that complements this ability. You like to determine how all of the pieces and resources can be arranged for maximum productivity."),
        ("Belief", "You have certain core values that are unchanging. Out of these values emerges a defined purpose for your life."),
        ("Command", "You have presence. You can take control of a situation and make decisions."),
        ("Communication", "You generally find it easy to put your thoughts into words. You are good conversationalists and presenters."),
        ("Competition", "You measure your progress against the performance of others. You strive to win first place and revel in contests."),
        ("Connectedness", "You have faith in the links among all things. You believe there are few coincidences and that almost every event has meaning."),
        ("Consistency", "You are keenly aware of the need to treat people the same. You crave stable routines and clear rules and procedures that everyone can follow."),
        ("Context", "You enjoy thinking about the past. You understand the present by researching its history."),
        ("Deliberative", "You are best described by the serious care you take in making decisions or choices. You anticipate obstacles."),
        ("Developer", "You recognize and cultivate the potential in others. You spot the signs of each small improvement and derive satisfaction from evidence of progress."),
        ("Discipline", "You enjoy routine and structure. Your world is best described by the order you create."),
        ("Empathy", "You can sense other people's feelings by imagining themselves in others' lives or situations."),
        ("Focus", "You can take a direction, follow through and make the corrections necessary to stay on track. You prioritize, then act."),
        ("Futuristic", "You are inspired by the future and what could be. You energize others with your visions of the future."),
        ("Harmony", "You look for consensus. You don't enjoy conflict; rather, you seek areas of agreement."),
        ("Ideation", "You are fascinated by ideas. You are able to find connections between seemingly disparate phenomena."),
        ("Includer", "You accept others. You show awareness of those who feel left out and make an effort to include them."),
        ("Individualization", "You are intrigued with the unique qualities of each person. You have a gift for figuring out how different people can work together productively."),
        ("Input", "You have a need to collect and archive. You may accumulate information, ideas, artifacts or even relationships."),
        ("Intellection", "You are characterized by your intellectual activity. You are introspective and appreciate intellectual discussions."),
        ("Learner", "You have a great desire to learn and want to continuously improve. The process of learning, rather than the outcome, excites you."),
        ("Maximizer", "You focus on strengths as a way to stimulate personal and group excellence. You seek to transform something strong into something superb."),
        ("Positivity", "You have contagious enthusiasm. You are upbeat and can get others excited about what they are going to do."),
        ("Relator", "You enjoy close relationships with others. You find deep satisfaction in working hard with friends to achieve a goal."),
        ("Responsibility", "You take psychological ownership of what you say you will do. You are committed to stable values such as honesty and loyalty."),
        ("Restorative", "You are adept at dealing with problems. You are good at figuring out what is wrong and resolving it."),
        ("Self-Assurance", "You feel confident in your ability to take risks and manage your own life. You have an inner compass that gives you certainty in your decisions."),
        ("Significance", "You want to make a big impact. You are independent and prioritize projects based on how much influence they will have on your organization or the people around you."),
        ("Strategic", "You create alternative ways to proceed. Faced with any given scenario, you can quickly spot the relevant patterns and issues."),
        ("Woo", "You love the challenge of meeting new people and winning them over. You derive satisfaction from breaking the ice and making a connection with someone."),
    ]
    .into_iter()
    .collect()
});

/// Lowercase name -> canonical name, for case-insensitive lookup.
static CANONICAL_BY_LOWER: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    CANONICAL_NAMES
        .iter()
        .map(|(name, _)| (name.to_lowercase(), *name))
        .collect()
});

/// Normalizes a raw captured name: strips trademark glyphs and whitespace,
/// folds hyphenation variants of Self-Assurance.
pub fn normalize_name(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|c| *c != '\u{00AE}' && *c != '\u{2122}').collect();
    let trimmed = cleaned.trim();
    match trimmed {
        "SelfAssurance" | "Self Assurance" => "Self-Assurance".to_string(),
        other => other.to_string(),
    }
}

/// Returns the canonical spelling for a name, matching case-insensitively
/// after normalization. `None` when the name is not one of the 34 themes.
pub fn canonical_name(raw: &str) -> Option<&'static str> {
    let normalized = normalize_name(raw);
    CANONICAL_BY_LOWER.get(&normalized.to_lowercase()).copied()
}

/// Whether a (normalized) name is one of the 34 canonical strengths.
pub fn is_canonical(name: &str) -> bool {
    canonical_name(name).is_some()
}

/// Maps a canonical name to its domain.
///
/// The extractor only ever passes canonical names; an unknown name here is a
/// programming error. Falls back to Strategic Thinking with a warning so a
/// single bad token cannot abort an otherwise successful parse.
pub fn domain_for(name: &str) -> StrengthDomain {
    match DOMAIN_MAP.get(name) {
        Some(domain) => *domain,
        None => {
            tracing::warn!(strength = name, "unknown strength name, defaulting domain");
            StrengthDomain::StrategicThinking
        }
    }
}

/// Reference description text for a canonical strength name.
pub fn description_for(name: &str) -> Option<&'static str> {
    DESCRIPTIONS.get(name).copied()
}
