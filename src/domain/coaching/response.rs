//! Post-processing of model output into a coaching response.
//!
//! Despite the system prompt, models occasionally leak bracketed
//! meta-commentary or strategy preambles. Everything user-facing passes
//! through `clean_response`; streaming output additionally goes through
//! `StreamSanitizer`, a character-level bracket filter that can run before
//! the full response exists.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp};

use super::request::CoachingRequestType;

/// Bracketed spans, including across newlines.
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*?\]").unwrap());

/// Lines that narrate coaching strategy instead of coaching.
static STRATEGY_PREAMBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(This response aims to|I'm keeping|My approach here|The strategy is).*$")
        .unwrap()
});

/// Three-or-more consecutive blank-ish lines.
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").unwrap());

/// Bullet or numbered list markers.
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[-*\u{2022}]|\d+\.)\s+").unwrap());

const MAX_SUGGESTIONS: usize = 5;
const MAX_FOLLOW_UPS: usize = 3;

/// Strips meta-commentary and normalizes whitespace.
pub fn clean_response(raw: &str) -> String {
    let cleaned = BRACKETED.replace_all(raw, "");
    let cleaned = STRATEGY_PREAMBLE.replace_all(&cleaned, "");
    let cleaned = BLANK_RUNS.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}

/// A finished coaching turn as returned over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingResponse {
    pub response: String,
    /// Actionable items lifted from list markers in the response.
    pub suggestions: Vec<String>,
    pub session_id: SessionId,
    pub timestamp: Timestamp,
    #[serde(rename = "type")]
    pub request_type: CoachingRequestType,
    /// Questions the coach posed, for the client to offer as quick replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_questions: Option<Vec<String>>,
}

impl CoachingResponse {
    /// Builds a response from raw model output: cleans it, then lifts
    /// suggestions and follow-up questions out of the cleaned text.
    pub fn from_model_output(
        raw: &str,
        session_id: SessionId,
        request_type: CoachingRequestType,
    ) -> Self {
        let cleaned = clean_response(raw);
        let suggestions = extract_suggestions(&cleaned);
        let follow_ups = extract_follow_up_questions(&cleaned);

        Self {
            response: cleaned,
            suggestions,
            session_id,
            timestamp: Timestamp::now(),
            request_type,
            follow_up_questions: if follow_ups.is_empty() {
                None
            } else {
                Some(follow_ups)
            },
        }
    }
}

/// Lines carrying a bullet or numbered marker, marker stripped, capped at
/// five.
pub fn extract_suggestions(response: &str) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let stripped = LIST_MARKER.replace(trimmed, "");
            if stripped.len() < trimmed.len() && !stripped.trim().is_empty() {
                Some(stripped.trim().to_string())
            } else {
                None
            }
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Question lines (ending in `?`, long enough to be real questions),
/// capped at three.
pub fn extract_follow_up_questions(response: &str) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if trimmed.ends_with('?') && trimmed.len() > 10 {
                Some(trimmed.to_string())
            } else {
                None
            }
        })
        .take(MAX_FOLLOW_UPS)
        .collect()
}

/// Character-level bracket filter for streaming output.
///
/// Suppresses everything between `[` and `]` as chunks arrive; chunk
/// boundaries may fall inside a bracketed span, so the open-bracket state
/// persists across `feed` calls.
#[derive(Debug, Default)]
pub struct StreamSanitizer {
    in_bracket: bool,
}

impl StreamSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters one chunk, returning the characters safe to forward.
    pub fn feed(&mut self, chunk: &str) -> String {
        let mut out = String::with_capacity(chunk.len());
        for c in chunk.chars() {
            match c {
                '[' => self.in_bracket = true,
                ']' => self.in_bracket = false,
                _ if !self.in_bracket => out.push(c),
                _ => {}
            }
        }
        out
    }
}
