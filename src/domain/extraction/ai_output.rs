//! Schema-validated output of the AI extraction fallback.
//!
//! The model is asked for one exact JSON shape; everything here is about
//! refusing to trust it. Responses get their markdown fences stripped, the
//! JSON object located, decoded against a strict schema, and validated
//! before any of it reaches a `StrengthProfile`.

use serde::Deserialize;

use crate::domain::foundation::Timestamp;
use crate::domain::strengths::{canonical_name, Strength, StrengthProfile};

use super::error::ExtractionError;
use super::text_parser::UNKNOWN_USER;

/// JSON shape the extraction prompt asks the model to produce.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AiExtraction {
    pub user_name: String,
    #[serde(default)]
    pub assessment_date: Option<String>,
    #[serde(default)]
    pub report_type: Option<String>,
    pub strengths: Vec<AiStrength>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiStrength {
    pub name: String,
    pub rank: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl AiExtraction {
    /// Parses a raw model response into a validated extraction.
    ///
    /// Models wrap JSON in markdown fences or prose despite instructions,
    /// so the first balanced-looking `{...}` span is cut out before
    /// decoding.
    pub fn parse(raw: &str) -> Result<Self, ExtractionError> {
        let stripped = strip_markdown_fences(raw);
        let json = json_object_span(&stripped).ok_or_else(|| {
            ExtractionError::AiFallbackUnavailable("no JSON object in response".into())
        })?;

        let extraction: AiExtraction = serde_json::from_str(json).map_err(|e| {
            ExtractionError::AiFallbackUnavailable(format!("response failed schema: {e}"))
        })?;
        extraction.validate()?;
        Ok(extraction)
    }

    fn validate(&self) -> Result<(), ExtractionError> {
        if self.user_name.trim().is_empty() {
            return Err(ExtractionError::AiFallbackUnavailable(
                "missing user name".into(),
            ));
        }
        if self.strengths.is_empty() {
            return Err(ExtractionError::AiFallbackUnavailable(
                "empty strengths list".into(),
            ));
        }
        Ok(())
    }

    /// Converts the validated extraction into a profile.
    ///
    /// Non-canonical names are dropped rather than failing the whole
    /// response; if none survive, the fallback is treated as unavailable.
    pub fn into_profile(self) -> Result<StrengthProfile, ExtractionError> {
        let mut strengths: Vec<Strength> = Vec::new();
        let mut seen: Vec<&'static str> = Vec::new();

        for raw in &self.strengths {
            let Some(name) = canonical_name(&raw.name) else {
                tracing::warn!(name = %raw.name, "dropping non-canonical strength from AI output");
                continue;
            };
            if seen.contains(&name) {
                continue;
            }
            strengths.push(Strength::from_catalog(name, raw.rank, false));
            seen.push(name);
        }

        if strengths.is_empty() {
            return Err(ExtractionError::AiFallbackUnavailable(
                "no canonical strengths in response".into(),
            ));
        }

        let name = if self.user_name.trim().is_empty() {
            UNKNOWN_USER.to_string()
        } else {
            self.user_name.trim().to_string()
        };
        let date = self
            .assessment_date
            .as_deref()
            .map(super::text_parser::extract_assessment_date)
            .unwrap_or_else(Timestamp::now);

        Ok(StrengthProfile::assemble(name, date, strengths))
    }
}

/// Removes ```json / ``` fence lines, keeping the content between them.
pub(crate) fn strip_markdown_fences(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The span from the first `{` to the last `}`, when both exist in order.
pub(crate) fn json_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
