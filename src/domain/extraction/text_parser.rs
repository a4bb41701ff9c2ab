//! Regex pipeline over extracted report text.
//!
//! Pure functions: text in, `(name, date, strengths)` out. Name and date
//! extraction degrade gracefully to placeholders; the strengths list is the
//! only hard requirement.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::foundation::Timestamp;
use crate::domain::strengths::{canonical_name, Strength, StrengthProfile, CANONICAL_NAMES};

use super::error::ExtractionError;

/// Phrases that mark a document as a CliftonStrengths report.
const REPORT_INDICATORS: [&str; 8] = [
    "cliftonstrengths",
    "strengthsfinder",
    "gallup",
    "top 5",
    "executing",
    "influencing",
    "relationship building",
    "strategic thinking",
];

/// ALL-CAPS name followed by a pipe and a numeric date, the header layout
/// of full Gallup reports: `AMYN PORBANDERWALA | 08-08-2025`.
static CAPS_NAME_WITH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]+\s+[A-Z]+)\s*\|\s*\d{2}-\d{2}-\d{4}").unwrap());

/// Top 5 report heading: `Top 5 for Amyn Porbanderwala`.
static TOP_FIVE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Top 5 for\s+([A-Z][a-z]+\s+[A-Z][a-z]+)").unwrap());

/// Proper-case name before a numeric date.
static NAME_WITH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][a-z]+\s+[A-Z][a-z]+)\s*\|\s*\d{2}-\d{2}-\d{4}").unwrap());

/// A line that is exactly a two-word proper-case name.
static NAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([A-Z][a-z]+\s+[A-Z][a-z]+)\s*$").unwrap());

/// Characters allowed in a human name.
static NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s'\-]+$").unwrap());

static DATE_DMY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{2})-(\d{2})-(\d{4})\b").unwrap());
static DATE_YMD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").unwrap());
static DATE_MDY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").unwrap());

/// Numbered list entry: `1. Achiever`, optionally with a trademark glyph.
static NUMBERED_STRENGTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\.\s*([A-Za-z\-]+)(?:\s*[\u{00AE}\u{2122}])?").unwrap()
});

/// Placeholder when no plausible name can be found.
pub const UNKNOWN_USER: &str = "Unknown User";

/// Checks whether the text carries any report indicator phrase.
pub fn is_strengths_report(text: &str) -> bool {
    let lower = text.to_lowercase();
    REPORT_INDICATORS.iter().any(|i| lower.contains(i))
}

/// Extracts the report owner's name.
///
/// Tries header patterns in order of specificity; every candidate must
/// still look like a human name. Falls back to a placeholder instead of
/// failing.
pub fn extract_user_name(text: &str) -> String {
    if let Some(caps) = CAPS_NAME_WITH_DATE.captures(text) {
        let name = caps[1].trim().to_string();
        if looks_like_name(&name) {
            return to_proper_case(&name);
        }
    }

    if let Some(caps) = TOP_FIVE_HEADING.captures(text) {
        return caps[1].trim().to_string();
    }

    for pattern in [&NAME_WITH_DATE, &NAME_LINE] {
        if let Some(caps) = pattern.captures(text) {
            let name = caps[1].trim().to_string();
            if looks_like_name(&name) {
                return name;
            }
        }
    }

    UNKNOWN_USER.to_string()
}

/// "looks like a human name": two or more words, at most 50 characters,
/// only letters, spaces, hyphens, and apostrophes.
fn looks_like_name(candidate: &str) -> bool {
    candidate.split_whitespace().count() >= 2
        && candidate.len() <= 50
        && NAME_CHARS.is_match(candidate)
}

/// `AMYN PORBANDERWALA` -> `Amyn Porbanderwala`.
fn to_proper_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the assessment date, defaulting to now when nothing parses.
///
/// Gallup exports dates as `DD-MM-YYYY`; ISO `YYYY-MM-DD` and US
/// `M/D/YYYY` appear in older reports. No plausibility validation is done
/// on the parsed date.
pub fn extract_assessment_date(text: &str) -> Timestamp {
    if let Some(caps) = DATE_DMY.captures(text) {
        let (day, month, year) = (parse_u32(&caps[1]), parse_u32(&caps[2]), parse_i32(&caps[3]));
        if let Some(ts) = Timestamp::from_ymd(year, month, day) {
            return ts;
        }
    }

    if let Some(caps) = DATE_YMD.captures(text) {
        let (year, month, day) = (parse_i32(&caps[1]), parse_u32(&caps[2]), parse_u32(&caps[3]));
        if let Some(ts) = Timestamp::from_ymd(year, month, day) {
            return ts;
        }
    }

    if let Some(caps) = DATE_MDY.captures(text) {
        let (month, day, year) = (parse_u32(&caps[1]), parse_u32(&caps[2]), parse_i32(&caps[3]));
        if let Some(ts) = Timestamp::from_ymd(year, month, day) {
            return ts;
        }
    }

    Timestamp::now()
}

fn parse_u32(s: &str) -> u32 {
    s.parse().unwrap_or(0)
}

fn parse_i32(s: &str) -> i32 {
    s.parse().unwrap_or(0)
}

/// Extracts ranked strengths from report text.
///
/// Pass 1 scans numbered entries (`3. Focus`); only canonical names are
/// accepted and the first occurrence of each name wins. Pass 2 runs only
/// when pass 1 finds nothing: short lines are scanned for canonical names
/// as case-insensitive substrings, ranked in first-seen order.
pub fn extract_strengths(text: &str) -> Vec<Strength> {
    let mut strengths: Vec<Strength> = Vec::new();
    let mut seen: Vec<&'static str> = Vec::new();

    for caps in NUMBERED_STRENGTH.captures_iter(text) {
        let rank: u32 = match caps[1].parse() {
            Ok(r) => r,
            Err(_) => continue,
        };
        let Some(name) = canonical_name(&caps[2]) else {
            continue;
        };
        if seen.contains(&name) {
            continue;
        }
        let has_trademark = caps[0].contains('\u{00AE}') || caps[0].contains('\u{2122}');
        strengths.push(Strength::from_catalog(name, rank, has_trademark));
        seen.push(name);
    }

    if strengths.is_empty() {
        for name in strengths_from_lines(text) {
            let rank = strengths.len() as u32 + 1;
            strengths.push(Strength::from_catalog(name, rank, false));
        }
    }

    strengths.sort_by_key(|s| s.rank);
    strengths
}

/// Pass 2: canonical names appearing on short lines, first-seen order.
fn strengths_from_lines(text: &str) -> Vec<&'static str> {
    let mut found: Vec<&'static str> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        // Long lines are prose or descriptions, not list entries.
        if trimmed.is_empty() || trimmed.len() > 50 {
            continue;
        }
        let lower = trimmed.to_lowercase();
        for (name, _) in CANONICAL_NAMES {
            if lower.contains(&name.to_lowercase()) {
                if !found.contains(&name) {
                    found.push(name);
                }
                break;
            }
        }
    }

    found
}

/// Full regex pipeline: text -> profile.
///
/// Partial results are total failures: a name without strengths yields
/// `ExtractionFailed`, never a half-populated profile.
pub fn parse_report(text: &str) -> Result<StrengthProfile, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyOrUnreadablePdf);
    }
    if !is_strengths_report(text) {
        return Err(ExtractionError::NotAStrengthsReport);
    }

    let strengths = extract_strengths(text);
    if strengths.is_empty() {
        return Err(ExtractionError::ExtractionFailed);
    }

    let name = extract_user_name(text);
    let date = extract_assessment_date(text);
    Ok(StrengthProfile::assemble(name, date, strengths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strengths::{ReportFormat, StrengthDomain};

    const TOP_FIVE_TEXT: &str = "CliftonStrengths Top 5 for Amyn Porbanderwala\n\
        1. Achiever\n2. Strategic\n3. Focus\n4. Responsibility\n5. Learner\n";

    #[test]
    fn detects_report_indicators() {
        assert!(is_strengths_report("Your CliftonStrengths 34 Results"));
        assert!(is_strengths_report("gallup strengthsfinder"));
        assert!(is_strengths_report("RELATIONSHIP BUILDING themes"));
        assert!(!is_strengths_report("Quarterly sales report"));
    }

    #[test]
    fn extracts_caps_header_name_proper_cased() {
        let text = "AMYN PORBANDERWALA | 08-08-2025\nCliftonStrengths";
        assert_eq!(extract_user_name(text), "Amyn Porbanderwala");
    }

    #[test]
    fn extracts_top_five_heading_name() {
        assert_eq!(extract_user_name(TOP_FIVE_TEXT), "Amyn Porbanderwala");
    }

    #[test]
    fn extracts_name_on_its_own_line() {
        let text = "CliftonStrengths Report\nJane Doe\n1. Learner\n";
        assert_eq!(extract_user_name(text), "Jane Doe");
    }

    #[test]
    fn falls_back_to_placeholder_name() {
        assert_eq!(extract_user_name("no names here at all"), UNKNOWN_USER);
    }

    #[test]
    fn rejects_overlong_name_candidates() {
        // A CAPS match that fails the name validation falls through.
        let text = "THISISAVERYLONGSHOUTYHEADERWORD ANOTHERLONGSHOUTYHEADERWORDHERE | 01-01-2025";
        assert_eq!(extract_user_name(text), UNKNOWN_USER);
    }

    #[test]
    fn date_dmy_parses_per_report_layout() {
        let ts = extract_assessment_date("AMYN PORBANDERWALA | 08-08-2025");
        assert_eq!(ts.date_string(), "2025-08-08");
        let ts = extract_assessment_date("completed 25-12-2024");
        assert_eq!(ts.date_string(), "2024-12-25");
    }

    #[test]
    fn date_ymd_and_mdy_parse() {
        assert_eq!(
            extract_assessment_date("date: 2024-03-09").date_string(),
            "2024-03-09"
        );
        assert_eq!(
            extract_assessment_date("date: 3/9/2024").date_string(),
            "2024-03-09"
        );
    }

    #[test]
    fn unparseable_date_defaults_to_now() {
        let before = Timestamp::now();
        let ts = extract_assessment_date("no date anywhere");
        assert!(ts >= before);
    }

    #[test]
    fn numbered_pass_extracts_in_rank_order() {
        let strengths = extract_strengths(TOP_FIVE_TEXT);
        let names: Vec<&str> = strengths.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Achiever", "Strategic", "Focus", "Responsibility", "Learner"]
        );
    }

    #[test]
    fn numbered_pass_skips_non_canonical_and_duplicates() {
        let text = "CliftonStrengths\n1. Achiever\n2. Procrastination\n3. Achiever\n4. Woo\n";
        let strengths = extract_strengths(text);
        let names: Vec<&str> = strengths.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Achiever", "Woo"]);
    }

    #[test]
    fn trademark_glyph_recorded_and_stripped() {
        let strengths = extract_strengths("1. Achiever\u{00AE}\n2. Strategic\u{2122}\n");
        assert_eq!(strengths[0].name, "Achiever");
        assert!(strengths[0].has_trademark_symbol);
        assert!(strengths[1].has_trademark_symbol);
    }

    #[test]
    fn line_scan_fallback_ranks_by_first_seen() {
        let text = "Gallup report\nYour themes\nEmpathy\nIdeation\nEmpathy again\nWoo\n";
        let strengths = extract_strengths(text);
        let names: Vec<&str> = strengths.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Empathy", "Ideation", "Woo"]);
        assert_eq!(strengths[0].rank, 1);
        assert_eq!(strengths[2].rank, 3);
    }

    #[test]
    fn line_scan_skips_long_lines() {
        let text = format!(
            "Gallup\n{} Empathy is one of many words in this very long descriptive sentence\n",
            "x".repeat(40)
        );
        assert!(extract_strengths(&text).is_empty());
    }

    #[test]
    fn parse_report_top_five_document() {
        let profile = parse_report(TOP_FIVE_TEXT).unwrap();
        assert_eq!(profile.format, ReportFormat::Top5);
        assert_eq!(profile.leading_domain, StrengthDomain::Executing);
        assert_eq!(profile.name, "Amyn Porbanderwala");
        let ranks: Vec<u32> = profile.strengths.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn parse_report_empty_text_fails() {
        let err = parse_report("   \n  ").unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyOrUnreadablePdf));
    }

    #[test]
    fn parse_report_non_report_fails() {
        let err = parse_report("An invoice for office chairs").unwrap_err();
        assert!(matches!(err, ExtractionError::NotAStrengthsReport));
    }

    #[test]
    fn parse_report_no_strengths_fails() {
        let err = parse_report("CliftonStrengths report with no theme list").unwrap_err();
        assert!(matches!(err, ExtractionError::ExtractionFailed));
    }

    #[test]
    fn parse_report_is_deterministic() {
        let a = parse_report(TOP_FIVE_TEXT).unwrap();
        let b = parse_report(TOP_FIVE_TEXT).unwrap();
        assert_eq!(a.strengths, b.strengths);
        assert_eq!(a.name, b.name);
        assert_eq!(a.leading_domain, b.leading_domain);
    }

    #[test]
    fn full_34_report_parses_completely() {
        let mut text = String::from("CliftonStrengths 34 Report\nJANE DOE | 01-02-2025\n");
        for (i, (name, _)) in crate::domain::strengths::CANONICAL_NAMES.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", i + 1, name));
        }
        let profile = parse_report(&text).unwrap();
        assert_eq!(profile.format, ReportFormat::Full34);
        assert_eq!(profile.len(), 34);
        assert_eq!(profile.domain_summary.len(), 4);
        let total: usize = profile.domain_summary.iter().map(|d| d.count).sum();
        assert_eq!(total, 34);
    }
}
