//! The strengths profile aggregate.
//!
//! A profile is assembled once from extractor output and immutable after
//! that. All derived views (top five, domain summary, leading domain) are
//! computed at assembly time so they can never drift from the strengths
//! list.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::strength::{Strength, StrengthDomain};

/// Report format, derived from how many strengths the report ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    #[serde(rename = "top5")]
    Top5,
    #[serde(rename = "top10")]
    Top10,
    #[serde(rename = "full34")]
    Full34,
}

impl ReportFormat {
    /// Derives the format from a strength count: >=30 is a full report,
    /// >=10 a Top-10 report, anything smaller Top-5.
    pub fn from_count(count: usize) -> Self {
        if count >= 30 {
            ReportFormat::Full34
        } else if count >= 10 {
            ReportFormat::Top10
        } else {
            ReportFormat::Top5
        }
    }

    /// Database/storage tag for the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Top5 => "top5",
            ReportFormat::Top10 => "top10",
            ReportFormat::Full34 => "full34",
        }
    }

    /// Parses a storage tag back into a format.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "top5" => Some(ReportFormat::Top5),
            "top10" => Some(ReportFormat::Top10),
            "full34" => Some(ReportFormat::Full34),
            _ => None,
        }
    }
}

/// Per-domain aggregate over a profile's strengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub domain: StrengthDomain,
    pub count: usize,
    /// Members of this domain within the profile, rank-ascending.
    pub strengths: Vec<Strength>,
}

/// Root aggregate: one parsed assessment for one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthProfile {
    pub name: String,
    pub assessment_date: Timestamp,
    pub format: ReportFormat,
    /// All strengths, rank-ascending with contiguous ranks 1..=len.
    pub strengths: Vec<Strength>,
    pub top_five: Vec<Strength>,
    /// Present only for Top-10 and full reports.
    pub top_ten: Option<Vec<Strength>>,
    /// Non-empty domains, sorted by count descending (ties by domain
    /// declaration order).
    pub domain_summary: Vec<DomainSummary>,
    /// Domain with the highest representation among the top five.
    pub leading_domain: StrengthDomain,
}

impl StrengthProfile {
    /// Assembles a profile from extractor output.
    ///
    /// `strengths` may arrive with arbitrary rank values; they are sorted by
    /// rank and renumbered to a contiguous 1..=len sequence. The input must
    /// be non-empty and deduplicated by name (the extractor guarantees
    /// both).
    pub fn assemble(
        name: String,
        assessment_date: Timestamp,
        mut strengths: Vec<Strength>,
    ) -> Self {
        strengths.sort_by_key(|s| s.rank);
        for (i, strength) in strengths.iter_mut().enumerate() {
            strength.rank = i as u32 + 1;
        }

        let format = ReportFormat::from_count(strengths.len());
        let top_five: Vec<Strength> =
            strengths.iter().take(5).cloned().collect();
        let top_ten = if strengths.len() >= 10 {
            Some(strengths.iter().take(10).cloned().collect())
        } else {
            None
        };
        let domain_summary = Self::summarize_domains(&strengths);
        let leading_domain = Self::leading_domain_of(&top_five);

        Self {
            name,
            assessment_date,
            format,
            strengths,
            top_five,
            top_ten,
            domain_summary,
            leading_domain,
        }
    }

    /// Groups strengths by domain into non-empty summaries, sorted by count
    /// descending with ties broken by domain declaration order.
    fn summarize_domains(strengths: &[Strength]) -> Vec<DomainSummary> {
        let mut summaries: Vec<DomainSummary> = StrengthDomain::ALL
            .iter()
            .filter_map(|domain| {
                let members: Vec<Strength> = strengths
                    .iter()
                    .filter(|s| s.domain == *domain)
                    .cloned()
                    .collect();
                if members.is_empty() {
                    None
                } else {
                    Some(DomainSummary {
                        domain: *domain,
                        count: members.len(),
                        strengths: members,
                    })
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.domain.order().cmp(&b.domain.order()))
        });
        summaries
    }

    /// Counts domains over the top five only; the highest count wins, with
    /// ties resolved to the earliest domain in declaration order.
    fn leading_domain_of(top_five: &[Strength]) -> StrengthDomain {
        let mut best = StrengthDomain::StrategicThinking;
        let mut best_count = 0usize;
        for domain in StrengthDomain::ALL {
            let count = top_five.iter().filter(|s| s.domain == domain).count();
            if count > best_count {
                best = domain;
                best_count = count;
            }
        }
        best
    }

    /// Total number of ranked strengths.
    pub fn len(&self) -> usize {
        self.strengths.len()
    }

    /// A profile is never empty; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::domain::strengths::catalog::CANONICAL_NAMES;

    fn strengths_named(names: &[&str]) -> Vec<Strength> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Strength::from_catalog(n, i as u32 + 1, false))
            .collect()
    }

    fn sample_profile() -> StrengthProfile {
        StrengthProfile::assemble(
            "Test User".to_string(),
            Timestamp::from_ymd(2025, 8, 8).unwrap(),
            strengths_named(&["Achiever", "Strategic", "Focus", "Responsibility", "Learner"]),
        )
    }

    #[test]
    fn format_thresholds() {
        assert_eq!(ReportFormat::from_count(5), ReportFormat::Top5);
        assert_eq!(ReportFormat::from_count(9), ReportFormat::Top5);
        assert_eq!(ReportFormat::from_count(10), ReportFormat::Top10);
        assert_eq!(ReportFormat::from_count(29), ReportFormat::Top10);
        assert_eq!(ReportFormat::from_count(30), ReportFormat::Full34);
        assert_eq!(ReportFormat::from_count(34), ReportFormat::Full34);
    }

    #[test]
    fn format_tag_round_trips() {
        for fmt in [ReportFormat::Top5, ReportFormat::Top10, ReportFormat::Full34] {
            assert_eq!(ReportFormat::parse(fmt.as_str()), Some(fmt));
        }
        assert_eq!(ReportFormat::parse("top99"), None);
    }

    #[test]
    fn assemble_renumbers_ranks_contiguously() {
        // Raw ranks with gaps, as a sparse numbered list might produce.
        let mut strengths = strengths_named(&["Achiever", "Strategic", "Focus"]);
        strengths[0].rank = 3;
        strengths[1].rank = 9;
        strengths[2].rank = 17;

        let profile = StrengthProfile::assemble(
            "Test".into(),
            Timestamp::now(),
            strengths,
        );

        let ranks: Vec<u32> = profile.strengths.iter().map(|s| s.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(profile.strengths[0].name, "Achiever");
        assert_eq!(profile.strengths[2].name, "Focus");
    }

    #[test]
    fn spec_scenario_leading_domain_executing() {
        // Achiever/Focus/Responsibility are Executing = 3 of top 5.
        let profile = sample_profile();
        assert_eq!(profile.leading_domain, StrengthDomain::Executing);
        assert_eq!(profile.format, ReportFormat::Top5);
        let top: Vec<&str> = profile.top_five.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            top,
            vec!["Achiever", "Strategic", "Focus", "Responsibility", "Learner"]
        );
    }

    #[test]
    fn top_five_is_prefix_of_strengths() {
        let profile = sample_profile();
        assert_eq!(profile.top_five.as_slice(), &profile.strengths[..5]);
    }

    #[test]
    fn top_ten_absent_for_short_reports() {
        assert!(sample_profile().top_ten.is_none());
    }

    #[test]
    fn full_report_has_all_domains_and_counts_sum() {
        let names: Vec<&str> = CANONICAL_NAMES.iter().map(|(n, _)| *n).collect();
        let profile = StrengthProfile::assemble(
            "Full Report".into(),
            Timestamp::now(),
            strengths_named(&names),
        );

        assert_eq!(profile.format, ReportFormat::Full34);
        assert_eq!(profile.domain_summary.len(), 4);
        let total: usize = profile.domain_summary.iter().map(|d| d.count).sum();
        assert_eq!(total, 34);
        assert_eq!(profile.top_ten.as_ref().map(Vec::len), Some(10));
    }

    #[test]
    fn domain_summary_sorted_by_count_then_declaration_order() {
        let profile = sample_profile();
        // Executing: 3, Strategic Thinking: 2.
        assert_eq!(profile.domain_summary[0].domain, StrengthDomain::Executing);
        assert_eq!(profile.domain_summary[0].count, 3);
        assert_eq!(
            profile.domain_summary[1].domain,
            StrengthDomain::StrategicThinking
        );
    }

    #[test]
    fn leading_domain_tie_breaks_to_declaration_order() {
        // 2 Executing, 2 Influencing, 1 other: Executing declared first.
        let profile = StrengthProfile::assemble(
            "Tie".into(),
            Timestamp::now(),
            strengths_named(&["Woo", "Command", "Achiever", "Focus", "Learner"]),
        );
        assert_eq!(profile.leading_domain, StrengthDomain::Executing);
    }

    #[test]
    fn domain_summary_members_sorted_by_rank() {
        let profile = sample_profile();
        for summary in &profile.domain_summary {
            let ranks: Vec<u32> = summary.strengths.iter().map(|s| s.rank).collect();
            let mut sorted = ranks.clone();
            sorted.sort_unstable();
            assert_eq!(ranks, sorted);
        }
    }

    proptest! {
        #[test]
        fn ranks_always_contiguous_and_counts_sum(
            count in 1usize..=34,
            seed in any::<u64>(),
        ) {
            // Pick `count` distinct names deterministically from the seed.
            let mut names: Vec<&str> =
                CANONICAL_NAMES.iter().map(|(n, _)| *n).collect();
            let mut state = seed;
            for i in (1..names.len()).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let j = (state % (i as u64 + 1)) as usize;
                names.swap(i, j);
            }
            names.truncate(count);

            let strengths = names
                .iter()
                .enumerate()
                .map(|(i, n)| Strength::from_catalog(n, (i as u32 + 1) * 7, false))
                .collect();
            let profile = StrengthProfile::assemble(
                "Prop".into(),
                Timestamp::now(),
                strengths,
            );

            let ranks: Vec<u32> = profile.strengths.iter().map(|s| s.rank).collect();
            prop_assert_eq!(ranks, (1..=count as u32).collect::<Vec<_>>());

            let total: usize = profile.domain_summary.iter().map(|d| d.count).sum();
            prop_assert_eq!(total, count);

            if count >= 5 {
                prop_assert_eq!(profile.top_five.as_slice(), &profile.strengths[..5]);
            }
        }
    }
}
