//! Prompt construction for the coaching conversation.
//!
//! The system prompt fixes the coach persona; the contextual prompt carries
//! the user's profile and the request-type-specific instructions. Both are
//! plain strings so the AI provider port stays prompt-agnostic.

use crate::domain::strengths::StrengthProfile;

use super::request::{CoachingRequest, CoachingRequestType};

/// Persona prompt sent as the system message on every coaching call.
///
/// The "never break character" instructions matter: without them the model
/// narrates its coaching strategy in bracketed asides, which the response
/// cleaner then has to strip.
pub const COACH_SYSTEM_PROMPT: &str = "\
You are an expert CliftonStrengths coach with 15+ years of experience. You help people unlock \
their potential through personalized, strengths-based coaching conversations.

CRITICAL: You must ALWAYS stay in character as a coach. NEVER include any meta-commentary, \
coaching strategy explanations, or bracketed notes about your approach in your responses. Your \
responses should read like natural conversation with a skilled coach.

Your deep expertise includes:
- Intimate knowledge of all 34 CliftonStrengths themes and their interactions
- Understanding how different combinations create unique patterns and potential
- Ability to spot patterns in how someone's strengths show up in their life
- Experience helping people apply their strengths to real challenges

Your coaching approach:
- Be genuinely curious and interested in their unique story
- Ask insightful questions that help them discover new perspectives about their strengths
- Reference their specific strengths by name and ranking
- Connect their strengths to their actual life and work situations
- Help them see how their themes work together as a system
- Guide them toward practical actions they can take

Conversation style:
- Natural, warm, and conversational - like talking to a trusted mentor
- Ask follow-up questions based on what they share
- Reference details from earlier in the conversation
- Vary your sentence structure and avoid formulaic responses
- Balance encouragement with gentle challenges
- End with thoughtful questions that deepen the exploration

Remember: You are having a conversation, not giving a lecture. Keep responses concise, \
engaging, and focused on THEIR story and growth. Never break character or explain your \
coaching methodology.";

/// Renders a profile into the context block prepended to coaching prompts.
pub fn profile_context(profile: &StrengthProfile) -> String {
    let top_five = profile
        .top_five
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {} ({})", i + 1, s.name, s.domain.display_name()))
        .collect::<Vec<_>>()
        .join("\n");
    let domains = profile
        .domain_summary
        .iter()
        .map(|d| format!("{}: {} strengths", d.domain.display_name(), d.count))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "User's CliftonStrengths Profile:\n\
         Name: {}\n\
         Assessment Date: {}\n\
         Format: {}\n\
         Leading Domain: {}\n\n\
         Top 5 Strengths:\n{}\n\n\
         Domain Distribution:\n{}\n\n",
        profile.name,
        profile.assessment_date.date_string(),
        profile.format.as_str(),
        profile.leading_domain.display_name(),
        top_five,
        domains,
    )
}

/// Builds the user-turn prompt for a coaching request.
pub fn build_contextual_prompt(request: &CoachingRequest) -> String {
    let mut prompt = String::new();

    if let Some(profile) = &request.profile {
        prompt.push_str(&profile_context(profile));
    }

    match request.request_type {
        CoachingRequestType::Summary => {
            prompt.push_str(
                "Please provide a comprehensive summary of this person's strengths profile, \
                 highlighting their key themes, dominant domains, and how their strengths work \
                 together.",
            );
        }
        CoachingRequestType::DeepDive => {
            prompt.push_str(&format!(
                "Please provide a deep dive analysis focusing on: \"{}\".\n\n\
                 Include:\n\
                 - How their top strengths relate to this topic\n\
                 - Specific strategies leveraging their strengths\n\
                 - Potential blind spots to watch for\n\
                 - Actionable next steps",
                request.message
            ));
        }
        CoachingRequestType::GrowthPlanning => {
            prompt.push_str(&format!(
                "Help create a growth plan based on their strengths profile. Focus area: \"{}\"\n\n\
                 Please include:\n\
                 - Strength-based development opportunities\n\
                 - Specific goals aligned with their top themes\n\
                 - Practical action steps\n\
                 - Ways to leverage existing strengths for growth",
                request.message
            ));
        }
        CoachingRequestType::GeneralChat => {
            prompt.push_str(&format!(
                "User question: \"{}\"\n\n\
                 Please provide personalized coaching advice based on their strengths profile.",
                request.message
            ));
        }
    }

    if let Some(context) = &request.context {
        prompt.push_str(&format!("\n\nAdditional Context: {context}"));
    }

    prompt
}

/// Builds the prompt for the structured profile analysis operation.
///
/// Unlike the conversational prompts this one asks for JSON, which the
/// analyze handler decodes with a text fallback.
pub fn build_analysis_prompt(profile: &StrengthProfile) -> String {
    let all_strengths = profile
        .strengths
        .iter()
        .map(|s| format!("{}. {} ({})", s.rank, s.name, s.domain.display_name()))
        .collect::<Vec<_>>()
        .join("\n");
    let total = profile.len() as f64;
    let domains = profile
        .domain_summary
        .iter()
        .map(|d| {
            format!(
                "{}: {} strengths ({:.1}%)",
                d.domain.display_name(),
                d.count,
                d.count as f64 / total * 100.0
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Please provide a comprehensive analysis of this CliftonStrengths profile:\n\n\
         Name: {}\n\
         Assessment Date: {}\n\
         Format: {}\n\n\
         All Strengths (in order):\n{}\n\n\
         Domain Distribution:\n{}\n\n\
         Please provide:\n\
         1. Personalized insights for each top 5 strength\n\
         2. Overall profile summary and key themes\n\
         3. Domain-specific analysis and leadership style\n\
         4. Growth opportunities and development recommendations\n\
         5. Potential blind spots or areas to watch\n\n\
         Format your response as structured JSON with the following fields:\n\
         - strengthInsights: array of insights for each top 5 strength\n\
         - summary: overall profile summary\n\
         - recommendations: array of development recommendations\n\
         - dominantDomains: array of domain analyses\n\
         - growthOpportunities: array of growth opportunities",
        profile.name,
        profile.assessment_date.date_string(),
        profile.format.as_str(),
        all_strengths,
        domains,
    )
}
