//! Prompt template management.
//!
//! Each pipeline step has a fixed system prompt and a Handlebars user
//! template. Templates are embedded; HTML escaping is off because the output
//! goes to a language model, not a browser.

use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;

use crate::error::{PipelineStep, StrategyResult};
use crate::models::{BrandAnalysis, CandidateTrack, SonicBrief};

handlebars_helper!(json_helper: |value: Json| value.to_string());

/// Context for the analyze-brand prompt.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeBrandContext<'a> {
    pub brand_name: &'a str,
    pub industry: &'a str,
    pub description: &'a str,
    pub values: &'a str,
    /// Reference link, or "None"
    pub reference: &'a str,
    pub usage: &'static str,
    pub term: &'static str,
    pub term_months: u32,
    pub territory: &'static str,
    pub budget: String,
}

/// Context for the sonic-brief prompt.
#[derive(Debug, Clone, Serialize)]
pub struct SonicBriefContext<'a> {
    pub analysis: &'a BrandAnalysis,
}

/// Context for the rank-tracks prompt.
#[derive(Debug, Clone, Serialize)]
pub struct RankTracksContext<'a> {
    pub brief: &'a SonicBrief,
    pub analysis: &'a BrandAnalysis,
    pub candidates: Vec<CandidateTrack<'a>>,
    pub max_results: usize,
}

/// Context for the licensing-plan prompt.
#[derive(Debug, Clone, Serialize)]
pub struct LicensingPlanContext<'a> {
    pub usage: &'static str,
    pub term: &'static str,
    pub territory: &'static str,
    pub budget: String,
    pub brief: &'a SonicBrief,
    /// Fixed opening of the first note.
    pub note_prefix: String,
}

/// Context for the gen-ai-prompt prompt.
#[derive(Debug, Clone, Serialize)]
pub struct GenAiPromptContext<'a> {
    pub brief: &'a SonicBrief,
}

/// Format a euro amount without a trailing `.0` for whole numbers.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if amount.fract().abs() < f64::EPSILON && amount.abs() < 1e15 {
        format!("{amount:.0}")
    } else {
        format!("{amount:.2}")
    }
}

/// Manages Handlebars prompt templates.
pub struct PromptManager {
    handlebars: Handlebars<'static>,
}

impl PromptManager {
    /// Create a new prompt manager with embedded templates.
    pub fn new() -> StrategyResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.register_helper("json", Box::new(json_helper));

        for step in PipelineStep::all() {
            handlebars.register_template_string(step.template_name(), user_template(*step))?;
        }

        Ok(Self { handlebars })
    }

    /// Render the user prompt of a step with the given data.
    pub fn render<T: Serialize>(&self, step: PipelineStep, data: &T) -> StrategyResult<String> {
        Ok(self.handlebars.render(step.template_name(), data)?)
    }

    /// Fixed system prompt of a step.
    #[must_use]
    pub fn system_prompt(step: PipelineStep) -> &'static str {
        match step {
            PipelineStep::AnalyzeBrand => ANALYZE_BRAND_SYSTEM,
            PipelineStep::SonicBrief => SONIC_BRIEF_SYSTEM,
            PipelineStep::RankTracks => RANK_TRACKS_SYSTEM,
            PipelineStep::LicensingPlan => LICENSING_PLAN_SYSTEM,
            PipelineStep::GenAiPrompt => GEN_AI_PROMPT_SYSTEM,
        }
    }
}

fn user_template(step: PipelineStep) -> &'static str {
    match step {
        PipelineStep::AnalyzeBrand => ANALYZE_BRAND_TEMPLATE,
        PipelineStep::SonicBrief => SONIC_BRIEF_TEMPLATE,
        PipelineStep::RankTracks => RANK_TRACKS_TEMPLATE,
        PipelineStep::LicensingPlan => LICENSING_PLAN_TEMPLATE,
        PipelineStep::GenAiPrompt => GEN_AI_PROMPT_TEMPLATE,
    }
}

const ANALYZE_BRAND_SYSTEM: &str = "You are an expert Brand Strategist.";

const SONIC_BRIEF_SYSTEM: &str = "You are an expert Music Supervisor.";

const RANK_TRACKS_SYSTEM: &str = "You are a Music Supervisor.";

const LICENSING_PLAN_SYSTEM: &str = "You are a Music Licensing Expert.";

const GEN_AI_PROMPT_SYSTEM: &str =
    "You write prompts for generative music AI tools such as Suno or Udio.";

/// Brand analysis prompt template.
const ANALYZE_BRAND_TEMPLATE: &str = r#"Analyze the following brand profile.

Input Profile:
- Brand Name: {{brand_name}}
- Industry: {{industry}}
- Description (What they do): {{description}}
- Brand Values / Vibe: {{values}}
- Reference: {{reference}}

Licensing Parameters (Fixed):
- Usage Scope: {{usage}}
- Term Length: {{term}}
- Territory: {{territory}}
- Budget Cap: €{{budget}}

Infer:
- Archetype (e.g. Explorer, Hero), Tone.
- Comparison Brands (Real world competitors or stylistic matches).
- Infer the placements (e.g. TV, Social, OLV) based on the Usage Scope provided.

Return strictly valid JSON.
Format:
{
  "brand_name": {{{json brand_name}}},
  "industry": {{{json industry}}},
  "description": {{{json description}}},
  "inferred_values": ["string"],
  "archetype": "string",
  "tone_keywords": ["string"],
  "comparison_brands": ["string"],
  "usage": {
    "placements": ["string"],
    "term_months": {{term_months}},
    "geos": ["string"],
    "usage_type": "{{usage}}",
    "term_length": "{{term}}",
    "territory_scope": "{{territory}}"
  },
  "budget_eur": {{budget}},
  "notes": "string"
}
"#;

/// Sonic brief prompt template.
const SONIC_BRIEF_TEMPLATE: &str = r#"Create a highly detailed Sonic Brief based on this Brand Analysis:
{{{json analysis}}}

Principles:
- Modern, clean production.
- Tech-forward, commercial aesthetic.
- Avoid retro unless specified in values.
- Lyrics must be sync-friendly.

Return strictly valid JSON.
Format:
{
  "overall_mood": ["string"],
  "energy": "low" | "medium_low" | "medium" | "medium_high" | "high",
  "valence": "negative" | "neutral" | "positive" | "high",
  "bpm_range": [number, number],
  "keys": ["string"],
  "instrumentation": ["string"],
  "genres": ["string"],
  "vocal_style": "string",
  "lyric_themes": ["string"],
  "sync_contexts": ["string"],
  "must_avoid": {
    "feel": ["string"],
    "lyrics": ["string"]
  }
}
"#;

/// Track ranking prompt template.
const RANK_TRACKS_TEMPLATE: &str = r#"Context:
Sonic Brief: {{{json brief}}}
Brand Analysis: {{{json analysis}}}

Task: Analyze these candidate tracks and select fits for a "Spotify Reference Playlist". Score them (0.0-1.0).
Candidate Tracks: {{{json candidates}}}

Return strictly valid JSON:
{
  "track_recommendations": {
    "commercial": [{ "id": "string", "sync_fit_score": number, "fit_reasons": ["string"] }]
  }
}

Filter logic:
- Return top {{max_results}} matches.
- Be generous with scoring if the mood fits generally.
"#;

/// Licensing plan prompt template.
const LICENSING_PLAN_TEMPLATE: &str = r#"Create a strategic Licensing Plan based on the user's strict requirements.

USER REQUIREMENTS:
- Usage Scope: {{usage}}
- Term: {{term}}
- Territory: {{territory}}
- User Budget Limit: €{{budget}}

Sonic Brief (for context): {{{json brief}}}

CALCULATION LOGIC (Using PRS/MCPS 2025 Rate Card Estimates):
1. Calculate the "Market Value" for the requested Usage/Term/Territory.
2. Compare Market Value to User Budget.

CRITICAL PRICING RULES:
1. "Indie" Route and "Bespoke" Route MUST have the SAME pricing range. Do not make Bespoke more expensive.
2. "Known Artist" is the most expensive.
3. "Library" is the least expensive.

FORMATTING RULES:
1. The "recommended_route" MUST be the one that fits the budget best.
2. The first item in "notes" MUST strictly follow this format:
   "{{note_prefix}} [INSERT ROUTE HERE] route. Prices average around €[INSERT AVERAGE]..."

Return strictly valid JSON:
{
  "budget_eur": {{budget}},
  "routes": [
    {
      "route": "Library" | "Indie" | "Bespoke" | "KnownArtist",
      "est_cost_range": [min, max],
      "risk": "low" | "medium" | "high",
      "time_to_clear_days": number,
      "use_cases": ["string"],
      "pros": ["string"],
      "cons": ["string"]
    }
  ],
  "recommended_route": "string",
  "notes": ["string"]
}
"#;

/// Generative-music prompt template.
const GEN_AI_PROMPT_TEMPLATE: &str = r"Create a highly optimized prompt for a generative music AI (like Suno or Udio) based on this sonic brief.
Brief: {{{json brief}}}

The prompt should be concise, listing genres, key instruments, mood, and bpm.
Output just the prompt string.
";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_templates_register() {
        assert!(PromptManager::new().is_ok());
    }

    #[test]
    fn test_values_are_not_html_escaped() {
        let prompts = PromptManager::new().unwrap();
        let rendered = prompts
            .render(
                PipelineStep::AnalyzeBrand,
                &json!({
                    "brand_name": "Tom & Jerry's",
                    "industry": "Snacks",
                    "description": "Cheese \"for everyone\"",
                    "values": "<fun>",
                    "reference": "None",
                    "usage": "Online Only",
                    "term": "12 Months",
                    "term_months": 12,
                    "territory": "Single Country",
                    "budget": 10000
                }),
            )
            .unwrap();

        assert!(rendered.contains("- Brand Name: Tom & Jerry's"));
        assert!(rendered.contains("- Brand Values / Vibe: <fun>"));
        // JSON-embedded values are properly quoted
        assert!(rendered.contains(r#""description": "Cheese \"for everyone\"""#));
        assert!(rendered.contains("- Budget Cap: €10000"));
        assert!(rendered.contains(r#""usage_type": "Online Only""#));
    }

    #[test]
    fn test_json_helper_embeds_compact_json() {
        let prompts = PromptManager::new().unwrap();
        let rendered = prompts
            .render(
                PipelineStep::GenAiPrompt,
                &json!({ "brief": { "genres": ["indie pop"], "bpm_range": [110, 120] } }),
            )
            .unwrap();
        assert!(rendered.contains("Brief: {"));
        assert!(rendered.contains(r#""genres":["indie pop"]"#));
        assert!(rendered.contains(r#""bpm_range":[110,120]"#));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(10_000.0), "10000");
        assert_eq!(format_amount(2_499.5), "2499.50");
    }

    #[test]
    fn test_system_prompts_are_distinct() {
        let mut prompts: Vec<&str> = PipelineStep::all()
            .iter()
            .map(|s| PromptManager::system_prompt(*s))
            .collect();
        prompts.sort_unstable();
        prompts.dedup();
        assert_eq!(prompts.len(), PipelineStep::all().len());
    }
}
