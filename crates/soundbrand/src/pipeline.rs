//! Strategy pipeline: orchestrates the five prompt calls.
//!
//! Brand analysis and the sonic brief run one after the other; the brief is
//! built from the finished analysis. Track ranking, the licensing plan and
//! the generative-music prompt then run concurrently and are joined
//! fail-fast. Any failure fails the whole run.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use llm::{AIMessage, AIProvider, GenerateOptions};

use crate::catalog::Catalog;
use crate::config::{PipelineOptions, StrategyConfig};
use crate::error::{PipelineStep, StrategyError, StrategyResult};
use crate::models::{
    note_prefix, validate_budget, BrandAnalysis, BrandInputs, FullAnalysisResult, LicensingParams,
    LicensingPlan, SonicBrief, TrackRecommendations,
};
use crate::prompts::{
    format_amount, AnalyzeBrandContext, GenAiPromptContext, LicensingPlanContext, PromptManager,
    RankTracksContext, SonicBriefContext,
};

/// Substituted when the model returns no generative-music prompt.
pub const FALLBACK_GEN_AI_PROMPT: &str = "Cinematic ambient corporate build up, 120bpm";

/// How many ranked tracks the model is asked for.
pub const MAX_RANKED_TRACKS: usize = 15;

/// Strategy pipeline orchestrator.
pub struct StrategyPipeline {
    provider: Arc<dyn AIProvider>,
    prompts: PromptManager,
    catalog: Catalog,
    options: PipelineOptions,
}

impl StrategyPipeline {
    /// Create a pipeline over an injected provider, using the built-in
    /// catalog.
    pub fn new(provider: Arc<dyn AIProvider>, options: PipelineOptions) -> StrategyResult<Self> {
        Ok(Self {
            provider,
            prompts: PromptManager::new()?,
            catalog: Catalog::builtin().clone(),
            options,
        })
    }

    /// Create a pipeline backed by the provider described in `config`.
    pub fn from_config(config: &StrategyConfig) -> StrategyResult<Self> {
        Self::new(config.build_provider()?, config.options.clone())
    }

    /// Run all five steps and assemble the combined result.
    pub async fn generate_full_strategy(
        &self,
        inputs: &BrandInputs,
        budget: u32,
        params: &LicensingParams,
    ) -> StrategyResult<FullAnalysisResult> {
        let started = Instant::now();
        tracing::info!(
            brand = %inputs.brand_name,
            budget,
            usage = %params.usage,
            term = %params.term,
            territory = %params.territory,
            model = %self.options.model,
            "Starting strategy pipeline"
        );

        let brand_analysis = self.analyze_brand(inputs, budget, params).await?;
        let sonic_brief = self.create_sonic_brief(&brand_analysis).await?;

        let (track_recommendations, licensing_plan, gen_ai_prompt) = tokio::try_join!(
            self.rank_tracks(&sonic_brief, &brand_analysis),
            self.create_licensing_plan(&brand_analysis, &sonic_brief),
            self.generate_ai_prompt(&sonic_brief),
        )?;

        tracing::info!(
            brand = %brand_analysis.brand_name,
            tracks = track_recommendations.commercial.len(),
            recommended_route = %licensing_plan.recommended_route,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Strategy pipeline complete"
        );

        Ok(FullAnalysisResult {
            brand_analysis,
            sonic_brief,
            track_recommendations,
            licensing_plan,
            gen_ai_prompt: Some(gen_ai_prompt),
        })
    }

    /// Step 1: infer archetype, tone, comparison brands and placements.
    pub async fn analyze_brand(
        &self,
        inputs: &BrandInputs,
        budget: u32,
        params: &LicensingParams,
    ) -> StrategyResult<BrandAnalysis> {
        let step = PipelineStep::AnalyzeBrand;
        inputs.validate()?;
        validate_budget(budget)?;

        let context = AnalyzeBrandContext {
            brand_name: &inputs.brand_name,
            industry: &inputs.industry,
            description: &inputs.description,
            values: &inputs.values,
            reference: inputs.reference_or_none(),
            usage: params.usage.label(),
            term: params.term.label(),
            term_months: params.term.months(),
            territory: params.territory.label(),
            budget: budget.to_string(),
        };
        let prompt = self.prompts.render(step, &context)?;

        let mut value = self.complete_json(step, prompt).await?;
        pin_user_choices(&mut value, budget, params);

        let analysis: BrandAnalysis = decode(step, value)?;
        analysis
            .validate()
            .map_err(|reason| StrategyError::validation(step, reason))?;

        Ok(analysis)
    }

    /// Step 2: derive the sonic brief from the finished analysis.
    pub async fn create_sonic_brief(&self, analysis: &BrandAnalysis) -> StrategyResult<SonicBrief> {
        let step = PipelineStep::SonicBrief;
        let prompt = self.prompts.render(step, &SonicBriefContext { analysis })?;

        let value = self.complete_json(step, prompt).await?;
        let brief: SonicBrief = decode(step, value)?;
        brief
            .validate()
            .map_err(|reason| StrategyError::validation(step, reason))?;

        Ok(brief)
    }

    /// Step 3: score catalog tracks against the brief.
    ///
    /// The model only returns ids with scores and reasons; those are
    /// hydrated onto the catalog records.
    pub async fn rank_tracks(
        &self,
        brief: &SonicBrief,
        analysis: &BrandAnalysis,
    ) -> StrategyResult<TrackRecommendations> {
        let step = PipelineStep::RankTracks;
        let context = RankTracksContext {
            brief,
            analysis,
            candidates: self.catalog.candidates(),
            max_results: MAX_RANKED_TRACKS,
        };
        let prompt = self.prompts.render(step, &context)?;

        let value = self.complete_json(step, prompt).await?;
        let deltas = commercial_deltas(&value)
            .map_err(|reason| StrategyError::validation(step, reason))?;

        let tracks = self
            .catalog
            .hydrate(deltas)
            .map_err(|reason| StrategyError::validation(step, reason))?;

        tracing::debug!(
            returned = deltas.len(),
            hydrated = tracks.len(),
            "Hydrated ranked tracks"
        );

        Ok(TrackRecommendations::commercial_only(tracks))
    }

    /// Step 4: compare licensing routes against the budget.
    pub async fn create_licensing_plan(
        &self,
        analysis: &BrandAnalysis,
        brief: &SonicBrief,
    ) -> StrategyResult<LicensingPlan> {
        let step = PipelineStep::LicensingPlan;
        let params = analysis.usage.params();
        let context = LicensingPlanContext {
            usage: params.usage.label(),
            term: params.term.label(),
            territory: params.territory.label(),
            budget: format_amount(analysis.budget_eur),
            brief,
            note_prefix: note_prefix(&params),
        };
        let prompt = self.prompts.render(step, &context)?;

        let value = self.complete_json(step, prompt).await?;
        let plan: LicensingPlan = decode(step, value)?;
        plan.validate()
            .map_err(|reason| StrategyError::validation(step, reason))?;

        self.check_plan_conventions(&plan, &params)?;
        Ok(plan)
    }

    /// Step 5: a free-text prompt for generative-music tools.
    pub async fn generate_ai_prompt(&self, brief: &SonicBrief) -> StrategyResult<String> {
        let step = PipelineStep::GenAiPrompt;
        let prompt = self.prompts.render(step, &GenAiPromptContext { brief })?;

        let text = self.complete(step, prompt, false).await?;
        let text = text.trim();
        if text.is_empty() {
            tracing::info!("Model returned no generative prompt, using fallback");
            return Ok(FALLBACK_GEN_AI_PROMPT.to_string());
        }

        Ok(text.to_string())
    }

    /// The pricing rules, best-budget-fit rule and note template are only
    /// instructions to the model. Violations are logged; pricing
    /// violations fail the step when strict pricing is on.
    fn check_plan_conventions(
        &self,
        plan: &LicensingPlan,
        params: &LicensingParams,
    ) -> StrategyResult<()> {
        let step = PipelineStep::LicensingPlan;

        let violations = plan.pricing_violations();
        for violation in &violations {
            tracing::warn!(%violation, "Licensing plan breaks pricing rule");
        }
        if self.options.strict_pricing && !violations.is_empty() {
            let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
            return Err(StrategyError::validation(step, reasons.join("; ")));
        }

        if let Some(best) = plan.best_budget_fit() {
            if best != plan.recommended_route {
                tracing::warn!(
                    recommended = %plan.recommended_route,
                    best_fit = %best,
                    budget = plan.budget_eur,
                    "Recommended route is not the best budget fit"
                );
            }
        }

        if !plan.follows_note_template(params) {
            tracing::warn!(
                note = plan.headline_note().unwrap_or_default(),
                "First licensing note does not follow the template"
            );
        }

        Ok(())
    }

    async fn complete(
        &self,
        step: PipelineStep,
        prompt: String,
        json_mode: bool,
    ) -> StrategyResult<String> {
        let messages = vec![
            AIMessage::system(PromptManager::system_prompt(step)),
            AIMessage::user(prompt),
        ];
        let options = GenerateOptions {
            json_mode,
            ..Default::default()
        };

        let started = Instant::now();
        tracing::debug!(%step, model = %self.options.model, "Sending completion request");

        let response = self
            .provider
            .generate_text(&self.options.model, &messages, &options)
            .await
            .map_err(|e| {
                tracing::warn!(%step, error = %e, "Completion request failed");
                StrategyError::from_llm(step, e)
            })?;

        tracing::info!(
            %step,
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Step complete"
        );

        Ok(response.text)
    }

    async fn complete_json(&self, step: PipelineStep, prompt: String) -> StrategyResult<Value> {
        let text = self.complete(step, prompt, true).await?;
        llm::parse_json_text(&text).map_err(|e| {
            tracing::warn!(%step, raw = %text, "AI response was not valid JSON");
            StrategyError::from_llm(step, e)
        })
    }
}

/// Map well-formed JSON onto a typed record.
fn decode<T: DeserializeOwned>(step: PipelineStep, value: Value) -> StrategyResult<T> {
    serde_json::from_value(value).map_err(|e| StrategyError::validation(step, e.to_string()))
}

/// The `track_recommendations.commercial` list of a ranking reply.
///
/// A missing or null list means the model found no matches.
fn commercial_deltas(value: &Value) -> Result<&[Value], String> {
    let recommendations = value
        .get("track_recommendations")
        .and_then(Value::as_object)
        .ok_or_else(|| "missing track_recommendations object".to_string())?;

    match recommendations.get("commercial") {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(format!("track_recommendations.commercial is not a list: {other}")),
    }
}

/// Overwrite the fixed choices echoed in a brand-analysis reply with what
/// the user entered.
///
/// Runs before decoding, so an echo the typed record would reject (an
/// unknown label, a fractional month count) never fails the step.
fn pin_user_choices(reply: &mut Value, budget: u32, params: &LicensingParams) {
    let Some(analysis) = reply.as_object_mut() else {
        return;
    };
    pin_field(analysis, "budget_eur", Value::from(budget));

    let Some(usage) = analysis.get_mut("usage").and_then(Value::as_object_mut) else {
        return;
    };
    pin_field(usage, "usage_type", Value::from(params.usage.label()));
    pin_field(usage, "term_length", Value::from(params.term.label()));
    pin_field(usage, "territory_scope", Value::from(params.territory.label()));
    pin_field(usage, "term_months", Value::from(params.term.months()));
}

fn pin_field(object: &mut Map<String, Value>, field: &str, expected: Value) {
    let unchanged = match (object.get(field), expected.as_f64()) {
        (Some(returned), Some(number)) => returned
            .as_f64()
            .is_some_and(|r| (r - number).abs() < f64::EPSILON),
        (Some(returned), None) => *returned == expected,
        (None, _) => false,
    };
    if !unchanged {
        tracing::warn!(
            field,
            returned = %object.get(field).unwrap_or(&serde_json::Value::Null),
            expected = %expected,
            "Brand analysis altered a fixed choice, restoring user choice"
        );
    }
    object.insert(field.to_string(), expected);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_commercial_deltas() {
        let value = json!({"track_recommendations": {"commercial": [{"id": "t1"}]}});
        assert_eq!(commercial_deltas(&value).unwrap().len(), 1);

        let value = json!({"track_recommendations": {}});
        assert!(commercial_deltas(&value).unwrap().is_empty());

        let value = json!({"track_recommendations": {"commercial": null}});
        assert!(commercial_deltas(&value).unwrap().is_empty());

        let value = json!({"track_recommendations": {"commercial": "t1"}});
        assert!(commercial_deltas(&value).is_err());

        let value = json!({"tracks": []});
        assert!(commercial_deltas(&value)
            .unwrap_err()
            .contains("track_recommendations"));
    }

    #[test]
    fn test_pin_user_choices_overwrites_echo() {
        let mut reply = json!({
            "brand_name": "Acme",
            "usage": {
                "placements": ["TV"],
                "term_months": 12.5,
                "usage_type": "Online Only (Social, OLV)",
                "term_length": "a year",
                "territory_scope": "Worldwide"
            },
            "budget_eur": 9_999.0
        });

        pin_user_choices(&mut reply, 10_000, &LicensingParams::default());

        assert_eq!(reply["budget_eur"], json!(10_000));
        assert_eq!(reply["usage"]["usage_type"], json!("Online Only"));
        assert_eq!(reply["usage"]["term_length"], json!("12 Months"));
        assert_eq!(reply["usage"]["territory_scope"], json!("Single Country"));
        assert_eq!(reply["usage"]["term_months"], json!(12));
        assert_eq!(reply["usage"]["placements"], json!(["TV"]));
    }

    #[test]
    fn test_pin_user_choices_ignores_other_shapes() {
        let mut reply = json!(["not", "an", "object"]);
        pin_user_choices(&mut reply, 10_000, &LicensingParams::default());
        assert_eq!(reply, json!(["not", "an", "object"]));

        // Missing usage is left for decoding to report.
        let mut reply = json!({"budget_eur": 10_000.0});
        pin_user_choices(&mut reply, 10_000, &LicensingParams::default());
        assert!(reply.get("usage").is_none());
        assert_eq!(reply["budget_eur"], json!(10_000));
    }
}
