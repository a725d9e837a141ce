//! Combined output of one pipeline run.

use serde::{Deserialize, Serialize};

use super::brand::BrandAnalysis;
use super::brief::SonicBrief;
use super::licensing::LicensingPlan;
use super::track::TrackRecommendations;

/// Everything the pipeline produces for one "Generate Strategy" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullAnalysisResult {
    pub brand_analysis: BrandAnalysis,
    pub sonic_brief: SonicBrief,
    pub track_recommendations: TrackRecommendations,
    pub licensing_plan: LicensingPlan,
    /// Prompt for external generative-music tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gen_ai_prompt: Option<String>,
}
