//! Error types for the strategy pipeline.

use std::fmt;

use llm::LlmError;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type StrategyResult<T> = Result<T, StrategyError>;

/// The five prompt calls of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStep {
    AnalyzeBrand,
    SonicBrief,
    RankTracks,
    LicensingPlan,
    GenAiPrompt,
}

impl PipelineStep {
    /// All steps in execution order.
    #[must_use]
    pub fn all() -> &'static [PipelineStep] {
        &[
            PipelineStep::AnalyzeBrand,
            PipelineStep::SonicBrief,
            PipelineStep::RankTracks,
            PipelineStep::LicensingPlan,
            PipelineStep::GenAiPrompt,
        ]
    }

    /// Name of the prompt template used by this step.
    #[must_use]
    pub fn template_name(self) -> &'static str {
        match self {
            PipelineStep::AnalyzeBrand => "analyze_brand",
            PipelineStep::SonicBrief => "sonic_brief",
            PipelineStep::RankTracks => "rank_tracks",
            PipelineStep::LicensingPlan => "licensing_plan",
            PipelineStep::GenAiPrompt => "gen_ai_prompt",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PipelineStep::AnalyzeBrand => "analyze-brand",
            PipelineStep::SonicBrief => "sonic-brief",
            PipelineStep::RankTracks => "rank-tracks",
            PipelineStep::LicensingPlan => "licensing-plan",
            PipelineStep::GenAiPrompt => "gen-ai-prompt",
        };
        write!(f, "{s}")
    }
}

/// Errors produced while building or running the strategy pipeline.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Required credential or setting is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// User input rejected before any request is made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model reply was not valid JSON after removing code fences.
    #[error("{step}: AI response was not valid JSON: {reason}")]
    Parse {
        step: PipelineStep,
        reason: String,
        raw: String,
    },

    /// Model reply was valid JSON but did not have the expected shape.
    #[error("{step}: AI response failed validation: {reason}")]
    Validation { step: PipelineStep, reason: String },

    /// The completion provider failed (network, quota, server error).
    #[error("{step}: completion request failed: {message}")]
    Transport { step: PipelineStep, message: String },

    /// Prompt template could not be registered or rendered.
    #[error("Prompt template error: {0}")]
    Template(String),
}

impl StrategyError {
    /// Attach a pipeline step to a provider error.
    pub fn from_llm(step: PipelineStep, err: LlmError) -> Self {
        match err {
            LlmError::ResponseParse { reason, raw } => Self::Parse { step, reason, raw },
            other => Self::Transport {
                step,
                message: other.to_string(),
            },
        }
    }

    /// Shorthand for a validation failure.
    pub fn validation(step: PipelineStep, reason: impl Into<String>) -> Self {
        Self::Validation {
            step,
            reason: reason.into(),
        }
    }

    /// Step that produced the error, if it came from the pipeline.
    #[must_use]
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            Self::Parse { step, .. } | Self::Validation { step, .. } | Self::Transport { step, .. } => {
                Some(*step)
            }
            _ => None,
        }
    }
}

impl From<handlebars::TemplateError> for StrategyError {
    fn from(err: handlebars::TemplateError) -> Self {
        Self::Template(err.to_string())
    }
}

impl From<handlebars::RenderError> for StrategyError {
    fn from(err: handlebars::RenderError) -> Self {
        Self::Template(err.to_string())
    }
}
