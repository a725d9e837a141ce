//! Brand-to-music strategy pipeline.
//!
//! This crate provides:
//! - Brand analysis and sonic brief generation via Gemini
//! - Track ranking against a built-in reference catalog
//! - Licensing route comparison against a budget
//! - A generative-music prompt derived from the brief
//! - A quick feasibility projection for interim display

pub mod catalog;
pub mod config;
pub mod error;
pub mod feasibility;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod report;

// Re-export main types
pub use catalog::Catalog;
pub use config::{PipelineOptions, StrategyConfig};
pub use error::{PipelineStep, StrategyError, StrategyResult};
pub use feasibility::{FeasibilityEstimate, ProjectedRoute};
pub use models::{
    BrandAnalysis, BrandInputs, FullAnalysisResult, LicensingParams, LicensingPlan, SonicBrief,
    Track, TrackRecommendations,
};
pub use pipeline::StrategyPipeline;
