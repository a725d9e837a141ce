//! Data model shared by the pipeline and the CLI.

pub mod brand;
pub mod brief;
pub mod licensing;
pub mod result;
pub mod track;

pub use brand::{
    validate_budget, BrandAnalysis, BrandInputs, LicensingParams, TermLength, TerritoryScope,
    UsageDescriptor, UsageScope, DEFAULT_BUDGET, MAX_BUDGET, MIN_BUDGET,
};
pub use brief::{BpmRange, EnergyLevel, MustAvoid, SonicBrief, ValenceLevel};
pub use licensing::{
    note_prefix, CostRange, LicensingPlan, LicensingRoute, PricingViolation, RiskTier, RouteName,
};
pub use result::FullAnalysisResult;
pub use track::{CandidateTrack, Track, TrackRecommendations, TrackRoute, TrackSource, VocalCategory};
