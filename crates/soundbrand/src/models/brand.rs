//! Brand inputs, licensing parameters and the brand analysis record.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{StrategyError, StrategyResult};

/// Budget used when the user does not pick one, in euros.
pub const DEFAULT_BUDGET: u32 = 10_000;

/// Smallest accepted budget, in euros.
pub const MIN_BUDGET: u32 = 1_000;

/// Largest accepted budget, in euros.
pub const MAX_BUDGET: u32 = 100_000;

/// Free-text brand description entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandInputs {
    pub brand_name: String,
    #[serde(default)]
    pub industry: String,
    pub description: String,
    /// Brand values or vibe, comma separated or prose.
    #[serde(default)]
    pub values: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_link: Option<String>,
}

impl BrandInputs {
    /// Brand name and description are required; everything else is optional.
    pub fn validate(&self) -> StrategyResult<()> {
        if self.brand_name.trim().is_empty() {
            return Err(StrategyError::InvalidInput(
                "brand name must not be empty".to_string(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(StrategyError::InvalidInput(
                "description must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Reference link as shown in prompts.
    #[must_use]
    pub fn reference_or_none(&self) -> &str {
        self.reference_link
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("None")
    }
}

/// Reject budgets outside the range the front-end offers.
pub fn validate_budget(budget: u32) -> StrategyResult<()> {
    if (MIN_BUDGET..=MAX_BUDGET).contains(&budget) {
        Ok(())
    } else {
        Err(StrategyError::InvalidInput(format!(
            "budget €{budget} is outside the supported range €{MIN_BUDGET}-€{MAX_BUDGET}"
        )))
    }
}

/// Lowercase, treat `_`/`-` as spaces and collapse whitespace.
fn normalize_label(s: &str) -> String {
    s.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Where the music will be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum UsageScope {
    #[default]
    OnlineOnly,
    AllMedia,
}

impl UsageScope {
    /// Label as offered to the user.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            UsageScope::OnlineOnly => "Online Only",
            UsageScope::AllMedia => "All Media",
        }
    }
}

impl FromStr for UsageScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "online only" | "online" => Ok(UsageScope::OnlineOnly),
            "all media" => Ok(UsageScope::AllMedia),
            _ => Err(format!("unknown usage scope '{s}' (expected 'Online Only' or 'All Media')")),
        }
    }
}

/// Length of the licence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TermLength {
    ThreeMonths,
    SixMonths,
    #[default]
    TwelveMonths,
    TwentyFourMonths,
}

impl TermLength {
    /// Label as offered to the user.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TermLength::ThreeMonths => "3 Months",
            TermLength::SixMonths => "6 Months",
            TermLength::TwelveMonths => "12 Months",
            TermLength::TwentyFourMonths => "24 Months",
        }
    }

    #[must_use]
    pub fn months(self) -> u32 {
        match self {
            TermLength::ThreeMonths => 3,
            TermLength::SixMonths => 6,
            TermLength::TwelveMonths => 12,
            TermLength::TwentyFourMonths => 24,
        }
    }
}

impl FromStr for TermLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        let count = normalized
            .strip_suffix("months")
            .or_else(|| normalized.strip_suffix("month"))
            .unwrap_or(&normalized)
            .trim();
        match count {
            "3" => Ok(TermLength::ThreeMonths),
            "6" => Ok(TermLength::SixMonths),
            "12" => Ok(TermLength::TwelveMonths),
            "24" => Ok(TermLength::TwentyFourMonths),
            _ => Err(format!(
                "unknown term '{s}' (expected 3, 6, 12 or 24 Months)"
            )),
        }
    }
}

/// Geographic reach of the licence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TerritoryScope {
    #[default]
    SingleCountry,
    SingleContinent,
    Worldwide,
}

impl TerritoryScope {
    /// Label as offered to the user.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TerritoryScope::SingleCountry => "Single Country",
            TerritoryScope::SingleContinent => "Single Continent",
            TerritoryScope::Worldwide => "Worldwide",
        }
    }
}

impl FromStr for TerritoryScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "single country" | "country" => Ok(TerritoryScope::SingleCountry),
            "single continent" | "continent" => Ok(TerritoryScope::SingleContinent),
            "worldwide" | "world wide" | "global" => Ok(TerritoryScope::Worldwide),
            _ => Err(format!(
                "unknown territory '{s}' (expected 'Single Country', 'Single Continent' or 'Worldwide')"
            )),
        }
    }
}

macro_rules! label_conversions {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl TryFrom<String> for $ty {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.label().to_string()
            }
        }
    )*};
}

label_conversions!(UsageScope, TermLength, TerritoryScope);

/// The three licensing choices the user fixes before running the pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicensingParams {
    pub usage: UsageScope,
    pub term: TermLength,
    pub territory: TerritoryScope,
}

/// How and where the brand intends to use the music.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageDescriptor {
    /// Inferred placements, e.g. TV, Social, OLV.
    pub placements: Vec<String>,
    pub term_months: u32,
    pub geos: Vec<String>,
    pub usage_type: UsageScope,
    pub term_length: TermLength,
    pub territory_scope: TerritoryScope,
}

impl UsageDescriptor {
    /// The licensing parameters echoed back by the model.
    #[must_use]
    pub fn params(&self) -> LicensingParams {
        LicensingParams {
            usage: self.usage_type,
            term: self.term_length,
            territory: self.territory_scope,
        }
    }
}

/// Output of the analyze-brand step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandAnalysis {
    pub brand_name: String,
    pub industry: String,
    pub description: String,
    pub inferred_values: Vec<String>,
    /// Brand archetype, e.g. Explorer, Hero.
    pub archetype: String,
    pub tone_keywords: Vec<String>,
    pub comparison_brands: Vec<String>,
    pub usage: UsageDescriptor,
    pub budget_eur: f64,
    pub notes: String,
}

impl BrandAnalysis {
    pub fn validate(&self) -> Result<(), String> {
        if self.brand_name.trim().is_empty() {
            return Err("brand_name is empty".to_string());
        }
        if !self.budget_eur.is_finite() || self.budget_eur < 0.0 {
            return Err(format!("budget_eur {} is not a valid amount", self.budget_eur));
        }
        Ok(())
    }
}
