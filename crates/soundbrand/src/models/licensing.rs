//! Licensing routes and the licensing plan.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::brand::LicensingParams;

/// Licensing channel category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RouteName {
    Library,
    Indie,
    Bespoke,
    KnownArtist,
}

impl RouteName {
    /// Wire name as used in the JSON exchanged with the model.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RouteName::Library => "Library",
            RouteName::Indie => "Indie",
            RouteName::Bespoke => "Bespoke",
            RouteName::KnownArtist => "KnownArtist",
        }
    }

    /// Human label, e.g. "Known Artist".
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            RouteName::KnownArtist => "Known Artist",
            other => other.as_str(),
        }
    }
}

impl FromStr for RouteName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        let compact = compact.strip_suffix("route").unwrap_or(&compact);
        match compact {
            "library" => Ok(RouteName::Library),
            "indie" => Ok(RouteName::Indie),
            "bespoke" => Ok(RouteName::Bespoke),
            "knownartist" => Ok(RouteName::KnownArtist),
            _ => Err(format!(
                "unknown licensing route '{s}' (expected Library, Indie, Bespoke or KnownArtist)"
            )),
        }
    }
}

impl TryFrom<String> for RouteName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RouteName> for String {
    fn from(value: RouteName) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::Low => "low",
            RiskTier::Medium => "medium",
            RiskTier::High => "high",
        };
        write!(f, "{s}")
    }
}

/// Estimated cost range in euros, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRange(pub f64, pub f64);

impl CostRange {
    #[must_use]
    pub fn min(self) -> f64 {
        self.0
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.1
    }

    #[must_use]
    pub fn average(self) -> f64 {
        (self.0 + self.1) / 2.0
    }
}

impl fmt::Display for CostRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "€{:.0}-€{:.0}", self.0, self.1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicensingRoute {
    pub route: RouteName,
    pub est_cost_range: CostRange,
    pub risk: RiskTier,
    pub time_to_clear_days: u32,
    pub use_cases: Vec<String>,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// A pricing rule the model was told to follow but did not.
#[derive(Debug, Clone, PartialEq)]
pub enum PricingViolation {
    /// Indie and Bespoke must share the same range.
    IndieBespokeMismatch { indie: CostRange, bespoke: CostRange },
    /// Known Artist must be the most expensive route.
    KnownArtistNotMostExpensive { cheaper_than: RouteName },
    /// Library must be the least expensive route.
    LibraryNotCheapest { dearer_than: RouteName },
}

impl fmt::Display for PricingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingViolation::IndieBespokeMismatch { indie, bespoke } => {
                write!(f, "Indie ({indie}) and Bespoke ({bespoke}) prices differ")
            }
            PricingViolation::KnownArtistNotMostExpensive { cheaper_than } => {
                write!(f, "Known Artist is cheaper than {cheaper_than}")
            }
            PricingViolation::LibraryNotCheapest { dearer_than } => {
                write!(f, "Library is more expensive than {dearer_than}")
            }
        }
    }
}

/// Output of the licensing-plan step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicensingPlan {
    pub budget_eur: f64,
    pub routes: Vec<LicensingRoute>,
    pub recommended_route: RouteName,
    pub notes: Vec<String>,
}

impl LicensingPlan {
    #[must_use]
    pub fn route(&self, name: RouteName) -> Option<&LicensingRoute> {
        self.routes.iter().find(|r| r.route == name)
    }

    #[must_use]
    pub fn recommended(&self) -> Option<&LicensingRoute> {
        self.route(self.recommended_route)
    }

    /// The first note, which summarises the recommendation.
    #[must_use]
    pub fn headline_note(&self) -> Option<&str> {
        self.notes.first().map(String::as_str)
    }

    /// Structural checks: non-empty routes, ordered ranges, and a
    /// recommendation that names one of the routes.
    pub fn validate(&self) -> Result<(), String> {
        if self.routes.is_empty() {
            return Err("routes is empty".to_string());
        }
        for route in &self.routes {
            let range = route.est_cost_range;
            if range.min() > range.max() {
                return Err(format!(
                    "{} est_cost_range min {} is above max {}",
                    route.route.as_str(),
                    range.min(),
                    range.max()
                ));
            }
        }
        if self.recommended().is_none() {
            return Err(format!(
                "recommended_route {} is not one of the listed routes",
                self.recommended_route.as_str()
            ));
        }
        Ok(())
    }

    /// Check the pricing rules given to the model.
    ///
    /// Routes missing from the plan are skipped. "Most" and "least"
    /// expensive compare average prices.
    #[must_use]
    pub fn pricing_violations(&self) -> Vec<PricingViolation> {
        let mut violations = Vec::new();

        if let (Some(indie), Some(bespoke)) =
            (self.route(RouteName::Indie), self.route(RouteName::Bespoke))
        {
            if indie.est_cost_range != bespoke.est_cost_range {
                violations.push(PricingViolation::IndieBespokeMismatch {
                    indie: indie.est_cost_range,
                    bespoke: bespoke.est_cost_range,
                });
            }
        }

        if let Some(known) = self.route(RouteName::KnownArtist) {
            let known_avg = known.est_cost_range.average();
            if let Some(other) = self
                .routes
                .iter()
                .filter(|r| r.route != RouteName::KnownArtist)
                .find(|r| r.est_cost_range.average() > known_avg)
            {
                violations.push(PricingViolation::KnownArtistNotMostExpensive {
                    cheaper_than: other.route,
                });
            }
        }

        if let Some(library) = self.route(RouteName::Library) {
            let library_avg = library.est_cost_range.average();
            if let Some(other) = self
                .routes
                .iter()
                .filter(|r| r.route != RouteName::Library)
                .find(|r| r.est_cost_range.average() < library_avg)
            {
                violations.push(PricingViolation::LibraryNotCheapest {
                    dearer_than: other.route,
                });
            }
        }

        violations
    }

    /// The route that best fits the budget: the dearest route whose minimum
    /// price is within budget, or the cheapest route when none is. Ties go
    /// to the route listed first.
    #[must_use]
    pub fn best_budget_fit(&self) -> Option<RouteName> {
        let affordable = self
            .routes
            .iter()
            .rev()
            .filter(|r| r.est_cost_range.min() <= self.budget_eur)
            .max_by(|a, b| {
                a.est_cost_range
                    .average()
                    .total_cmp(&b.est_cost_range.average())
            });

        affordable
            .or_else(|| {
                self.routes.iter().min_by(|a, b| {
                    a.est_cost_range
                        .average()
                        .total_cmp(&b.est_cost_range.average())
                })
            })
            .map(|r| r.route)
    }

    /// Whether the first note opens with the fixed template sentence.
    #[must_use]
    pub fn follows_note_template(&self, params: &LicensingParams) -> bool {
        self.headline_note()
            .is_some_and(|note| note.starts_with(&note_prefix(params)))
    }
}

/// Opening of the first note, up to the route name the model fills in.
#[must_use]
pub fn note_prefix(params: &LicensingParams) -> String {
    format!(
        "Based on your selection of {} for {} in {}, we suggest that you follow the",
        params.usage, params.term, params.territory
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::brand::{TermLength, TerritoryScope, UsageScope};

    fn route(name: RouteName, min: f64, max: f64) -> LicensingRoute {
        LicensingRoute {
            route: name,
            est_cost_range: CostRange(min, max),
            risk: RiskTier::Low,
            time_to_clear_days: 7,
            use_cases: vec![],
            pros: vec![],
            cons: vec![],
        }
    }

    fn plan(routes: Vec<LicensingRoute>, recommended: RouteName, budget: f64) -> LicensingPlan {
        LicensingPlan {
            budget_eur: budget,
            routes,
            recommended_route: recommended,
            notes: vec![],
        }
    }

    fn well_priced() -> Vec<LicensingRoute> {
        vec![
            route(RouteName::Library, 500.0, 2_000.0),
            route(RouteName::Indie, 3_000.0, 8_000.0),
            route(RouteName::Bespoke, 3_000.0, 8_000.0),
            route(RouteName::KnownArtist, 25_000.0, 80_000.0),
        ]
    }

    #[test]
    fn test_route_name_parsing() {
        assert_eq!("KnownArtist".parse::<RouteName>().unwrap(), RouteName::KnownArtist);
        assert_eq!("Known Artist".parse::<RouteName>().unwrap(), RouteName::KnownArtist);
        assert_eq!("known_artist".parse::<RouteName>().unwrap(), RouteName::KnownArtist);
        assert_eq!("Bespoke Route".parse::<RouteName>().unwrap(), RouteName::Bespoke);
        assert!("Stock".parse::<RouteName>().is_err());
        assert_eq!(
            serde_json::to_value(RouteName::KnownArtist).unwrap(),
            serde_json::json!("KnownArtist")
        );
    }

    #[test]
    fn test_valid_plan() {
        let plan = plan(well_priced(), RouteName::Indie, 10_000.0);
        assert!(plan.validate().is_ok());
        assert!(plan.pricing_violations().is_empty());
        assert_eq!(plan.recommended().unwrap().route, RouteName::Indie);
    }

    #[test]
    fn test_recommendation_must_be_listed() {
        let routes = vec![route(RouteName::Library, 500.0, 2_000.0)];
        let plan = plan(routes, RouteName::KnownArtist, 10_000.0);
        assert!(plan.validate().unwrap_err().contains("recommended_route"));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let routes = vec![route(RouteName::Library, 2_000.0, 500.0)];
        let plan = plan(routes, RouteName::Library, 10_000.0);
        assert!(plan.validate().unwrap_err().contains("min"));
    }

    #[test]
    fn test_empty_routes_rejected() {
        let plan = plan(vec![], RouteName::Library, 10_000.0);
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_pricing_violations_detected() {
        let routes = vec![
            route(RouteName::Library, 9_000.0, 12_000.0),
            route(RouteName::Indie, 3_000.0, 8_000.0),
            route(RouteName::Bespoke, 5_000.0, 15_000.0),
            route(RouteName::KnownArtist, 6_000.0, 9_000.0),
        ];
        let violations = plan(routes, RouteName::Indie, 10_000.0).pricing_violations();

        assert_eq!(violations.len(), 3);
        assert!(matches!(violations[0], PricingViolation::IndieBespokeMismatch { .. }));
        assert_eq!(
            violations[1],
            PricingViolation::KnownArtistNotMostExpensive {
                cheaper_than: RouteName::Library
            }
        );
        assert_eq!(
            violations[2],
            PricingViolation::LibraryNotCheapest {
                dearer_than: RouteName::Indie
            }
        );
    }

    #[test]
    fn test_best_budget_fit() {
        assert_eq!(
            plan(well_priced(), RouteName::Indie, 10_000.0).best_budget_fit(),
            Some(RouteName::Indie)
        );
        assert_eq!(
            plan(well_priced(), RouteName::Indie, 50_000.0).best_budget_fit(),
            Some(RouteName::KnownArtist)
        );
        assert_eq!(
            plan(well_priced(), RouteName::Indie, 100.0).best_budget_fit(),
            Some(RouteName::Library)
        );
    }

    #[test]
    fn test_note_template() {
        let params = LicensingParams {
            usage: UsageScope::AllMedia,
            term: TermLength::TwentyFourMonths,
            territory: TerritoryScope::Worldwide,
        };
        let mut plan = plan(well_priced(), RouteName::KnownArtist, 90_000.0);
        assert!(!plan.follows_note_template(&params));

        plan.notes.push(
            "Based on your selection of All Media for 24 Months in Worldwide, we suggest that \
             you follow the Known Artist route. Prices average around €52,500..."
                .to_string(),
        );
        assert!(plan.follows_note_template(&params));
        assert!(!plan.follows_note_template(&LicensingParams::default()));
    }
}
