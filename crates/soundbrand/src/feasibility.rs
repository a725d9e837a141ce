//! Quick route projection shown while the real pipeline runs.
//!
//! The estimate multiplies a few categorical weights and compares the
//! budget against the result. It is a placeholder for the interim view
//! only and never feeds into the pipeline.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::models::{LicensingParams, TermLength, TerritoryScope, UsageScope};

/// Arbitrary base cost unit the multiplier scales, in euros.
pub const BASE_MARKET_VALUE: f64 = 2_000.0;

/// How long the interim view waits before revealing the projection.
pub const PROJECTION_DELAY: Duration = Duration::from_millis(800);

/// Likely licensing route for a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectedRoute {
    KnownArtist,
    BespokeOrIndie,
    IndieOrLibrary,
    Library,
}

impl ProjectedRoute {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProjectedRoute::KnownArtist => "Known Artist",
            ProjectedRoute::BespokeOrIndie => "Bespoke or Indie",
            ProjectedRoute::IndieOrLibrary => "Indie or Library",
            ProjectedRoute::Library => "Library",
        }
    }

    fn from_ratio(ratio: f64) -> Self {
        if ratio > 10.0 {
            ProjectedRoute::KnownArtist
        } else if ratio > 4.0 {
            ProjectedRoute::BespokeOrIndie
        } else if ratio > 2.0 {
            ProjectedRoute::IndieOrLibrary
        } else {
            ProjectedRoute::Library
        }
    }
}

impl fmt::Display for ProjectedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Intermediate values of the projection, kept for display and tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeasibilityEstimate {
    pub complexity_multiplier: f64,
    pub estimated_market_value: f64,
    pub feasibility_ratio: f64,
    pub route: ProjectedRoute,
}

/// Complexity multiplier for the chosen usage, territory and term.
#[must_use]
pub fn complexity_multiplier(params: &LicensingParams) -> f64 {
    let mut multiplier = 1.0;

    if params.usage == UsageScope::AllMedia {
        multiplier *= 3.0;
    }

    match params.territory {
        TerritoryScope::Worldwide => multiplier *= 2.5,
        TerritoryScope::SingleContinent => multiplier *= 1.5,
        TerritoryScope::SingleCountry => {}
    }

    if params.term == TermLength::TwentyFourMonths {
        multiplier *= 1.5;
    }

    multiplier
}

/// Estimate which route the budget can probably afford.
#[must_use]
pub fn estimate(budget: f64, params: &LicensingParams) -> FeasibilityEstimate {
    let complexity_multiplier = complexity_multiplier(params);
    let estimated_market_value = BASE_MARKET_VALUE * complexity_multiplier;
    let feasibility_ratio = budget / estimated_market_value;

    FeasibilityEstimate {
        complexity_multiplier,
        estimated_market_value,
        feasibility_ratio,
        route: ProjectedRoute::from_ratio(feasibility_ratio),
    }
}

/// Shorthand for the projected route label.
#[must_use]
pub fn projected_route(budget: f64, params: &LicensingParams) -> ProjectedRoute {
    estimate(budget, params).route
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(usage: UsageScope, territory: TerritoryScope, term: TermLength) -> LicensingParams {
        LicensingParams {
            usage,
            term,
            territory,
        }
    }

    #[test]
    fn test_default_selection() {
        let estimate = estimate(10_000.0, &LicensingParams::default());
        assert!((estimate.complexity_multiplier - 1.0).abs() < f64::EPSILON);
        assert!((estimate.estimated_market_value - 2_000.0).abs() < f64::EPSILON);
        assert!((estimate.feasibility_ratio - 5.0).abs() < f64::EPSILON);
        assert_eq!(estimate.route, ProjectedRoute::BespokeOrIndie);
        assert_eq!(estimate.route.label(), "Bespoke or Indie");
    }

    #[test]
    fn test_widest_selection() {
        let p = params(
            UsageScope::AllMedia,
            TerritoryScope::Worldwide,
            TermLength::TwentyFourMonths,
        );
        let estimate = estimate(2_500.0, &p);
        assert!((estimate.complexity_multiplier - 11.25).abs() < 1e-9);
        assert!((estimate.estimated_market_value - 22_500.0).abs() < 1e-9);
        assert!((estimate.feasibility_ratio - 0.111).abs() < 1e-3);
        assert_eq!(estimate.route, ProjectedRoute::Library);
    }

    #[test]
    fn test_factors_multiply_independently() {
        let cases = [
            (UsageScope::OnlineOnly, TerritoryScope::SingleCountry, TermLength::TwelveMonths, 1.0),
            (UsageScope::AllMedia, TerritoryScope::SingleCountry, TermLength::TwelveMonths, 3.0),
            (UsageScope::OnlineOnly, TerritoryScope::SingleContinent, TermLength::ThreeMonths, 1.5),
            (UsageScope::OnlineOnly, TerritoryScope::Worldwide, TermLength::SixMonths, 2.5),
            (UsageScope::OnlineOnly, TerritoryScope::SingleCountry, TermLength::TwentyFourMonths, 1.5),
            (UsageScope::AllMedia, TerritoryScope::SingleContinent, TermLength::TwentyFourMonths, 6.75),
        ];

        for (usage, territory, term, expected) in cases {
            let got = complexity_multiplier(&params(usage, territory, term));
            assert!(
                (got - expected).abs() < 1e-9,
                "{usage} / {territory} / {term}: expected {expected}, got {got}"
            );
        }
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let p = LicensingParams::default();
        // Ratios exactly on a threshold fall to the lower label.
        assert_eq!(projected_route(20_000.0, &p), ProjectedRoute::BespokeOrIndie);
        assert_eq!(projected_route(20_001.0, &p), ProjectedRoute::KnownArtist);
        assert_eq!(projected_route(8_000.0, &p), ProjectedRoute::IndieOrLibrary);
        assert_eq!(projected_route(4_000.0, &p), ProjectedRoute::Library);
        assert_eq!(projected_route(4_001.0, &p), ProjectedRoute::IndieOrLibrary);
    }
}
