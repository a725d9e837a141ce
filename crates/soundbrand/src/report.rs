//! Terminal rendering of strategy results.
//!
//! This module uses println! for CLI output.

#![allow(clippy::disallowed_macros)]

use colored::Colorize;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::feasibility::{FeasibilityEstimate, ProjectedRoute};
use crate::models::{
    BrandAnalysis, FullAnalysisResult, LicensingPlan, RiskTier, RouteName, SonicBrief, Track,
};

/// How many ranked tracks the strategy view lists.
pub const DISPLAYED_TRACKS: usize = 12;

/// Where licensing enquiries go.
pub const ENQUIRY_ADDRESS: &str = "info@emeraldsmusic.com";

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Colored label for a projected route.
pub fn projected_route_colored(route: ProjectedRoute) -> String {
    match route {
        ProjectedRoute::KnownArtist => route.label().magenta().bold().to_string(),
        ProjectedRoute::BespokeOrIndie => route.label().cyan().bold().to_string(),
        ProjectedRoute::IndieOrLibrary => route.label().yellow().bold().to_string(),
        ProjectedRoute::Library => route.label().green().bold().to_string(),
    }
}

/// Create a table for ranked or catalog tracks.
pub fn track_table(tracks: &[Track]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Artist").fg(Color::Cyan),
        Cell::new("BPM").fg(Color::Cyan),
        Cell::new("Key").fg(Color::Cyan),
        Cell::new("Length").fg(Color::Cyan),
        Cell::new("Fit").fg(Color::Cyan),
        Cell::new("Why").fg(Color::Cyan),
    ]);

    for track in tracks {
        let fit = match track.score_percent() {
            Some(p) if p >= 80 => Cell::new(format!("{p}%")).fg(Color::Green),
            Some(p) if p >= 50 => Cell::new(format!("{p}%")).fg(Color::Yellow),
            Some(p) => Cell::new(format!("{p}%")).fg(Color::DarkGrey),
            None => Cell::new("-"),
        };
        let reasons = track
            .fit_reasons
            .as_deref()
            .map_or_else(|| join_or_dash(&track.mood_tags), join_or_dash);

        table.add_row(vec![
            Cell::new(&track.id).fg(Color::DarkGrey),
            Cell::new(&track.title),
            Cell::new(&track.artist),
            Cell::new(track.bpm),
            Cell::new(track.key.as_deref().unwrap_or("-")),
            Cell::new(track.duration.as_deref().unwrap_or("-")),
            fit,
            Cell::new(reasons),
        ]);
    }

    table
}

/// Create a table comparing licensing routes; the recommended one is marked.
pub fn route_table(plan: &LicensingPlan) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("").fg(Color::Cyan),
        Cell::new("Route").fg(Color::Cyan),
        Cell::new("Cost").fg(Color::Cyan),
        Cell::new("Risk").fg(Color::Cyan),
        Cell::new("Clearance").fg(Color::Cyan),
        Cell::new("Pros").fg(Color::Cyan),
        Cell::new("Cons").fg(Color::Cyan),
    ]);

    for route in &plan.routes {
        let recommended = route.route == plan.recommended_route;
        let risk_color = match route.risk {
            RiskTier::Low => Color::Green,
            RiskTier::Medium => Color::Yellow,
            RiskTier::High => Color::Red,
        };
        let within_budget = route.est_cost_range.min() <= plan.budget_eur;
        let cost_color = if within_budget {
            Color::White
        } else {
            Color::Red
        };

        let name = Cell::new(route.route.label());
        table.add_row(vec![
            Cell::new(if recommended { "●" } else { "" }).fg(Color::Green),
            if recommended {
                name.fg(Color::Green)
            } else {
                name
            },
            Cell::new(route.est_cost_range.to_string()).fg(cost_color),
            Cell::new(route.risk.to_string()).fg(risk_color),
            Cell::new(format!("{} days", route.time_to_clear_days)),
            Cell::new(join_or_dash(&route.pros)),
            Cell::new(join_or_dash(&route.cons)),
        ]);
    }

    table
}

/// `mailto:` link for enquiring about one licensing route.
pub fn enquiry_link(route: RouteName, budget_eur: f64) -> String {
    let subject = format!("Licensing Enquiry: {}", route.label());
    let body = format!(
        "Hi Emeralds Music Team,\n\nI'm interested in the {} licensing route for my project (Budget: €{budget_eur}).\n\nPlease can you provide more details?",
        route.label()
    );
    format!(
        "mailto:{ENQUIRY_ADDRESS}?subject={}&body={}",
        urlencoding::encode(&subject),
        urlencoding::encode(&body)
    )
}

fn heading(title: &str) {
    println!();
    println!("{}", title.bold().underline());
}

fn field(label: &str, value: &str) {
    println!("{}: {}", label.bold(), value);
}

/// Display the brand analysis.
pub fn display_brand(analysis: &BrandAnalysis) {
    println!("{}", "═".repeat(60).dimmed());
    println!(
        "{} {}",
        analysis.brand_name.cyan().bold(),
        format!("[{}]", analysis.archetype).yellow()
    );
    println!("{}", "═".repeat(60).dimmed());

    field("Industry", &analysis.industry);
    field("Values", &join_or_dash(&analysis.inferred_values));
    field("Tone", &join_or_dash(&analysis.tone_keywords));
    field("Comparable brands", &join_or_dash(&analysis.comparison_brands));
    field("Placements", &join_or_dash(&analysis.usage.placements));
    field(
        "Licensing",
        &format!(
            "{} / {} / {}",
            analysis.usage.usage_type, analysis.usage.term_length, analysis.usage.territory_scope
        ),
    );
    field("Budget", &format!("€{:.0}", analysis.budget_eur));
    if !analysis.notes.is_empty() {
        field("Notes", &analysis.notes);
    }
}

/// Display the sonic brief.
pub fn display_brief(brief: &SonicBrief) {
    heading("Sonic Brief");
    field("Mood", &join_or_dash(&brief.overall_mood));
    field(
        "Energy / Valence",
        &format!("{} / {}", brief.energy, brief.valence),
    );
    field("Tempo", &brief.bpm_range.to_string());
    field("Keys", &join_or_dash(&brief.keys));
    field("Genres", &join_or_dash(&brief.genres));
    field("Instrumentation", &join_or_dash(&brief.instrumentation));
    field("Vocals", &brief.vocal_style);
    field("Lyric themes", &join_or_dash(&brief.lyric_themes));
    field("Sync contexts", &join_or_dash(&brief.sync_contexts));
    field(
        "Avoid",
        &format!(
            "{} {} {}",
            join_or_dash(&brief.must_avoid.feel),
            "|".dimmed(),
            join_or_dash(&brief.must_avoid.lyrics)
        ),
    );
}

/// Display the interim feasibility projection.
pub fn display_projection(budget: u32, estimate: &FeasibilityEstimate) {
    println!(
        "{} Budget €{} against an estimated market value of €{:.0} (x{:.2}). Projected route: {}",
        "ℹ".blue().bold(),
        budget,
        estimate.estimated_market_value,
        estimate.complexity_multiplier,
        projected_route_colored(estimate.route)
    );
}

/// Display a complete strategy.
pub fn display_strategy(result: &FullAnalysisResult) {
    display_brand(&result.brand_analysis);
    display_brief(&result.sonic_brief);

    let tracks = &result.track_recommendations.commercial;
    heading(&format!(
        "Reference Tracks ({} of {})",
        tracks.len().min(DISPLAYED_TRACKS),
        tracks.len()
    ));
    if tracks.is_empty() {
        println!("{}", "No matching tracks".dimmed());
    } else {
        let shown = &tracks[..tracks.len().min(DISPLAYED_TRACKS)];
        println!("{}", track_table(shown));
    }

    let plan = &result.licensing_plan;
    heading("Licensing Plan");
    println!("{}", route_table(plan));
    println!(
        "{} Recommended route: {}",
        "✓".green().bold(),
        plan.recommended_route.label().green().bold()
    );
    if let Some(note) = plan.headline_note() {
        println!("{note}");
    }
    println!();
    println!("{}", "Enquire".bold());
    for route in &plan.routes {
        println!(
            "  {:<13} {}",
            route.route.label(),
            enquiry_link(route.route, plan.budget_eur).dimmed()
        );
    }

    if let Some(prompt) = &result.gen_ai_prompt {
        heading("Generative Prompt");
        println!("{}", prompt.italic());
    }
    println!();
}

/// Print success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}
