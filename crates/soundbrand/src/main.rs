//! SoundMyBrand CLI - brand-to-music strategy pipeline.

#![allow(clippy::disallowed_macros)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use soundbrand::feasibility::{self, PROJECTION_DELAY};
use soundbrand::models::{
    validate_budget, BrandInputs, LicensingParams, TermLength, TerritoryScope, UsageScope,
    DEFAULT_BUDGET,
};
use soundbrand::report;
use soundbrand::{Catalog, StrategyConfig, StrategyPipeline};

/// SoundMyBrand - Turn a brand profile into a music and licensing strategy.
#[derive(Parser)]
#[command(name = "soundbrand")]
#[command(about = "Brand-to-music strategy pipeline")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a full strategy for a brand
    Strategy(StrategyArgs),

    /// Show the quick route projection for a budget
    Project {
        #[command(flatten)]
        licensing: LicensingArgs,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in reference catalog
    Catalog {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct LicensingArgs {
    /// Budget cap in euros (1000-100000)
    #[arg(long, default_value_t = DEFAULT_BUDGET)]
    budget: u32,

    /// Usage scope ("Online Only" or "All Media")
    #[arg(long, default_value = "Online Only")]
    usage: UsageScope,

    /// Term length ("3 Months", "6 Months", "12 Months" or "24 Months")
    #[arg(long, default_value = "12 Months")]
    term: TermLength,

    /// Territory ("Single Country", "Single Continent" or "Worldwide")
    #[arg(long, default_value = "Single Country")]
    territory: TerritoryScope,
}

impl LicensingArgs {
    fn params(&self) -> LicensingParams {
        LicensingParams {
            usage: self.usage,
            term: self.term,
            territory: self.territory,
        }
    }
}

#[derive(Args)]
pub struct StrategyArgs {
    /// Brand name
    #[arg(long)]
    brand_name: String,

    /// What the brand does
    #[arg(long)]
    description: String,

    /// Industry
    #[arg(long, default_value = "")]
    industry: String,

    /// Brand values or vibe
    #[arg(long, default_value = "")]
    values: String,

    /// Reference link (website, campaign, playlist)
    #[arg(long)]
    reference_link: Option<String>,

    #[command(flatten)]
    licensing: LicensingArgs,

    /// AI model to use
    #[arg(long, env = "SOUNDBRAND_MODEL")]
    model: Option<String>,

    /// Fail when the licensing plan breaks the pricing rules
    #[arg(long)]
    strict_pricing: bool,

    /// Print the result as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Also write the result JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("soundbrand=debug,llm=debug,info")
        } else {
            EnvFilter::new("soundbrand=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Strategy(args) => run_strategy(args).await,
        Commands::Project { licensing, json } => run_project(&licensing, json),
        Commands::Catalog { json } => run_catalog(json),
    }
}

async fn run_strategy(args: StrategyArgs) -> Result<()> {
    let inputs = BrandInputs {
        brand_name: args.brand_name,
        industry: args.industry,
        description: args.description,
        values: args.values,
        reference_link: args.reference_link,
    };
    let budget = args.licensing.budget;
    let params = args.licensing.params();

    let mut config = StrategyConfig::from_env().context("Failed to load configuration")?;
    if let Some(model) = args.model {
        config = config.with_model(model);
    }
    if args.strict_pricing {
        config = config.with_strict_pricing(true);
    }
    let pipeline = StrategyPipeline::from_config(&config).context("Failed to create pipeline")?;

    tracing::info!(
        brand = %inputs.brand_name,
        budget,
        model = %config.options.model,
        "Generating strategy"
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("Analyzing brand...");

    // The projection is shown on a fixed timer, whatever the pipeline does.
    let projection = tokio::spawn({
        let spinner = spinner.clone();
        async move {
            tokio::time::sleep(PROJECTION_DELAY).await;
            let estimate = feasibility::estimate(f64::from(budget), &params);
            tracing::debug!(
                multiplier = estimate.complexity_multiplier,
                market_value = estimate.estimated_market_value,
                ratio = estimate.feasibility_ratio,
                route = %estimate.route,
                "Projected route"
            );
            spinner.set_message(format!(
                "Building strategy... projected route: {}",
                report::projected_route_colored(estimate.route)
            ));
        }
    });

    let outcome = pipeline
        .generate_full_strategy(&inputs, budget, &params)
        .await;
    projection.abort();
    spinner.finish_and_clear();

    let result = outcome.context("Analysis failed")?;

    if let Some(path) = &args.output {
        let body = serde_json::to_string_pretty(&result)?;
        tokio::fs::write(path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if !args.json {
            report::print_success(&format!("Strategy written to {}", path.display()));
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report::display_strategy(&result);
    }

    Ok(())
}

fn run_project(licensing: &LicensingArgs, json: bool) -> Result<()> {
    validate_budget(licensing.budget)?;
    let estimate = feasibility::estimate(f64::from(licensing.budget), &licensing.params());

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        report::display_projection(licensing.budget, &estimate);
    }

    Ok(())
}

fn run_catalog(json: bool) -> Result<()> {
    let catalog = Catalog::builtin();

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.tracks())?);
    } else {
        println!("{}", report::track_table(catalog.tracks()));
        println!("{} tracks", catalog.len());
    }

    Ok(())
}
