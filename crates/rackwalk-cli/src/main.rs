//! rackwalk - data-center walkthrough inspection runner
//!
//! CLI for replaying walkthrough scenarios against the inspection engine,
//! inspecting the active schema catalog, and summarizing exported data.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rackwalk_core::config::RackwalkConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

/// rackwalk - data-center walkthrough inspection runner
#[derive(Parser, Debug)]
#[command(name = "rackwalk")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "rackwalk.toml")]
    config: PathBuf,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect the active schema catalog
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Run or validate walkthrough scenarios
    #[command(subcommand)]
    Walkthrough(WalkthroughCommands),

    /// Summaries over exported inspection data
    #[command(subcommand)]
    Report(ReportCommands),
}

#[derive(Subcommand, Debug)]
enum CatalogCommands {
    /// List device sections and their fields
    Sections,

    /// List facilities and their racks
    Facilities,
}

#[derive(Subcommand, Debug)]
enum WalkthroughCommands {
    /// Replay a scenario file and submit the walkthrough
    Run {
        /// Facility id to inspect
        #[arg(short, long)]
        facility: String,

        /// Path to a JSON scenario file (array of actions)
        #[arg(short, long)]
        scenario: PathBuf,

        /// Submission output directory (overrides configuration)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replay a scenario file and print the validation report
    Validate {
        /// Facility id to inspect
        #[arg(short, long)]
        facility: String,

        /// Path to a JSON scenario file (array of actions)
        #[arg(short, long)]
        scenario: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommands {
    /// Dashboard counts from a JSON data file
    Summary {
        /// Path to a JSON data file with inspections and issues
        #[arg(short, long)]
        data: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Catalog(CatalogCommands::Sections) => {
            commands::catalog::sections(&config, cli.json)
        },
        Commands::Catalog(CatalogCommands::Facilities) => {
            commands::catalog::facilities(&config, cli.json)
        },
        Commands::Walkthrough(WalkthroughCommands::Run {
            facility,
            scenario,
            out,
        }) => commands::walkthrough::run(&config, &facility, &scenario, out.as_deref(), cli.json),
        Commands::Walkthrough(WalkthroughCommands::Validate { facility, scenario }) => {
            commands::walkthrough::validate(&config, &facility, &scenario, cli.json)
        },
        Commands::Report(ReportCommands::Summary { data }) => {
            commands::report::summary(&data, cli.json)
        },
    }
}

/// Loads configuration, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<RackwalkConfig> {
    if path.exists() {
        RackwalkConfig::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))
    } else {
        tracing::debug!(path = %path.display(), "no configuration file, using defaults");
        Ok(RackwalkConfig::default())
    }
}
