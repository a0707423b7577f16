//! Demoshop CLI - Main Entry Point
//!
//! Browse the Demo Web Shop test-case catalog: filter cases, show one in
//! full, print coverage figures.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

use commands::{cases, summary};

/// Demo Web Shop test-case catalog
#[derive(Parser)]
#[command(name = "demoshop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Load the catalog from a YAML file instead of the built-in one
    #[arg(long, global = true, env = "DEMOSHOP_CATALOG")]
    catalog: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List test cases, optionally filtered
    List(cases::ListArgs),

    /// List the smoke set
    Smoke,

    /// Show one test case in full
    Show {
        /// Test case id, e.g. LOGIN-001
        id: String,
    },

    /// Show automation coverage
    Stats,

    /// List features and their case counts
    Features,

    /// Smoke, UI, critical and registration listings in one go
    Overview,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let catalog = commands::load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Commands::List(args) => cases::list(&catalog, &args, cli.format)?,
        Commands::Smoke => cases::smoke(&catalog, cli.format)?,
        Commands::Show { id } => cases::show(&catalog, &id, cli.format)?,
        Commands::Stats => summary::stats(&catalog, cli.format)?,
        Commands::Features => summary::features(&catalog, cli.format)?,
        Commands::Overview => summary::overview(&catalog, cli.format)?,
    }

    Ok(())
}
