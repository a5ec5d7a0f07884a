//! EditGate CLI - Check editing settings and replay saves against a fixture
//!
//! This CLI lets operators:
//! - Validate a settings file before deploying it
//! - Inspect the effective editing mode of an item
//! - List the revisions waiting for approval
//! - Replay a sequence of saves and see each decision and notice

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use editgate_policy::EditGateSettings;
use editgate_types::ContentId;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod fixture;

use fixture::{Fixture, World};

/// EditGate CLI application
#[derive(Parser)]
#[command(name = "editgate")]
#[command(about = "EditGate - approval-gated editing policies", long_about = None)]
#[command(version)]
struct Cli {
    /// Settings file path
    #[arg(short, long, env = "EDITGATE_CONFIG", default_value = "editgate.toml")]
    config: PathBuf,

    /// World fixture path
    #[arg(short, long, env = "EDITGATE_FIXTURE")]
    fixture: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Validate the settings file
    CheckConfig,

    /// Show the effective editing mode of an item
    Resolve {
        /// Content ID
        id: u64,
    },

    /// List revisions newer than the accepted one
    Pending {
        /// Content ID
        id: u64,
    },

    /// Replay the fixture's saves in order
    Simulate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON reports
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let settings = EditGateSettings::load(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;

    match cli.command {
        Commands::CheckConfig => print_json(&commands::check_config(&settings)),
        Commands::Resolve { id } => {
            let (world, _) = load_world(cli.fixture.as_ref(), &settings)?;
            print_json(&commands::resolve(&world, ContentId::new(id)).await?)
        }
        Commands::Pending { id } => {
            let (world, _) = load_world(cli.fixture.as_ref(), &settings)?;
            print_json(&commands::pending(&world, ContentId::new(id)).await?)
        }
        Commands::Simulate => {
            let (world, fixture) = load_world(cli.fixture.as_ref(), &settings)?;
            print_json(&commands::simulate(&world, &fixture.saves).await?)
        }
    }
}

fn load_world(path: Option<&PathBuf>, settings: &EditGateSettings) -> Result<(World, Fixture)> {
    let path = path.context("this command needs a world fixture (--fixture)")?;
    let fixture = Fixture::load(path)?;
    let world = World::seed(&fixture, settings)?;
    Ok((world, fixture))
}

fn print_json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}
