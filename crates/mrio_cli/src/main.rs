//! mriosim CLI - Command Line Operations for MRIO Shock Simulation
//!
//! This is the operational entry point for the mriosim engine.
//!
//! # Commands
//!
//! - `mriosim simulate` - Propagate a scenario's shocks through a period's
//!   tables and report impact and attribution
//! - `mriosim scan` - Rank candidate shocks by damage to a target sector
//! - `mriosim validate` - Parse and check a scenario file against a
//!   period's label universe
//!
//! Datasets are resolved under `--data-dir` as one directory of CSV
//! tables per period.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

pub use error::{CliError, Result};

/// MRIO shock propagation CLI
#[derive(Parser)]
#[command(name = "mriosim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dataset root directory (one subdirectory per period)
    #[arg(short, long, global = true, default_value = "./data")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Propagate a scenario's shocks and report impact and attribution
    Simulate {
        /// Dataset period (year)
        #[arg(short, long)]
        period: i32,

        /// Propagation closure (leontief, ghosh)
        #[arg(short, long, default_value = "leontief")]
        closure: String,

        /// Path to the shock scenario YAML file
        #[arg(short, long)]
        scenario: String,

        /// Target sector as REGION:Sector for attribution
        #[arg(short, long)]
        target: Option<String>,

        /// Path to a portfolio YAML file to aggregate over
        #[arg(long)]
        portfolio: Option<String>,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Rank candidate shocks by damage to a target sector
    Scan {
        /// Dataset period (year)
        #[arg(short, long)]
        period: i32,

        /// Target sector as REGION:Sector
        #[arg(short, long)]
        target: String,

        /// Shock magnitude as a fraction in [0, 1]
        #[arg(short, long, default_value = "0.5")]
        magnitude: f64,

        /// Number of ranked hits to report
        #[arg(long, default_value = "10")]
        top: usize,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Parse and check a scenario file against a period's label universe
    Validate {
        /// Path to the shock scenario YAML file
        scenario: String,

        /// Dataset period (year) to check sector pairs against
        #[arg(short, long)]
        period: Option<i32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Simulate {
            period,
            closure,
            scenario,
            target,
            portfolio,
            format,
        } => commands::simulate::run(
            &cli.data_dir,
            period,
            &closure,
            &scenario,
            target.as_deref(),
            portfolio.as_deref(),
            &format,
        ),
        Commands::Scan {
            period,
            target,
            magnitude,
            top,
            format,
        } => commands::scan::run(&cli.data_dir, period, &target, magnitude, top, &format),
        Commands::Validate { scenario, period } => {
            commands::validate::run(&cli.data_dir, &scenario, period)
        }
    }
}
