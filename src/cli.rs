use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use masslookup::{config::ConfigError, error::LookupError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Offline LC-MS compound lookup", long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Consolidated compound database (overrides the config file)
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search by observed mass or m/z
    Mass {
        /// Observed value (m/z, or neutral mass with `--adduct neutral`)
        value: f64,

        /// Adduct of the observed ion, e.g. "[M+H]+", "M+Na", "neutral"
        #[arg(short, long, default_value = "neutral")]
        adduct: String,

        /// Tolerance in Da (defaults to the configured value)
        #[arg(short, long)]
        tolerance: Option<f64>,

        /// Restrict to a source database; repeat for several
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Search by exact molecular formula
    Formula {
        /// Formula such as C6H12O6
        formula: String,

        /// Restrict to a source database; repeat for several
        #[arg(short, long = "source")]
        sources: Vec<String>,

        /// Maximum number of results
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show compound counts per source and the mass span
    Stats,
    /// List supported adducts and their mass shifts
    Adducts,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("cannot encode output: {0}")]
    Json(#[from] serde_json::Error),
}
