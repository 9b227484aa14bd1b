//! Lookbook CLI - product photo fingerprint tools.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use lookbook_core::{SearchParams, DEFAULT_LIMIT, DEFAULT_THRESHOLD};
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

/// Output format for command results
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON on stdout
    Json,
}

#[derive(Parser)]
#[command(name = "lookbook")]
#[command(author, version, about = "Product photo fingerprinting and similarity", long_about = None)]
#[command(after_help = "Exit codes:
  0   Success
  1   General error
  65  Photos are not similar
  66  Cannot read input file
  67  Input is not a decodable image")]
struct Cli {
    /// Only print essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the 256-bit average-hash fingerprint of a photo
    Fingerprint {
        /// Path to the photo
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Compare two photos and report their similarity
    Compare {
        /// First photo
        #[arg(value_name = "FIRST")]
        first: PathBuf,

        /// Second photo
        #[arg(value_name = "SECOND")]
        second: PathBuf,

        /// Minimum similarity (exclusive) to count as a match
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
        threshold: f64,
    },

    /// Rank candidate photos by similarity to a query photo
    Rank {
        /// Query photo
        #[arg(value_name = "QUERY")]
        query: PathBuf,

        /// Candidate photos
        #[arg(value_name = "CANDIDATES", required = true)]
        candidates: Vec<PathBuf>,

        /// Minimum similarity (exclusive) for a candidate to be listed
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, value_parser = parse_threshold)]
        threshold: f64,

        /// Maximum number of results
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn parse_threshold(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("threshold must be between 0 and 1, got {value}"))
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let quiet = cli.quiet;
    match cli.command {
        Commands::Fingerprint { file, format } => commands::fingerprint::execute(file, format, quiet),
        Commands::Compare {
            first,
            second,
            threshold,
        } => commands::compare::execute(first, second, threshold, quiet),
        Commands::Rank {
            query,
            candidates,
            threshold,
            limit,
            format,
        } => {
            let params = SearchParams { threshold, limit };
            commands::rank::execute(query, candidates, params, format, quiet).await
        }
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit = match run(cli).await {
        Ok(()) => ExitCode::success(),
        Err(e) => ExitCode::from_anyhow(&e),
    };

    if let Some(message) = &exit.message {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }

    std::process::ExitCode::from(u8::try_from(exit.code).unwrap_or(1))
}
