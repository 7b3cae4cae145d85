//! # govrisk CLI entry point
//!
//! Parses arguments, installs logging, loads the engine configuration, and
//! dispatches to the subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use govrisk_cli::analyze::{run_analyze, AnalyzeArgs};
use govrisk_cli::load_config;
use govrisk_cli::portfolio::{run_portfolio, PortfolioArgs};
use govrisk_cli::score::{run_score, ScoreArgs};

/// Risk and compliance scoring for AI use cases.
///
/// Scores assessment snapshots across six risk factors, analyzes financial
/// and governance records per case, and aggregates portfolio insights.
#[derive(Parser, Debug)]
#[command(name = "govrisk", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine configuration file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Composite risk score of an assessment snapshot.
    Score(ScoreArgs),

    /// Unified financial and governance analysis of one case.
    Analyze(AnalyzeArgs),

    /// Portfolio insights across cases, or an executive report.
    Portfolio(PortfolioArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        let mut stdout = std::io::stdout().lock();
        match &cli.command {
            Commands::Score(args) => run_score(args, &config, &mut stdout),
            Commands::Analyze(args) => run_analyze(args, &config, &mut stdout),
            Commands::Portfolio(args) => run_portfolio(args, &config, &mut stdout),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
