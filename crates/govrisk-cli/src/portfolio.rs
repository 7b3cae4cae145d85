//! # Portfolio — batch analysis across cases.
//!
//! Without `--case`, every case in the records file is analyzed. Cases
//! that cannot be analyzed are listed under `skippedCases` rather than
//! failing the command.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use govrisk_core::EngineConfig;
use govrisk_insight::{ExecutiveReport, PortfolioAggregator};

use crate::{load_case_store, write_json};

#[derive(Args, Debug)]
pub struct PortfolioArgs {
    /// Case records file (`{ "cases": [...] }`).
    pub records: PathBuf,

    /// Restrict the analysis to these cases. Repeatable.
    #[arg(long = "case")]
    pub cases: Vec<String>,

    /// Print the executive report instead of the full insights.
    #[arg(long)]
    pub report: bool,
}

pub fn run_portfolio(
    args: &PortfolioArgs,
    config: &EngineConfig,
    out: &mut dyn Write,
) -> Result<u8> {
    let aggregator = PortfolioAggregator::new(config)?;
    let store = load_case_store(&args.records)?;

    let insights = if args.cases.is_empty() {
        aggregator.analyze_all(&store)
    } else {
        aggregator.analyze(&args.cases, &store)
    };

    if args.report {
        write_json(out, &ExecutiveReport::from_insights(&insights))?;
    } else {
        write_json(out, &insights)?;
    }
    Ok(0)
}
