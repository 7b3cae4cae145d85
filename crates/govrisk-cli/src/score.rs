//! # Score — composite risk of an assessment snapshot.
//!
//! ```bash
//! govrisk score snapshot.json
//! govrisk score snapshot.json --action-depth 6
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use govrisk_core::{AssessmentSnapshot, EngineConfig};
use govrisk_factors::CompositeCalculator;

use crate::{read_input, write_json};

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Assessment snapshot (JSON).
    pub snapshot: PathBuf,

    /// Number of highest-scoring factors in the action summary.
    /// Overrides the configured depth.
    #[arg(long)]
    pub action_depth: Option<usize>,
}

pub fn run_score(args: &ScoreArgs, config: &EngineConfig, out: &mut dyn Write) -> Result<u8> {
    let mut config = config.clone();
    if let Some(depth) = args.action_depth {
        config.action_depth = depth;
    }
    let calculator = CompositeCalculator::new(&config)?;

    let text = read_input(&args.snapshot)?;
    let snapshot = AssessmentSnapshot::from_json(&text)
        .with_context(|| format!("failed to parse snapshot {}", args.snapshot.display()))?;

    let result = calculator.calculate(&snapshot);
    tracing::info!(score = result.score, tier = %result.tier.as_str(), "composite risk computed");
    write_json(out, &result)?;
    Ok(0)
}
