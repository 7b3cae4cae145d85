//! # Analyze — unified analysis of a single case.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use govrisk_core::EngineConfig;
use govrisk_insight::InsightEngine;

use crate::{load_case_store, write_json, EXIT_INSUFFICIENT_DATA};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Case records file (`{ "cases": [...] }`).
    pub records: PathBuf,

    /// Identifier of the case to analyze.
    #[arg(long = "case")]
    pub case_id: String,
}

/// Print the [`UnifiedAnalysis`](govrisk_insight::UnifiedAnalysis) for one case.
///
/// An unknown case, or one lacking either domain, prints the user-facing
/// message on stderr and returns [`EXIT_INSUFFICIENT_DATA`].
pub fn run_analyze(args: &AnalyzeArgs, config: &EngineConfig, out: &mut dyn Write) -> Result<u8> {
    let engine = InsightEngine::new(config)?;
    let store = load_case_store(&args.records)?;

    match engine.analyze(&args.case_id, &store) {
        Ok(unified) => {
            write_json(out, &unified)?;
            Ok(0)
        }
        Err(e) if e.is_data_insufficiency() => {
            tracing::warn!(case = %args.case_id, "{e}");
            eprintln!("{}", e.user_message());
            Ok(EXIT_INSUFFICIENT_DATA)
        }
        Err(e) => Err(e.into()),
    }
}
