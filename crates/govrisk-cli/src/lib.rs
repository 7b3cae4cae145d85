//! # govrisk-cli — Command-Line Front End
//!
//! Provides the `govrisk` command. Every subcommand reads JSON input files,
//! runs the engine, and prints a JSON document on stdout. Logs go to stderr.
//!
//! ## Subcommands
//!
//! - `govrisk score`: composite risk of an assessment snapshot.
//! - `govrisk analyze`: unified financial and governance analysis of one case.
//! - `govrisk portfolio`: portfolio insights or an executive report.
//!
//! ```bash
//! govrisk score snapshot.json --action-depth 2
//! govrisk analyze cases.json --case claims-triage
//! govrisk --config engine.yaml portfolio cases.json --report
//! ```
//!
//! ## Exit Codes
//!
//! `0` on success, `1` on I/O, parse, or configuration failure, and
//! [`EXIT_INSUFFICIENT_DATA`] when the requested case is unknown or lacks
//! data for a domain.

pub mod analyze;
pub mod portfolio;
pub mod score;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use govrisk_core::{EngineConfig, InMemoryCaseStore};

/// Exit status for a case that cannot be analyzed from the records given.
pub const EXIT_INSUFFICIENT_DATA: u8 = 2;

/// Load and validate the engine configuration.
///
/// With no path the defaults apply. The file is parsed as YAML, which also
/// accepts JSON documents.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let config = match path {
        None => EngineConfig::default(),
        Some(path) => {
            let text = read_input(path)?;
            serde_yaml::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
    };
    config.validate().context("invalid engine configuration")?;
    Ok(config)
}

pub fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse a `{ "cases": [...] }` records file.
pub fn load_case_store(path: &Path) -> Result<InMemoryCaseStore> {
    let text = read_input(path)?;
    let store = InMemoryCaseStore::from_json(&text)
        .with_context(|| format!("failed to parse case records {}", path.display()))?;
    tracing::debug!(path = %path.display(), cases = store.len(), "loaded case records");
    Ok(store)
}

/// Pretty-print `value` followed by a newline.
pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize output")?;
    writeln!(out).context("failed to write output")?;
    Ok(())
}
