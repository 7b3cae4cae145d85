//! # Error Hierarchy
//!
//! Structured error types for the engine, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Scoring is pure computation, so the taxonomy is small:
//!
//! - [`EngineError::MissingData`]: an analysis was requested for a case that
//!   has no records at all for the required domain. Absent *optional* fields
//!   never produce this error; they degrade to "no contribution".
//! - [`EngineError::CaseNotFound`]: the record source does not know the case.
//! - [`ConfigurationError`]: a weight table or tunable is invalid.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The analysis domain a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisDomain {
    /// FinOps data: ROI, investment, cost breakdown, growth.
    Financial,
    /// Framework assessments and the recorded risk register.
    Governance,
}

impl fmt::Display for AnalysisDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Financial => write!(f, "financial"),
            Self::Governance => write!(f, "governance"),
        }
    }
}

/// Top-level error type for the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The case exists but has no records for the requested domain.
    #[error("no {domain} data recorded for case {case_id}")]
    MissingData {
        /// The case that was analyzed.
        case_id: String,
        /// The domain with no records.
        domain: AnalysisDomain,
    },

    /// The record source has no case with this identifier.
    #[error("case not found: {0}")]
    CaseNotFound(String),

    /// Invalid weight table or tunable.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl EngineError {
    /// Message suitable for display to end users.
    ///
    /// Missing data is presented as an insufficiency rather than a failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingData { .. } => "insufficient data to compute this score".to_string(),
            Self::CaseNotFound(id) => format!("case {id} was not found"),
            Self::Configuration(e) => format!("engine misconfigured: {e}"),
        }
    }

    /// Whether the error is a data insufficiency (as opposed to a setup fault).
    pub fn is_data_insufficiency(&self) -> bool {
        matches!(self, Self::MissingData { .. } | Self::CaseNotFound(_))
    }
}

/// Errors raised when validating [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A weight table does not sum to 1.0.
    #[error("weight table {table} sums to {sum}, expected 1.0")]
    WeightSum {
        /// Name of the offending table.
        table: &'static str,
        /// The actual sum.
        sum: f64,
    },

    /// A single weight is negative or not finite.
    #[error("weight {key} in table {table} is invalid: {weight}")]
    InvalidWeight {
        /// Name of the table.
        table: &'static str,
        /// Name of the weight.
        key: &'static str,
        /// The rejected value.
        weight: f64,
    },

    /// A tunable is outside its permitted range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Configuration field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}
