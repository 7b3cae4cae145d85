//! # govrisk-core — Foundational Types for the Governance Risk Engine
//!
//! Every other `govrisk-*` crate depends on this one; it depends on nothing
//! internal. It defines what the engine consumes and how it is configured:
//!
//! - [`AssessmentSnapshot`]: the sparse questionnaire answers scored by the
//!   factor calculators.
//! - [`FinancialRecord`] / [`GovernanceRecord`]: per-case domain data, and the
//!   [`CaseRecordSource`] trait the insight engine reads them through.
//! - [`RiskFactor`], [`RiskTier`], [`Impact`]: the shared vocabulary of scores
//!   and insights. One definition each, exhaustive `match` everywhere.
//! - [`EngineConfig`]: weight tables and limits, validated before use.
//! - [`EngineError`]: the error hierarchy.
//! - [`AnalysisCache`] and [`Clock`]: explicit, injected state for the one
//!   place results are reused.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Inputs and outputs implement `Serialize`/`Deserialize` with camelCase
//!   field names on the wire.

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod records;
pub mod snapshot;
pub mod temporal;

pub use cache::{AnalysisCache, CacheStats};
pub use config::{CompositeWeights, EngineConfig, UnifiedWeights};
pub use domain::{Impact, Level, RiskFactor, RiskTier};
pub use error::{AnalysisDomain, ConfigurationError, EngineError};
pub use records::{
    CaseRecord, CaseRecordSource, CostCategory, FinancialRecord, FrameworkAssessment,
    FrameworkKind, GovernanceRecord, InMemoryCaseStore, RecordedRisk,
};
pub use snapshot::{AssessmentSnapshot, SectorSelection};
pub use temporal::{Clock, FixedClock, SystemClock};
