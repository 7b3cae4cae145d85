//! # govrisk-factors — Factor Calculators and Composite Risk
//!
//! Scores an [`AssessmentSnapshot`](govrisk_core::AssessmentSnapshot) along
//! six independent dimensions and blends them into one composite score.
//!
//! ## Structure
//!
//! - [`rules`]: the rule tables. Every label, weight, threshold, and warning
//!   text lives here as a named constant.
//! - [`calculators`]: one pure function per [`RiskFactor`](govrisk_core::RiskFactor).
//!   Each walks its rule table in a fixed order and returns a [`FactorResult`].
//! - [`composite`]: the weighted blend, tier classification, and the ranked
//!   action summary.
//!
//! ## Invariants
//!
//! - Every factor score lies in `[1, 10]` and equals `min(10, 1 + Σ weights)`
//!   over its recorded contributions.
//! - Calculators are pure. The same snapshot always produces the same
//!   contributions, in the same order, with the same warnings.
//! - A regime that applies both explicitly and by inference is counted once.

pub mod calculators;
pub mod composite;
pub mod factor;
pub mod rules;

pub use calculators::{
    calculate, calculate_all, calculate_data_privacy, calculate_ethical, calculate_operational,
    calculate_regulatory, calculate_reputational, calculate_security,
};
pub use composite::{
    calculate_composite, ActionLevel, ActionSummaryEntry, ChartPoint, CompositeCalculator,
    CompositeRiskResult, TierCounts,
};
pub use factor::{format_number, FactorContribution, FactorResult, BASE_SCORE, MAX_SCORE};
