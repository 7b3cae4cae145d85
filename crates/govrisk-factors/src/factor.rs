//! # Factor Results
//!
//! [`FactorResult`] is what every calculator returns: a bounded score, the
//! ordered list of rule contributions that produced it, and any advisory
//! warnings raised along the way.
//!
//! The score is never stored independently of its contributions. It is
//! always `min(10, 1 + Σ contributions)` summed in trace order, which is what
//! lets [`FactorResult::formula`] reproduce the arithmetic exactly.

use serde::{Deserialize, Serialize};

use govrisk_core::RiskFactor;

use crate::rules::Rule;

/// Every factor starts here, even with no contributions.
pub const BASE_SCORE: f64 = 1.0;

/// Ceiling applied after summation.
pub const MAX_SCORE: f64 = 10.0;

/// One rule that fired, with the amount it added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorContribution {
    pub label: String,
    pub weight: f64,
}

impl FactorContribution {
    /// `"<label> (+<weight>)"`, as shown next to the radar chart.
    pub fn display(&self) -> String {
        format!("{} (+{})", self.label, format_number(self.weight))
    }
}

/// Result of scoring one risk dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorResult {
    pub factor: RiskFactor,
    pub score: f64,
    /// Contributions in rule evaluation order.
    pub factors: Vec<FactorContribution>,
    pub inferred_warnings: Vec<String>,
}

impl FactorResult {
    /// `Base(1) + c1 + c2 + ... = total`. With no contributions: `Base(1) = 1`.
    pub fn formula(&self) -> String {
        let mut out = String::from("Base(1)");
        for contribution in &self.factors {
            out.push_str(" + ");
            out.push_str(&format_number(contribution.weight));
        }
        out.push_str(" = ");
        out.push_str(&format_number(self.score));
        out
    }

    /// Contribution labels with their weights.
    pub fn factor_labels(&self) -> Vec<String> {
        self.factors.iter().map(FactorContribution::display).collect()
    }

    /// Sum of contributions, before the base and the ceiling.
    pub fn contribution_total(&self) -> f64 {
        self.factors.iter().map(|c| c.weight).sum()
    }
}

/// Render a score or weight the way the portal does: one decimal at most,
/// with a trailing `.0` dropped.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{value:.1}");
    match fixed.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => fixed,
    }
}

// ---------------------------------------------------------------------------
// FactorTrace
// ---------------------------------------------------------------------------

/// Accumulates contributions and warnings while a calculator walks its rules.
#[derive(Debug)]
pub(crate) struct FactorTrace {
    factor: RiskFactor,
    contributions: Vec<FactorContribution>,
    warnings: Vec<String>,
}

impl FactorTrace {
    pub(crate) fn new(factor: RiskFactor) -> Self {
        Self {
            factor,
            contributions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, rule: &Rule) {
        self.add_weight(rule.label, rule.weight);
    }

    pub(crate) fn add_weight(&mut self, label: &str, weight: f64) {
        tracing::debug!(factor = %self.factor, rule = label, weight, "rule fired");
        self.contributions.push(FactorContribution {
            label: label.to_string(),
            weight,
        });
    }

    /// Record a warning once; repeats are ignored.
    pub(crate) fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.warnings.contains(&message) {
            self.warnings.push(message);
        }
    }

    pub(crate) fn finish(self) -> FactorResult {
        let total = self
            .contributions
            .iter()
            .fold(BASE_SCORE, |acc, c| acc + c.weight);
        FactorResult {
            factor: self.factor,
            score: total.min(MAX_SCORE),
            factors: self.contributions,
            inferred_warnings: self.warnings,
        }
    }
}
