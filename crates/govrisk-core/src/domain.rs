//! # Risk Dimensions and Classifications — Single Source of Truth
//!
//! Defines the [`RiskFactor`] enum with the six scored dimensions, the
//! [`RiskTier`] classification derived from a composite score, and the
//! [`Impact`] / [`Level`] labels used by insights and summaries.
//!
//! Every `match` on `RiskFactor` is exhaustive. Adding a seventh dimension is
//! a compile error until the calculators, weight tables, and reports handle it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the six independent risk dimensions scored from an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    /// Personal-data handling: sensitivity, volume, transfers, retention.
    DataPrivacy,
    /// Exposure surface: APIs, deployment model, integrations.
    Security,
    /// Applicable regulatory regimes, explicit or inferred.
    Regulatory,
    /// Automation, bias testing, explainability, oversight.
    Ethical,
    /// Criticality, complexity, failure impact, redundancy.
    Operational,
    /// Public visibility and trust-critical decisions.
    Reputational,
}

impl RiskFactor {
    /// All factors in canonical evaluation order.
    pub fn all() -> &'static [RiskFactor] {
        &[
            Self::DataPrivacy,
            Self::Security,
            Self::Regulatory,
            Self::Ethical,
            Self::Operational,
            Self::Reputational,
        ]
    }

    /// Snake-case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DataPrivacy => "data_privacy",
            Self::Security => "security",
            Self::Regulatory => "regulatory",
            Self::Ethical => "ethical",
            Self::Operational => "operational",
            Self::Reputational => "reputational",
        }
    }

    /// Human-readable label used in charts and action summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DataPrivacy => "Data Privacy",
            Self::Security => "Security",
            Self::Regulatory => "Regulatory",
            Self::Ethical => "Ethical",
            Self::Operational => "Operational",
            Self::Reputational => "Reputational",
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RiskTier
// ---------------------------------------------------------------------------

/// Discrete classification of a 0–10 risk score.
///
/// Boundaries are closed below: 8.0 is critical, 7.999 is high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Score below 4.
    Low,
    /// Score in [4, 6).
    Medium,
    /// Score in [6, 8).
    High,
    /// Score of 8 or more.
    Critical,
}

impl RiskTier {
    /// Lower bound of the critical tier.
    pub const CRITICAL_FLOOR: f64 = 8.0;
    /// Lower bound of the high tier.
    pub const HIGH_FLOOR: f64 = 6.0;
    /// Lower bound of the medium tier.
    pub const MEDIUM_FLOOR: f64 = 4.0;

    /// Classify a score. Pure function of the score.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::CRITICAL_FLOOR {
            Self::Critical
        } else if score >= Self::HIGH_FLOOR {
            Self::High
        } else if score >= Self::MEDIUM_FLOOR {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Impact / Level
// ---------------------------------------------------------------------------

/// Impact rating carried by every insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// Requires attention now.
    High,
    /// Worth scheduling.
    Medium,
    /// Informational.
    Low,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Coarse level used in generated summary sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Above the upper threshold.
    High,
    /// Above the lower threshold.
    Medium,
    /// Everything else.
    Low,
}

impl Level {
    /// Classify a 0–100 score: above 70 is high, above 40 is medium.
    pub fn from_percent(score: f64) -> Self {
        if score > 70.0 {
            Self::High
        } else if score > 40.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Classify a 0–1 ratio: above 0.8 is high, above 0.6 is medium.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 0.8 {
            Self::High
        } else if ratio > 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}
