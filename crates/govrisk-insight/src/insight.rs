//! # Insights
//!
//! The typed findings produced by the domain agents. An [`Insight`] is built
//! from a static [`InsightTemplate`] (title, impact, confidence, priority,
//! recommendations) plus a description and metrics computed from the record
//! that triggered it.
//!
//! Lower priority numbers are more urgent. Sorting is always stable so rules
//! that tie keep their evaluation order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use govrisk_core::Impact;

/// Kind of a financial finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialInsightType {
    CostOptimization,
    RoiImprovement,
    RiskAlert,
    TrendAnalysis,
}

impl fmt::Display for FinancialInsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::CostOptimization => "cost_optimization",
            Self::RoiImprovement => "roi_improvement",
            Self::RiskAlert => "risk_alert",
            Self::TrendAnalysis => "trend_analysis",
        };
        f.write_str(s)
    }
}

/// Kind of a governance finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernanceInsightType {
    ComplianceAlert,
    RiskAssessment,
    FrameworkGap,
    BestPractice,
}

impl fmt::Display for GovernanceInsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ComplianceAlert => "compliance_alert",
            Self::RiskAssessment => "risk_assessment",
            Self::FrameworkGap => "framework_gap",
            Self::BestPractice => "best_practice",
        };
        f.write_str(s)
    }
}

/// A ranked finding from one domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight<K> {
    #[serde(rename = "type")]
    pub kind: K,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    /// In [0, 1].
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub metrics: BTreeMap<String, f64>,
    /// 1 is the most urgent.
    pub priority: u8,
}

pub type FinancialInsight = Insight<FinancialInsightType>;
pub type GovernanceInsight = Insight<GovernanceInsightType>;

impl<K> Insight<K> {
    /// Priority 1 or 2.
    pub fn is_critical(&self) -> bool {
        self.priority <= CRITICAL_PRIORITY
    }
}

/// Insights at or below this priority count as critical in summaries.
pub const CRITICAL_PRIORITY: u8 = 2;

/// The fixed part of an insight rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightTemplate<K: 'static> {
    pub kind: K,
    pub title: &'static str,
    pub impact: Impact,
    pub confidence: f64,
    pub priority: u8,
    pub recommendations: &'static [&'static str],
}

impl<K: Copy> InsightTemplate<K> {
    /// Instantiate the template for one record.
    pub fn build<'a>(
        &self,
        description: String,
        metrics: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Insight<K> {
        Insight {
            kind: self.kind,
            title: self.title.to_string(),
            description,
            impact: self.impact,
            confidence: self.confidence,
            recommendations: self.recommendations.iter().map(|r| r.to_string()).collect(),
            metrics: metrics
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            priority: self.priority,
        }
    }
}

/// Stable sort, most urgent first.
pub fn sort_by_priority<K>(insights: &mut [Insight<K>]) {
    insights.sort_by_key(|i| i.priority);
}

/// First `limit` distinct recommendations, in insight order.
pub fn distinct_recommendations<K>(insights: &[Insight<K>], limit: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for rec in insights.iter().flat_map(|i| i.recommendations.iter()) {
        if out.len() == limit {
            break;
        }
        if !out.contains(rec) {
            out.push(rec.clone());
        }
    }
    out
}
