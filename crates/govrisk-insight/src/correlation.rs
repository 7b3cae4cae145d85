//! # Cross-Domain Correlation
//!
//! Correlates one case's financial and governance analyses through a fixed
//! set of predicate rules, and folds both into a [`UnifiedAnalysis`] with
//! weighted overall scores and a short list of priority actions.

use std::fmt;

use serde::{Deserialize, Serialize};

use govrisk_core::{EngineConfig, EngineError, Impact, Level, UnifiedWeights};

use crate::financial::FinancialAnalysis;
use crate::governance::GovernanceAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossDomainCategory {
    CostGovernance,
    RiskFinancial,
    ComplianceEfficiency,
    OpportunityOptimization,
}

impl CrossDomainCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CostGovernance => "cost_governance",
            Self::RiskFinancial => "risk_financial",
            Self::ComplianceEfficiency => "compliance_efficiency",
            Self::OpportunityOptimization => "opportunity_optimization",
        }
    }
}

impl fmt::Display for CrossDomainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossDomainInsight {
    /// `{scope}:{category}`, where scope is the case id or `portfolio`.
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub confidence: f64,
    pub financial_impact: String,
    pub governance_impact: String,
    pub recommendations: Vec<String>,
    pub priority: u8,
    pub category: CrossDomainCategory,
}

/// Static content of a cross-domain insight.
#[derive(Debug, Clone, Copy)]
pub struct CrossDomainTemplate {
    pub category: CrossDomainCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub impact: Impact,
    pub confidence: f64,
    pub financial_impact: &'static str,
    pub governance_impact: &'static str,
    pub recommendations: &'static [&'static str],
    pub priority: u8,
}

impl CrossDomainTemplate {
    pub fn build(&self, scope: &str) -> CrossDomainInsight {
        CrossDomainInsight {
            id: format!("{scope}:{}", self.category),
            title: self.title.to_string(),
            description: self.description.to_string(),
            impact: self.impact,
            confidence: self.confidence,
            financial_impact: self.financial_impact.to_string(),
            governance_impact: self.governance_impact.to_string(),
            recommendations: self.recommendations.iter().map(|r| r.to_string()).collect(),
            priority: self.priority,
            category: self.category,
        }
    }
}

/// A template guarded by a predicate over both domains.
pub struct CorrelationRule {
    pub template: CrossDomainTemplate,
    pub applies: fn(&FinancialAnalysis, &GovernanceAnalysis) -> bool,
}

impl fmt::Debug for CorrelationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelationRule")
            .field("title", &self.template.title)
            .finish_non_exhaustive()
    }
}

/// The four correlation rules, in evaluation order.
pub const CORRELATION_RULES: &[CorrelationRule] = &[
    CorrelationRule {
        template: CrossDomainTemplate {
            category: CrossDomainCategory::CostGovernance,
            title: "Cost Optimization vs Compliance Trade-off",
            description: "High cost optimization potential exists but may impact compliance requirements. Need balanced approach.",
            impact: Impact::High,
            confidence: 0.82,
            financial_impact: "High cost savings potential",
            governance_impact: "Risk of compliance gaps",
            recommendations: &[
                "Assess compliance impact of cost optimization",
                "Develop balanced optimization strategy",
                "Monitor compliance metrics during optimization",
            ],
            priority: 1,
        },
        applies: |f, g| f.cost_optimization_potential > 70.0 && g.compliance_score < 0.7,
    },
    CorrelationRule {
        template: CrossDomainTemplate {
            category: CrossDomainCategory::RiskFinancial,
            title: "Dual Risk Exposure",
            description: "Both financial and governance risks are elevated, indicating systemic issues requiring immediate attention.",
            impact: Impact::High,
            confidence: 0.88,
            financial_impact: "High financial risk exposure",
            governance_impact: "High governance risk exposure",
            recommendations: &[
                "Implement comprehensive risk mitigation strategy",
                "Establish cross-functional risk monitoring",
                "Develop emergency response procedures",
            ],
            priority: 1,
        },
        applies: |f, g| f.risk_score > 60.0 && g.risk_score > 60.0,
    },
    CorrelationRule {
        template: CrossDomainTemplate {
            category: CrossDomainCategory::ComplianceEfficiency,
            title: "Over-Compliance Impact on ROI",
            description: "High compliance achieved but at the cost of financial performance. Consider efficiency optimization.",
            impact: Impact::Medium,
            confidence: 0.75,
            financial_impact: "Suboptimal ROI due to compliance overhead",
            governance_impact: "Excellent compliance status",
            recommendations: &[
                "Optimize compliance processes for efficiency",
                "Identify compliance cost reduction opportunities",
                "Balance compliance requirements with cost effectiveness",
            ],
            priority: 2,
        },
        applies: |f, g| g.compliance_score > 0.8 && f.roi < 1.5,
    },
    CorrelationRule {
        template: CrossDomainTemplate {
            category: CrossDomainCategory::OpportunityOptimization,
            title: "High Opportunity with Strong Governance",
            description: "Excellent opportunity for growth with solid governance foundation. Ready for expansion.",
            impact: Impact::Low,
            confidence: 0.90,
            financial_impact: "High growth opportunity",
            governance_impact: "Strong governance foundation",
            recommendations: &[
                "Proceed with growth initiatives",
                "Leverage governance excellence for market advantage",
                "Consider governance certification for competitive edge",
            ],
            priority: 3,
        },
        applies: |f, g| f.opportunity_score > 70.0 && g.framework_coverage > 0.8,
    },
];

// ---------------------------------------------------------------------------
// Unified analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedAnalysis {
    pub case_id: String,
    pub financial_analysis: FinancialAnalysis,
    pub governance_analysis: GovernanceAnalysis,
    /// Sorted by priority, most urgent first.
    pub cross_domain_insights: Vec<CrossDomainInsight>,
    pub overall_risk_score: f64,
    pub overall_opportunity_score: f64,
    pub priority_actions: Vec<String>,
    pub summary: String,
}

/// Risk or cost-optimization score above which an action is raised.
const ACTION_SCORE_ABOVE: f64 = 70.0;
const ACTION_COMPLIANCE_BELOW: f64 = 0.7;
/// Recommendations taken from each urgent cross-domain insight.
const RECOMMENDATIONS_PER_INSIGHT: usize = 2;
const URGENT_PRIORITY: u8 = 2;

#[derive(Debug, Clone)]
pub struct CorrelationEngine {
    weights: UnifiedWeights,
    priority_action_limit: usize,
}

impl Default for CorrelationEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        Self {
            weights: config.unified_weights,
            priority_action_limit: config.priority_action_limit,
        }
    }
}

impl CorrelationEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            weights: config.unified_weights,
            priority_action_limit: config.priority_action_limit,
        })
    }

    /// Every rule that holds, sorted by priority (stable).
    pub fn correlate(
        &self,
        financial: &FinancialAnalysis,
        governance: &GovernanceAnalysis,
    ) -> Vec<CrossDomainInsight> {
        let mut insights: Vec<CrossDomainInsight> = CORRELATION_RULES
            .iter()
            .filter(|rule| (rule.applies)(financial, governance))
            .map(|rule| rule.template.build(&financial.case_id))
            .collect();
        insights.sort_by_key(|i| i.priority);
        insights
    }

    pub fn overall_risk_score(&self, financial_risk: f64, governance_risk: f64) -> f64 {
        self.weights.risk_financial * financial_risk
            + self.weights.risk_governance * governance_risk
    }

    /// Compliance is a ratio and is scaled to 0–100 before weighting.
    pub fn overall_opportunity_score(&self, financial_opportunity: f64, compliance: f64) -> f64 {
        self.weights.opportunity_financial * financial_opportunity
            + self.weights.opportunity_governance * compliance * 100.0
    }

    pub fn unify(
        &self,
        financial: FinancialAnalysis,
        governance: GovernanceAnalysis,
    ) -> UnifiedAnalysis {
        let cross_domain_insights = self.correlate(&financial, &governance);
        let overall_risk_score =
            self.overall_risk_score(financial.risk_score, governance.risk_score);
        let overall_opportunity_score =
            self.overall_opportunity_score(financial.opportunity_score, governance.compliance_score);
        let priority_actions =
            self.priority_actions(&financial, &governance, &cross_domain_insights);
        let summary = unified_summary(&financial, &governance, &cross_domain_insights);

        tracing::info!(
            case_id = %financial.case_id,
            overall_risk_score,
            overall_opportunity_score,
            cross_domain = cross_domain_insights.len(),
            "unified analysis complete"
        );

        UnifiedAnalysis {
            case_id: financial.case_id.clone(),
            financial_analysis: financial,
            governance_analysis: governance,
            cross_domain_insights,
            overall_risk_score,
            overall_opportunity_score,
            priority_actions,
            summary,
        }
    }

    fn priority_actions(
        &self,
        financial: &FinancialAnalysis,
        governance: &GovernanceAnalysis,
        insights: &[CrossDomainInsight],
    ) -> Vec<String> {
        let mut candidates: Vec<&str> = Vec::new();
        if financial.risk_score > ACTION_SCORE_ABOVE || governance.risk_score > ACTION_SCORE_ABOVE {
            candidates.push("Immediate risk mitigation required");
        }
        if governance.compliance_score < ACTION_COMPLIANCE_BELOW {
            candidates.push("Address critical compliance gaps");
        }
        if financial.cost_optimization_potential > ACTION_SCORE_ABOVE {
            candidates.push("Implement cost optimization strategies");
        }
        for insight in insights.iter().filter(|i| i.priority <= URGENT_PRIORITY) {
            candidates.extend(
                insight
                    .recommendations
                    .iter()
                    .take(RECOMMENDATIONS_PER_INSIGHT)
                    .map(String::as_str),
            );
        }

        let mut actions: Vec<String> = Vec::new();
        for candidate in candidates {
            if actions.len() == self.priority_action_limit {
                break;
            }
            if !actions.iter().any(|a| a == candidate) {
                actions.push(candidate.to_string());
            }
        }
        actions
    }
}

fn unified_summary(
    financial: &FinancialAnalysis,
    governance: &GovernanceAnalysis,
    insights: &[CrossDomainInsight],
) -> String {
    let risk = Level::from_percent((financial.risk_score + governance.risk_score) / 2.0);
    let opportunity =
        Level::from_percent((financial.opportunity_score + governance.compliance_score * 100.0) / 2.0);
    let urgent = insights.iter().filter(|i| i.priority <= URGENT_PRIORITY).count();
    format!(
        "Unified analysis shows {risk} risk level and {opportunity} opportunity potential. {urgent} cross-domain insights identified requiring coordinated action across financial and governance teams."
    )
}
