//! # Financial Agent
//!
//! Scores a case's FinOps record for risk, opportunity, and cost-optimization
//! potential (all on 0–100) and raises typed insights from a fixed rule list.
//!
//! Every ratio is taken against total investment. A record with no
//! investment yields 0 for every ratio; that is logged, not rejected.

use serde::{Deserialize, Serialize};

use govrisk_core::{
    AnalysisDomain, CaseRecordSource, CostCategory, EngineConfig, EngineError, FinancialRecord,
    Impact, Level,
};

use crate::insight::{
    distinct_recommendations, sort_by_priority, FinancialInsight, FinancialInsightType,
    InsightTemplate,
};

// ---------------------------------------------------------------------------
// Score tables
// ---------------------------------------------------------------------------

/// Upper bound of every financial score.
pub const SCORE_CAP: f64 = 100.0;

/// Cost categories considered for concentration risk. API spend is excluded.
const CONCENTRATION_CATEGORIES: [CostCategory; 3] = [
    CostCategory::Development,
    CostCategory::Infrastructure,
    CostCategory::Operations,
];
const CONCENTRATION_THRESHOLD: f64 = 0.4;

/// `(threshold, points)` pairs, checked in order; the first match wins.
type Ladder = [(f64, f64); 2];

const ROI_RISK: Ladder = [(1.2, 30.0), (1.5, 15.0)];
const EFFICIENCY_RISK: Ladder = [(1.0, 25.0), (1.2, 10.0)];
const CONCENTRATION_POINTS: f64 = 20.0;
const GROWTH_RISK_BELOW: f64 = 0.05;
const GROWTH_RISK_POINTS: f64 = 15.0;

const ROI_OPPORTUNITY: Ladder = [(2.0, 25.0), (1.5, 15.0)];
const GROWTH_OPPORTUNITY: Ladder = [(0.2, 25.0), (0.1, 15.0)];
const NET_VALUE_OPPORTUNITY: Ladder = [(1_000_000.0, 25.0), (500_000.0, 15.0)];
const EFFICIENCY_OPPORTUNITY: Ladder = [(2.0, 25.0), (1.5, 15.0)];

const COST_SHARE_POTENTIAL: Ladder = [(0.3, 25.0), (0.2, 15.0)];

/// Points for the first rung whose threshold `value` is strictly below.
fn below(ladder: &Ladder, value: f64) -> f64 {
    ladder
        .iter()
        .find(|(threshold, _)| value < *threshold)
        .map_or(0.0, |(_, points)| *points)
}

/// Points for the first rung whose threshold `value` strictly exceeds.
fn above(ladder: &Ladder, value: f64) -> f64 {
    ladder
        .iter()
        .find(|(threshold, _)| value > *threshold)
        .map_or(0.0, |(_, points)| *points)
}

/// Additive risk penalties, capped at 100.
pub fn risk_score(record: &FinancialRecord) -> f64 {
    let concentration = CONCENTRATION_CATEGORIES
        .iter()
        .map(|c| record.cost_share(*c))
        .fold(0.0, f64::max);

    let mut score =
        below(&ROI_RISK, record.roi) + below(&EFFICIENCY_RISK, record.investment_efficiency());
    if concentration > CONCENTRATION_THRESHOLD {
        score += CONCENTRATION_POINTS;
    }
    if record.value_growth_rate < GROWTH_RISK_BELOW {
        score += GROWTH_RISK_POINTS;
    }
    score.min(SCORE_CAP)
}

/// Additive opportunity bonuses, capped at 100.
pub fn opportunity_score(record: &FinancialRecord) -> f64 {
    let score = above(&ROI_OPPORTUNITY, record.roi)
        + above(&GROWTH_OPPORTUNITY, record.value_growth_rate)
        + above(&NET_VALUE_OPPORTUNITY, record.net_value)
        + above(&EFFICIENCY_OPPORTUNITY, record.investment_efficiency());
    score.min(SCORE_CAP)
}

/// 25 per category above 30% of investment, 15 per category above 20%.
pub fn cost_optimization_potential(record: &FinancialRecord) -> f64 {
    CostCategory::all()
        .iter()
        .map(|c| above(&COST_SHARE_POTENTIAL, record.cost_share(*c)))
        .sum::<f64>()
        .min(SCORE_CAP)
}

// ---------------------------------------------------------------------------
// Insight rules
// ---------------------------------------------------------------------------

const LOW_ROI_BELOW: f64 = 1.5;
const TARGET_ROI: f64 = 2.0;
const HIGH_COST_SHARE: f64 = 0.3;
const SLOW_GROWTH_BELOW: f64 = 0.1;
const TARGET_GROWTH: f64 = 0.15;
const LOW_EFFICIENCY_BELOW: f64 = 1.2;
const TARGET_EFFICIENCY: f64 = 1.5;

pub const LOW_ROI: InsightTemplate<FinancialInsightType> = InsightTemplate {
    kind: FinancialInsightType::RoiImprovement,
    title: "Low ROI Alert",
    impact: Impact::High,
    confidence: 0.85,
    priority: 1,
    recommendations: &[
        "Review cost structure for optimization opportunities",
        "Assess value delivery mechanisms",
        "Consider scaling strategies to improve unit economics",
    ],
};

pub const HIGH_COST_CONCENTRATION: InsightTemplate<FinancialInsightType> = InsightTemplate {
    kind: FinancialInsightType::CostOptimization,
    title: "High Cost Concentration",
    impact: Impact::Medium,
    confidence: 0.78,
    priority: 2,
    recommendations: &[
        "Implement cost monitoring and alerting",
        "Explore alternative solutions for high-cost areas",
        "Consider automation to reduce operational costs",
    ],
};

pub const SLOW_VALUE_GROWTH: InsightTemplate<FinancialInsightType> = InsightTemplate {
    kind: FinancialInsightType::TrendAnalysis,
    title: "Slow Value Growth",
    impact: Impact::Medium,
    confidence: 0.72,
    priority: 3,
    recommendations: &[
        "Review go-to-market strategy",
        "Assess customer adoption barriers",
        "Consider partnership or expansion opportunities",
    ],
};

pub const INVESTMENT_EFFICIENCY_RISK: InsightTemplate<FinancialInsightType> = InsightTemplate {
    kind: FinancialInsightType::RiskAlert,
    title: "Investment Efficiency Risk",
    impact: Impact::High,
    confidence: 0.81,
    priority: 1,
    recommendations: &[
        "Review investment allocation strategy",
        "Assess delivery timeline and milestones",
        "Consider phasing investments based on value delivery",
    ],
};

/// Evaluate the insight rules in order, then sort by priority.
pub fn generate_insights(record: &FinancialRecord) -> Vec<FinancialInsight> {
    let mut insights = Vec::new();

    if record.roi < LOW_ROI_BELOW {
        insights.push(LOW_ROI.build(
            format!(
                "Current ROI of {:.2}x is below optimal threshold. Consider cost optimization or value enhancement strategies.",
                record.roi
            ),
            [("currentROI", record.roi), ("targetROI", TARGET_ROI)],
        ));
    }

    let high_cost: Vec<&str> = CostCategory::all()
        .iter()
        .filter(|c| record.cost_share(**c) > HIGH_COST_SHARE)
        .map(|c| c.key())
        .collect();
    if !high_cost.is_empty() {
        insights.push(HIGH_COST_CONCENTRATION.build(
            format!(
                "High cost concentration in {} areas. Consider optimization strategies.",
                high_cost.join(", ")
            ),
            CostCategory::all()
                .iter()
                .map(|c| (c.key(), record.cost_share(*c))),
        ));
    }

    if record.value_growth_rate < SLOW_GROWTH_BELOW {
        insights.push(SLOW_VALUE_GROWTH.build(
            format!(
                "Value growth rate of {:.1}% indicates slow adoption or market penetration.",
                record.value_growth_rate * 100.0
            ),
            [
                ("growthRate", record.value_growth_rate),
                ("targetRate", TARGET_GROWTH),
            ],
        ));
    }

    let efficiency = record.investment_efficiency();
    if efficiency < LOW_EFFICIENCY_BELOW {
        insights.push(INVESTMENT_EFFICIENCY_RISK.build(
            format!(
                "Investment efficiency ratio of {efficiency:.2} indicates potential over-investment or under-delivery."
            ),
            [("efficiency", efficiency), ("target", TARGET_EFFICIENCY)],
        ));
    }

    sort_by_priority(&mut insights);
    insights
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    pub case_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_title: Option<String>,
    /// ROI multiple copied from the record; the correlation rules read it.
    pub roi: f64,
    /// Sorted by priority, most urgent first.
    pub insights: Vec<FinancialInsight>,
    pub summary: String,
    pub risk_score: f64,
    pub opportunity_score: f64,
    pub cost_optimization_potential: f64,
    pub recommendations: Vec<String>,
}

/// Compounded projection of a record's net value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceProjection {
    pub months: u32,
    #[serde(rename = "predictedROI")]
    pub predicted_roi: f64,
    pub predicted_net_value: f64,
    pub confidence: f64,
    pub factors: Vec<String>,
}

/// Growth above which market conditions read as favorable.
const FAVORABLE_GROWTH: f64 = 0.15;
const MAX_PROJECTION_CONFIDENCE: f64 = 0.9;
/// A case cannot lose more than all of its value.
const MIN_PROJECTED_GROWTH: f64 = -1.0;

#[derive(Debug, Clone)]
pub struct FinancialAgent {
    recommendation_limit: usize,
}

impl Default for FinancialAgent {
    fn default() -> Self {
        Self {
            recommendation_limit: EngineConfig::default().recommendation_limit,
        }
    }
}

impl FinancialAgent {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            recommendation_limit: config.recommendation_limit,
        })
    }

    /// Analyze the financial record of `case_id`.
    ///
    /// Fails with [`EngineError::CaseNotFound`] for an unknown case and with
    /// [`EngineError::MissingData`] when the case has no financial record.
    pub fn analyze(
        &self,
        case_id: &str,
        source: &dyn CaseRecordSource,
    ) -> Result<FinancialAnalysis, EngineError> {
        let record = load(case_id, source)?;
        Ok(self.analyze_record(case_id, source.case_title(case_id), &record))
    }

    /// Analyze a record that is already in hand.
    pub fn analyze_record(
        &self,
        case_id: &str,
        case_title: Option<String>,
        record: &FinancialRecord,
    ) -> FinancialAnalysis {
        if !record.has_investment() {
            tracing::warn!(case_id, "total investment is zero; investment ratios evaluate to 0");
        }

        let insights = generate_insights(record);
        let risk_score = risk_score(record);
        let opportunity_score = opportunity_score(record);
        let summary = summary(&insights, risk_score, opportunity_score);
        let recommendations = distinct_recommendations(&insights, self.recommendation_limit);

        tracing::debug!(
            case_id,
            risk_score,
            opportunity_score,
            insights = insights.len(),
            "financial analysis complete"
        );

        FinancialAnalysis {
            case_id: case_id.to_string(),
            case_title,
            roi: record.roi,
            insights,
            summary,
            risk_score,
            opportunity_score,
            cost_optimization_potential: cost_optimization_potential(record),
            recommendations,
        }
    }

    /// Project net value `months` ahead at the recorded growth rate.
    pub fn project(
        &self,
        case_id: &str,
        source: &dyn CaseRecordSource,
        months: u32,
    ) -> Result<PerformanceProjection, EngineError> {
        let record = load(case_id, source)?;
        Ok(project(&record, months))
    }
}

fn load(case_id: &str, source: &dyn CaseRecordSource) -> Result<FinancialRecord, EngineError> {
    if !source.contains_case(case_id) {
        return Err(EngineError::CaseNotFound(case_id.to_string()));
    }
    source
        .financial_record(case_id)
        .ok_or_else(|| EngineError::MissingData {
            case_id: case_id.to_string(),
            domain: AnalysisDomain::Financial,
        })
}

/// Compound `netValue` by `(1 + growth)^(months / 12)`.
///
/// Growth is floored at -100%; confidence stays within [0, 0.9].
pub fn project(record: &FinancialRecord, months: u32) -> PerformanceProjection {
    let growth = record.value_growth_rate.max(MIN_PROJECTED_GROWTH);
    let factor = (1.0 + growth).powf(f64::from(months) / 12.0);
    let predicted_net_value = record.net_value * factor;
    let market = if growth > FAVORABLE_GROWTH {
        "Favorable"
    } else {
        "Challenging"
    };

    PerformanceProjection {
        months,
        predicted_roi: record.share_of_investment(predicted_net_value),
        predicted_net_value,
        confidence: (0.5 + growth * 2.0).clamp(0.0, MAX_PROJECTION_CONFIDENCE),
        factors: vec![
            format!("Current growth rate: {:.1}%", growth * 100.0),
            format!("Investment efficiency: {:.2}", record.investment_efficiency()),
            format!("Market conditions: {market}"),
        ],
    }
}

fn summary(insights: &[FinancialInsight], risk: f64, opportunity: f64) -> String {
    let critical = insights.iter().filter(|i| i.is_critical()).count();
    format!(
        "Financial analysis shows {} risk level and {} opportunity potential. {} critical insights identified requiring immediate attention.",
        Level::from_percent(risk),
        Level::from_percent(opportunity),
        critical
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use govrisk_core::{CaseRecord, InMemoryCaseStore};
    use pretty_assertions::assert_eq;

    fn record() -> FinancialRecord {
        FinancialRecord {
            roi: 2.5,
            total_investment: 1_000_000.0,
            net_value: 2_500_000.0,
            dev_cost_base: 200_000.0,
            infra_cost_base: 150_000.0,
            op_cost_base: 100_000.0,
            api_cost_base: 50_000.0,
            value_growth_rate: 0.25,
        }
    }

    fn titles(insights: &[FinancialInsight]) -> Vec<&str> {
        insights.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn weak_record_scores_seventy_risk_and_no_opportunity() {
        let weak = FinancialRecord {
            roi: 1.0,
            net_value: 400_000.0,
            total_investment: 500_000.0,
            value_growth_rate: 0.03,
            ..Default::default()
        };
        assert_eq!(risk_score(&weak), 70.0);
        assert_eq!(opportunity_score(&weak), 0.0);
    }

    #[test]
    fn strong_record_scores_full_opportunity() {
        let strong = record();
        assert_eq!(risk_score(&strong), 0.0);
        assert_eq!(opportunity_score(&strong), 100.0);
        assert!(generate_insights(&strong).is_empty());
    }

    #[test]
    fn risk_ladders_take_the_first_matching_rung() {
        let r = FinancialRecord {
            roi: 1.3,
            net_value: 1_100_000.0,
            ..record()
        };
        // ROI in [1.2, 1.5) adds 15, efficiency 1.1 adds 10.
        assert_eq!(risk_score(&r), 25.0);
    }

    #[test]
    fn concentration_ignores_api_spend() {
        let api_heavy = FinancialRecord {
            api_cost_base: 600_000.0,
            ..record()
        };
        assert_eq!(risk_score(&api_heavy), 0.0);

        let dev_heavy = FinancialRecord {
            dev_cost_base: 450_000.0,
            ..record()
        };
        assert_eq!(risk_score(&dev_heavy), 20.0);
    }

    #[test]
    fn cost_potential_counts_every_category() {
        let r = FinancialRecord {
            dev_cost_base: 350_000.0,
            infra_cost_base: 250_000.0,
            op_cost_base: 100_000.0,
            api_cost_base: 310_000.0,
            ..record()
        };
        assert_eq!(cost_optimization_potential(&r), 65.0);
    }

    #[test]
    fn insights_sorted_with_ties_in_rule_order() {
        let r = FinancialRecord {
            roi: 1.0,
            net_value: 900_000.0,
            value_growth_rate: 0.05,
            infra_cost_base: 400_000.0,
            ..record()
        };
        let insights = generate_insights(&r);
        assert_eq!(
            titles(&insights),
            vec![
                "Low ROI Alert",
                "Investment Efficiency Risk",
                "High Cost Concentration",
                "Slow Value Growth"
            ]
        );
        assert_eq!(
            insights[0].description,
            "Current ROI of 1.00x is below optimal threshold. Consider cost optimization or value enhancement strategies."
        );
        assert_eq!(
            insights[2].description,
            "High cost concentration in infra areas. Consider optimization strategies."
        );
        assert_eq!(
            insights[3].description,
            "Value growth rate of 5.0% indicates slow adoption or market penetration."
        );
        assert_eq!(insights[2].metrics["infra"], 0.4);
    }

    #[test]
    fn zero_investment_degrades_ratios_to_zero() {
        let r = FinancialRecord {
            roi: 2.5,
            total_investment: 0.0,
            net_value: 2_000_000.0,
            value_growth_rate: 0.3,
            ..Default::default()
        };
        let analysis = FinancialAgent::default().analyze_record("c", None, &r);
        // Efficiency 0 adds 25 risk and raises the efficiency alert.
        assert_eq!(analysis.risk_score, 25.0);
        assert_eq!(analysis.cost_optimization_potential, 0.0);
        assert_eq!(titles(&analysis.insights), vec!["Investment Efficiency Risk"]);
    }

    #[test]
    fn summary_counts_critical_insights() {
        let weak = FinancialRecord {
            roi: 1.0,
            net_value: 400_000.0,
            total_investment: 500_000.0,
            value_growth_rate: 0.03,
            ..Default::default()
        };
        let analysis = FinancialAgent::default().analyze_record("c", None, &weak);
        assert_eq!(
            analysis.summary,
            "Financial analysis shows medium risk level and low opportunity potential. 2 critical insights identified requiring immediate attention."
        );
        assert_eq!(analysis.recommendations.len(), 5);
        assert_eq!(
            analysis.recommendations[0],
            "Review cost structure for optimization opportunities"
        );
    }

    #[test]
    fn analyze_distinguishes_missing_case_and_missing_data() {
        let store = InMemoryCaseStore::from_cases([
            CaseRecord {
                id: "funded".into(),
                title: Some("Funded".into()),
                financial: Some(record()),
                governance: None,
            },
            CaseRecord {
                id: "bare".into(),
                title: None,
                financial: None,
                governance: None,
            },
        ]);
        let agent = FinancialAgent::default();

        let analysis = agent.analyze("funded", &store).unwrap();
        assert_eq!(analysis.case_title.as_deref(), Some("Funded"));

        let err = agent.analyze("bare", &store).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingData {
                domain: AnalysisDomain::Financial,
                ..
            }
        ));

        let err = agent.analyze("ghost", &store).unwrap_err();
        assert!(matches!(err, EngineError::CaseNotFound(_)));
    }

    #[test]
    fn projection_compounds_growth() {
        let r = FinancialRecord {
            value_growth_rate: 0.21,
            net_value: 1_000_000.0,
            total_investment: 500_000.0,
            ..Default::default()
        };
        let projection = project(&r, 24);
        assert!((projection.predicted_net_value - 1_464_100.0).abs() < 1e-6);
        assert!((projection.predicted_roi - 2.9282).abs() < 1e-9);
        assert_eq!(projection.confidence, 0.9);
        assert_eq!(
            projection.factors,
            vec![
                "Current growth rate: 21.0%".to_string(),
                "Investment efficiency: 2.00".to_string(),
                "Market conditions: Favorable".to_string()
            ]
        );
    }

    #[test]
    fn projection_of_collapsing_value_stays_finite() {
        let r = FinancialRecord {
            value_growth_rate: -1.5,
            net_value: 1_000_000.0,
            total_investment: 500_000.0,
            ..Default::default()
        };
        let projection = project(&r, 6);
        assert_eq!(projection.predicted_net_value, 0.0);
        assert_eq!(projection.predicted_roi, 0.0);
        assert_eq!(projection.confidence, 0.0);
        assert_eq!(projection.factors[0], "Current growth rate: -100.0%");

        let shrinking = FinancialRecord {
            value_growth_rate: -0.1,
            ..r
        };
        let projection = project(&shrinking, 12);
        assert!((projection.predicted_net_value - 900_000.0).abs() < 1e-6);
        assert!((projection.confidence - 0.3).abs() < 1e-12);
    }

    #[test]
    fn analysis_serializes_camel_case() {
        let analysis = FinancialAgent::default().analyze_record("c1", None, &record());
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["caseId"], "c1");
        assert_eq!(json["opportunityScore"], 100.0);
        assert!(json.get("caseTitle").is_none());
    }
}
