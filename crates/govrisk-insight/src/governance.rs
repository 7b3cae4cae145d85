//! # Governance Agent
//!
//! Scores a case's framework assessments and risk register:
//!
//! - compliance score: mean completion ratio over assessed frameworks, in
//!   [0, 1]. No assessed frameworks scores 0 rather than failing.
//! - risk score: mean weight of recorded risk levels, scaled to 0–100.
//! - framework coverage: assessed frameworks out of the two tracked.
//!
//! An empty governance record is valid input. Only a case with no
//! governance record at all is a [`EngineError::MissingData`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use govrisk_core::{
    AnalysisDomain, CaseRecordSource, Clock, EngineConfig, EngineError, FrameworkAssessment,
    FrameworkKind, GovernanceRecord, Impact, Level, SystemClock,
};

use crate::insight::{
    distinct_recommendations, sort_by_priority, GovernanceInsight, GovernanceInsightType,
    InsightTemplate,
};

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Weight of a declared risk level. Unknown levels weigh nothing.
pub fn risk_level_weight(level: &str) -> f64 {
    match level.to_ascii_lowercase().as_str() {
        "critical" => 1.0,
        "high" => 0.8,
        "medium" => 0.5,
        "low" => 0.2,
        _ => 0.0,
    }
}

/// Mean completion ratio of the assessed frameworks, or 0.
pub fn compliance_score(record: &GovernanceRecord) -> f64 {
    let ratios: Vec<f64> = record
        .assessed_frameworks()
        .map(|(_, a)| a.completion_ratio())
        .collect();
    if ratios.is_empty() {
        0.0
    } else {
        ratios.iter().sum::<f64>() / ratios.len() as f64
    }
}

/// Mean risk weight × 100, capped at 100. 0 with an empty register.
pub fn risk_score(record: &GovernanceRecord) -> f64 {
    if record.risks.is_empty() {
        return 0.0;
    }
    let total: f64 = record
        .risks
        .iter()
        .map(|r| risk_level_weight(&r.risk_level))
        .sum();
    (total / record.risks.len() as f64 * 100.0).min(100.0)
}

/// Fraction of [`FrameworkKind::all`] with an assessment on record.
pub fn framework_coverage(record: &GovernanceRecord) -> f64 {
    record.assessed_frameworks().count() as f64 / FrameworkKind::all().len() as f64
}

fn high_risk_count(record: &GovernanceRecord) -> usize {
    record
        .risks
        .iter()
        .filter(|r| risk_level_weight(&r.risk_level) >= risk_level_weight("high"))
        .count()
}

// ---------------------------------------------------------------------------
// Insight rules
// ---------------------------------------------------------------------------

const LOW_COMPLIANCE_BELOW: f64 = 0.7;
const TARGET_COMPLIANCE: f64 = 0.8;
const LOW_COVERAGE_BELOW: f64 = 0.6;
const TARGET_COVERAGE: f64 = 0.8;
const EXCELLENCE_ABOVE: f64 = 0.8;
/// Risk score above which next steps call for mitigation.
const MITIGATION_RISK_ABOVE: f64 = 60.0;
const MAX_NEXT_STEPS: usize = 4;
const MAX_GAPS: usize = 5;

pub const LOW_COMPLIANCE: InsightTemplate<GovernanceInsightType> = InsightTemplate {
    kind: GovernanceInsightType::ComplianceAlert,
    title: "Low Compliance Score",
    impact: Impact::High,
    confidence: 0.88,
    priority: 1,
    recommendations: &[
        "Conduct comprehensive framework assessment",
        "Prioritize critical compliance gaps",
        "Develop remediation timeline",
    ],
};

pub const HIGH_RISK_ALERT: InsightTemplate<GovernanceInsightType> = InsightTemplate {
    kind: GovernanceInsightType::RiskAssessment,
    title: "High Risk Alert",
    impact: Impact::High,
    confidence: 0.85,
    priority: 1,
    recommendations: &[
        "Implement risk mitigation strategies",
        "Establish risk monitoring dashboard",
        "Develop contingency plans",
    ],
};

pub const INCOMPLETE_COVERAGE: InsightTemplate<GovernanceInsightType> = InsightTemplate {
    kind: GovernanceInsightType::FrameworkGap,
    title: "Incomplete Framework Coverage",
    impact: Impact::Medium,
    confidence: 0.78,
    priority: 2,
    recommendations: &[
        "Complete missing framework assessments",
        "Validate assessment data quality",
        "Establish assessment completion tracking",
    ],
};

pub const GOVERNANCE_EXCELLENCE: InsightTemplate<GovernanceInsightType> = InsightTemplate {
    kind: GovernanceInsightType::BestPractice,
    title: "Excellence in Governance",
    impact: Impact::Low,
    confidence: 0.92,
    priority: 4,
    recommendations: &[
        "Document best practices",
        "Share governance insights",
        "Consider advanced compliance certifications",
    ],
};

/// Evaluate the insight rules in order, then sort by priority.
///
/// Low compliance only fires once something has been assessed; an
/// unassessed case is reported through coverage instead.
pub fn generate_insights(record: &GovernanceRecord) -> Vec<GovernanceInsight> {
    let mut insights = Vec::new();
    let compliance = compliance_score(record);
    let coverage = framework_coverage(record);
    let assessed = record.assessed_frameworks().next().is_some();

    if assessed && compliance < LOW_COMPLIANCE_BELOW {
        insights.push(LOW_COMPLIANCE.build(
            format!(
                "Overall compliance score of {:.1}% indicates significant gaps requiring immediate attention.",
                compliance * 100.0
            ),
            [("complianceScore", compliance), ("targetScore", TARGET_COMPLIANCE)],
        ));
    }

    let high_risks = high_risk_count(record);
    if high_risks > 0 {
        insights.push(HIGH_RISK_ALERT.build(
            format!("{high_risks} high/critical risks identified requiring immediate mitigation."),
            [
                ("highRiskCount", high_risks as f64),
                ("totalRisks", record.risks.len() as f64),
            ],
        ));
    }

    if coverage < LOW_COVERAGE_BELOW {
        insights.push(INCOMPLETE_COVERAGE.build(
            format!(
                "Framework coverage of {:.1}% indicates missing assessments or incomplete data.",
                coverage * 100.0
            ),
            [("coverage", coverage), ("targetCoverage", TARGET_COVERAGE)],
        ));
    }

    if compliance > EXCELLENCE_ABOVE && coverage > EXCELLENCE_ABOVE {
        insights.push(GOVERNANCE_EXCELLENCE.build(
            "Strong governance practices identified. Consider sharing best practices across organization."
                .to_string(),
            [("complianceScore", compliance), ("frameworkCoverage", coverage)],
        ));
    }

    sort_by_priority(&mut insights);
    insights
}

// ---------------------------------------------------------------------------
// Compliance status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceState {
    /// Completion of at least 80%.
    Compliant,
    /// Completion of at least 60%.
    PartiallyCompliant,
    NonCompliant,
}

impl ComplianceState {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 0.8 {
            Self::Compliant
        } else if ratio >= 0.6 {
            Self::PartiallyCompliant
        } else {
            Self::NonCompliant
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementCounts {
    pub total: u32,
    pub completed: u32,
    pub pending: u32,
    pub critical: u32,
}

/// Status of one assessed framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatus {
    pub framework: FrameworkKind,
    pub framework_name: String,
    pub overall_score: f64,
    pub requirements: RequirementCounts,
    pub status: ComplianceState,
    /// At most five outstanding items.
    pub gaps: Vec<String>,
    /// When the assessment was last updated, or when this status was
    /// computed if that is unknown.
    pub last_assessment: DateTime<Utc>,
}

fn status_for(kind: FrameworkKind, assessment: &FrameworkAssessment, now: DateTime<Utc>) -> ComplianceStatus {
    let overall_score = assessment.completion_ratio();
    ComplianceStatus {
        framework: kind,
        framework_name: kind.name().to_string(),
        overall_score,
        requirements: RequirementCounts {
            total: assessment.total_requirements,
            completed: assessment.completed_requirements,
            pending: assessment.pending_requirements(),
            critical: assessment.critical_requirements,
        },
        status: ComplianceState::from_ratio(overall_score),
        gaps: assessment.gaps.iter().take(MAX_GAPS).cloned().collect(),
        last_assessment: assessment.updated_at.unwrap_or(now),
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceAnalysis {
    pub case_id: String,
    /// Sorted by priority, most urgent first.
    pub insights: Vec<GovernanceInsight>,
    pub summary: String,
    /// In [0, 1].
    pub compliance_score: f64,
    /// In [0, 100].
    pub risk_score: f64,
    /// In [0, 1].
    pub framework_coverage: f64,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

impl GovernanceAnalysis {
    pub fn has_framework_gap(&self) -> bool {
        self.insights
            .iter()
            .any(|i| i.kind == GovernanceInsightType::FrameworkGap)
    }
}

pub struct GovernanceAgent {
    recommendation_limit: usize,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for GovernanceAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernanceAgent")
            .field("recommendation_limit", &self.recommendation_limit)
            .finish_non_exhaustive()
    }
}

impl Default for GovernanceAgent {
    fn default() -> Self {
        Self {
            recommendation_limit: EngineConfig::default().recommendation_limit,
            clock: Arc::new(SystemClock),
        }
    }
}

impl GovernanceAgent {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            recommendation_limit: config.recommendation_limit,
            clock: Arc::new(SystemClock),
        })
    }

    /// Use `clock` for undated compliance statuses.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn analyze(
        &self,
        case_id: &str,
        source: &dyn CaseRecordSource,
    ) -> Result<GovernanceAnalysis, EngineError> {
        let record = load(case_id, source)?;
        Ok(self.analyze_record(case_id, &record))
    }

    pub fn analyze_record(&self, case_id: &str, record: &GovernanceRecord) -> GovernanceAnalysis {
        let insights = generate_insights(record);
        let compliance_score = compliance_score(record);
        let risk_score = risk_score(record);
        let framework_coverage = framework_coverage(record);

        let summary = summary(&insights, compliance_score, risk_score);
        let recommendations = distinct_recommendations(&insights, self.recommendation_limit);
        let mut analysis = GovernanceAnalysis {
            case_id: case_id.to_string(),
            insights,
            summary,
            compliance_score,
            risk_score,
            framework_coverage,
            recommendations,
            next_steps: Vec::new(),
        };
        analysis.next_steps = next_steps(&analysis);

        tracing::debug!(
            case_id,
            compliance_score,
            risk_score,
            framework_coverage,
            "governance analysis complete"
        );
        analysis
    }

    /// Per-framework status for every assessed framework of `case_id`.
    pub fn compliance_status(
        &self,
        case_id: &str,
        source: &dyn CaseRecordSource,
    ) -> Result<Vec<ComplianceStatus>, EngineError> {
        let record = load(case_id, source)?;
        let now = self.clock.now();
        Ok(record
            .assessed_frameworks()
            .map(|(kind, assessment)| status_for(kind, assessment, now))
            .collect())
    }
}

fn load(case_id: &str, source: &dyn CaseRecordSource) -> Result<GovernanceRecord, EngineError> {
    if !source.contains_case(case_id) {
        return Err(EngineError::CaseNotFound(case_id.to_string()));
    }
    source
        .governance_record(case_id)
        .ok_or_else(|| EngineError::MissingData {
            case_id: case_id.to_string(),
            domain: AnalysisDomain::Governance,
        })
}

fn summary(insights: &[GovernanceInsight], compliance: f64, risk: f64) -> String {
    let critical = insights.iter().filter(|i| i.is_critical()).count();
    format!(
        "Governance analysis shows {} compliance level and {} risk level. {} critical insights identified requiring immediate attention.",
        Level::from_ratio(compliance),
        Level::from_percent(risk),
        critical
    )
}

fn next_steps(analysis: &GovernanceAnalysis) -> Vec<String> {
    let mut steps: Vec<&str> = Vec::new();
    if analysis.compliance_score < LOW_COMPLIANCE_BELOW {
        steps.extend([
            "Schedule comprehensive compliance review",
            "Prioritize critical framework gaps",
        ]);
    }
    if analysis.risk_score > MITIGATION_RISK_ABOVE {
        steps.extend([
            "Implement immediate risk mitigation measures",
            "Establish risk monitoring dashboard",
        ]);
    }
    if analysis.has_framework_gap() {
        steps.extend([
            "Complete missing framework assessments",
            "Validate assessment data quality",
        ]);
    }
    if steps.is_empty() {
        steps.extend([
            "Continue monitoring governance metrics",
            "Schedule next quarterly review",
        ]);
    }
    steps
        .into_iter()
        .take(MAX_NEXT_STEPS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use govrisk_core::{CaseRecord, FixedClock, InMemoryCaseStore, RecordedRisk};
    use pretty_assertions::assert_eq;

    fn assessment(total: u32, completed: u32) -> FrameworkAssessment {
        FrameworkAssessment {
            total_requirements: total,
            completed_requirements: completed,
            ..Default::default()
        }
    }

    fn risks(levels: &[&str]) -> Vec<RecordedRisk> {
        levels
            .iter()
            .map(|l| RecordedRisk {
                title: None,
                risk_level: l.to_string(),
            })
            .collect()
    }

    #[test]
    fn empty_record_reports_only_coverage_gap() {
        let analysis = GovernanceAgent::default().analyze_record("c", &GovernanceRecord::default());
        assert_eq!(analysis.compliance_score, 0.0);
        assert_eq!(analysis.risk_score, 0.0);
        assert_eq!(analysis.framework_coverage, 0.0);
        assert_eq!(analysis.insights.len(), 1);
        assert_eq!(analysis.insights[0].title, "Incomplete Framework Coverage");
        assert_eq!(analysis.insights[0].priority, 2);
        assert_eq!(
            analysis.insights[0].description,
            "Framework coverage of 0.0% indicates missing assessments or incomplete data."
        );
    }

    #[test]
    fn compliance_is_mean_of_assessed_frameworks() {
        let record = GovernanceRecord {
            eu_ai_act: Some(assessment(10, 9)),
            iso_42001: Some(assessment(20, 10)),
            risks: Vec::new(),
        };
        assert!((compliance_score(&record) - 0.7).abs() < 1e-12);
        assert_eq!(framework_coverage(&record), 1.0);

        let one = GovernanceRecord {
            iso_42001: Some(assessment(4, 3)),
            ..Default::default()
        };
        assert_eq!(compliance_score(&one), 0.75);
        assert_eq!(framework_coverage(&one), 0.5);
    }

    #[test]
    fn framework_with_no_requirements_scores_zero() {
        let record = GovernanceRecord {
            eu_ai_act: Some(assessment(0, 0)),
            ..Default::default()
        };
        assert_eq!(compliance_score(&record), 0.0);
        let titles: Vec<_> = generate_insights(&record)
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["Low Compliance Score", "Incomplete Framework Coverage"]);
    }

    #[test]
    fn risk_score_averages_level_weights() {
        let record = GovernanceRecord {
            risks: risks(&["critical", "High", "low", "unknown"]),
            ..Default::default()
        };
        // (1.0 + 0.8 + 0.2 + 0) / 4 × 100
        assert!((risk_score(&record) - 50.0).abs() < 1e-9);
        assert_eq!(high_risk_count(&record), 2);

        let insights = generate_insights(&record);
        let alert = insights
            .iter()
            .find(|i| i.title == "High Risk Alert")
            .unwrap();
        assert_eq!(
            alert.description,
            "2 high/critical risks identified requiring immediate mitigation."
        );
        assert_eq!(alert.metrics["totalRisks"], 4.0);
    }

    #[test]
    fn excellence_needs_both_frameworks() {
        let record = GovernanceRecord {
            eu_ai_act: Some(assessment(10, 9)),
            iso_42001: Some(assessment(10, 10)),
            risks: Vec::new(),
        };
        let analysis = GovernanceAgent::default().analyze_record("c", &record);
        assert_eq!(analysis.insights.len(), 1);
        assert_eq!(analysis.insights[0].title, "Excellence in Governance");
        assert_eq!(
            analysis.summary,
            "Governance analysis shows high compliance level and low risk level. 0 critical insights identified requiring immediate attention."
        );
        assert_eq!(
            analysis.next_steps,
            vec!["Continue monitoring governance metrics", "Schedule next quarterly review"]
        );
    }

    #[test]
    fn next_steps_are_capped_at_four() {
        let record = GovernanceRecord {
            eu_ai_act: Some(assessment(10, 2)),
            iso_42001: None,
            risks: risks(&["critical", "critical"]),
        };
        let analysis = GovernanceAgent::default().analyze_record("c", &record);
        assert_eq!(
            analysis.next_steps,
            vec![
                "Schedule comprehensive compliance review",
                "Prioritize critical framework gaps",
                "Implement immediate risk mitigation measures",
                "Establish risk monitoring dashboard",
            ]
        );
        assert_eq!(analysis.recommendations.len(), 5);
    }

    #[test]
    fn compliance_status_per_framework() {
        let stamped = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        let store = InMemoryCaseStore::from_cases([CaseRecord {
            id: "c".into(),
            title: None,
            financial: None,
            governance: Some(GovernanceRecord {
                eu_ai_act: Some(FrameworkAssessment {
                    total_requirements: 10,
                    completed_requirements: 7,
                    critical_requirements: 2,
                    gaps: (1..=7).map(|i| format!("Art. {i}")).collect(),
                    updated_at: Some(stamped),
                }),
                iso_42001: Some(assessment(10, 9)),
                risks: Vec::new(),
            }),
        }]);
        let agent = GovernanceAgent::default().with_clock(Arc::new(FixedClock::new(now)));
        let statuses = agent.compliance_status("c", &store).unwrap();

        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].framework_name, "EU AI Act");
        assert_eq!(statuses[0].status, ComplianceState::PartiallyCompliant);
        assert_eq!(
            statuses[0].requirements,
            RequirementCounts {
                total: 10,
                completed: 7,
                pending: 3,
                critical: 2
            }
        );
        assert_eq!(statuses[0].gaps.len(), 5);
        assert_eq!(statuses[0].last_assessment, stamped);
        assert_eq!(statuses[1].status, ComplianceState::Compliant);
        assert_eq!(statuses[1].last_assessment, now);
    }

    #[test]
    fn missing_governance_record_is_missing_data() {
        let store = InMemoryCaseStore::from_cases([CaseRecord {
            id: "c".into(),
            title: None,
            financial: None,
            governance: None,
        }]);
        let err = GovernanceAgent::default().analyze("c", &store).unwrap_err();
        assert!(err.is_data_insufficiency());
        assert!(matches!(
            err,
            EngineError::MissingData {
                domain: AnalysisDomain::Governance,
                ..
            }
        ));
    }

    #[test]
    fn state_thresholds_are_inclusive() {
        assert_eq!(ComplianceState::from_ratio(0.8), ComplianceState::Compliant);
        assert_eq!(ComplianceState::from_ratio(0.6), ComplianceState::PartiallyCompliant);
        assert_eq!(ComplianceState::from_ratio(0.59), ComplianceState::NonCompliant);
    }
}
