//! # Portfolio Aggregator
//!
//! Runs both domain agents over a set of cases and reduces the results into
//! portfolio-level findings: top performers by ROI, risk alerts, compliance
//! gaps, cost-optimization opportunities, and a portfolio cross-domain
//! insight.
//!
//! Cases are evaluated in parallel on the rayon pool. Output order follows
//! the input order regardless of scheduling. A case that lacks a domain, or
//! does not exist, is listed in `skippedCases` and contributes nothing for
//! that domain; the batch never fails. With a deadline configured, cases
//! not yet started when it passes are listed in `timedOutCases`.
//!
//! Complete results are cached by the source revision and the sorted set of
//! case ids.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use govrisk_core::{
    AnalysisCache, AnalysisDomain, CacheStats, CaseRecordSource, Clock, EngineConfig,
    EngineError, Impact,
};

use crate::correlation::{CrossDomainCategory, CrossDomainInsight, CrossDomainTemplate};
use crate::financial::{FinancialAgent, FinancialAnalysis};
use crate::governance::{GovernanceAgent, GovernanceAnalysis};
use crate::insight::{
    FinancialInsight, FinancialInsightType, GovernanceInsight, GovernanceInsightType, Insight,
};

/// Domain risk score above which a case is listed as high risk.
const HIGH_RISK_ABOVE: f64 = 70.0;

pub const PORTFOLIO_RISK_CONCENTRATION: CrossDomainTemplate = CrossDomainTemplate {
    category: CrossDomainCategory::RiskFinancial,
    title: "Portfolio Risk Concentration",
    description: "Multiple high-risk areas identified across financial and governance domains.",
    impact: Impact::High,
    confidence: 0.85,
    financial_impact: "Financial risk alerts detected",
    governance_impact: "Governance risk alerts detected",
    recommendations: &[
        "Implement portfolio-wide risk management",
        "Establish cross-domain risk monitoring",
        "Develop portfolio risk mitigation strategy",
    ],
    priority: 1,
};

/// Scope used in the ids of portfolio-level insights.
pub const PORTFOLIO_SCOPE: &str = "portfolio";

/// A domain of one case that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedCase {
    pub case_id: String,
    /// `None` when the case itself is unknown.
    pub domain: Option<AnalysisDomain>,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioInsights {
    /// Cases with at least one domain analyzed.
    pub analyzed_cases: usize,
    pub financial_insights: Vec<FinancialInsight>,
    pub governance_insights: Vec<GovernanceInsight>,
    pub cross_domain_insights: Vec<CrossDomainInsight>,
    /// Case ids by ROI, highest first.
    pub top_performers: Vec<String>,
    pub high_risk_cases: Vec<String>,
    /// `"<case>: <title>"` for every high-impact financial risk alert.
    pub risk_alerts: Vec<String>,
    /// `"<case>: <title>"` for every high-impact framework gap.
    pub compliance_gaps: Vec<String>,
    /// `"<case>: <title>"` for every high-impact cost finding.
    pub cost_optimization_opportunities: Vec<String>,
    pub recommendations: Vec<String>,
    pub skipped_cases: Vec<SkippedCase>,
    pub timed_out_cases: Vec<String>,
}

enum CaseOutcome {
    Evaluated {
        case_id: String,
        financial: Result<FinancialAnalysis, EngineError>,
        governance: Result<GovernanceAnalysis, EngineError>,
    },
    NotFound(String),
    TimedOut(String),
}

pub struct PortfolioAggregator {
    financial: FinancialAgent,
    governance: GovernanceAgent,
    top_performers: usize,
    recommendation_limit: usize,
    deadline: Option<Duration>,
    cache: Arc<AnalysisCache<PortfolioInsights>>,
}

impl std::fmt::Debug for PortfolioAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioAggregator")
            .field("top_performers", &self.top_performers)
            .field("recommendation_limit", &self.recommendation_limit)
            .field("deadline", &self.deadline)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl PortfolioAggregator {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        let ttl = i64::try_from(config.cache_ttl_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX);
        Ok(Self {
            financial: FinancialAgent::new(config)?,
            governance: GovernanceAgent::new(config)?,
            top_performers: config.top_performers,
            recommendation_limit: config.recommendation_limit,
            deadline: config.portfolio_deadline_ms.map(Duration::from_millis),
            cache: Arc::new(AnalysisCache::new(ttl)),
        })
    }

    /// Share a cache, e.g. one driven by a test clock.
    pub fn with_cache(mut self, cache: Arc<AnalysisCache<PortfolioInsights>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.governance = self.governance.with_clock(clock);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Analyze `case_ids`. Duplicate ids are analyzed once.
    pub fn analyze(&self, case_ids: &[String], source: &dyn CaseRecordSource) -> PortfolioInsights {
        let ids = distinct(case_ids);
        let key = cache_key(source.revision(), &ids);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!(cases = ids.len(), "portfolio served from cache");
            return cached;
        }

        let deadline = self.deadline.map(|d| Instant::now() + d);
        let outcomes: Vec<CaseOutcome> = ids
            .par_iter()
            .map(|id| self.evaluate(id, source, deadline))
            .collect();
        let insights = self.reduce(outcomes);

        if insights.timed_out_cases.is_empty() {
            self.cache.insert(key, insights.clone());
        } else {
            tracing::warn!(
                timed_out = insights.timed_out_cases.len(),
                "portfolio deadline passed; returning partial results"
            );
        }
        tracing::info!(
            cases = ids.len(),
            analyzed = insights.analyzed_cases,
            skipped = insights.skipped_cases.len(),
            "portfolio analysis complete"
        );
        insights
    }

    /// Analyze every case the source knows.
    pub fn analyze_all(&self, source: &dyn CaseRecordSource) -> PortfolioInsights {
        self.analyze(&source.case_ids(), source)
    }

    fn evaluate(
        &self,
        case_id: &str,
        source: &dyn CaseRecordSource,
        deadline: Option<Instant>,
    ) -> CaseOutcome {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return CaseOutcome::TimedOut(case_id.to_string());
        }
        if !source.contains_case(case_id) {
            return CaseOutcome::NotFound(case_id.to_string());
        }
        CaseOutcome::Evaluated {
            case_id: case_id.to_string(),
            financial: self.financial.analyze(case_id, source),
            governance: self.governance.analyze(case_id, source),
        }
    }

    fn reduce(&self, outcomes: Vec<CaseOutcome>) -> PortfolioInsights {
        let mut out = PortfolioInsights::default();
        let mut financials: Vec<FinancialAnalysis> = Vec::new();
        let mut governance_risks: Vec<String> = Vec::new();

        for outcome in outcomes {
            let (case_id, financial, governance) = match outcome {
                CaseOutcome::TimedOut(id) => {
                    out.timed_out_cases.push(id);
                    continue;
                }
                CaseOutcome::NotFound(id) => {
                    tracing::warn!(case_id = %id, "portfolio case not found; skipped");
                    out.skipped_cases.push(SkippedCase {
                        reason: EngineError::CaseNotFound(id.clone()).to_string(),
                        case_id: id,
                        domain: None,
                    });
                    continue;
                }
                CaseOutcome::Evaluated {
                    case_id,
                    financial,
                    governance,
                } => (case_id, financial, governance),
            };

            let skipped = &mut out.skipped_cases;
            let financial = keep(&case_id, AnalysisDomain::Financial, financial, skipped);
            let governance = keep(&case_id, AnalysisDomain::Governance, governance, skipped);
            if financial.is_none() && governance.is_none() {
                continue;
            }
            out.analyzed_cases += 1;

            let high_risk = financial.as_ref().is_some_and(|f| f.risk_score > HIGH_RISK_ABOVE)
                || governance.as_ref().is_some_and(|g| g.risk_score > HIGH_RISK_ABOVE);
            if high_risk {
                out.high_risk_cases.push(case_id.clone());
            }

            if let Some(f) = financial {
                out.risk_alerts
                    .extend(labelled(&case_id, &f.insights, FinancialInsightType::RiskAlert));
                out.cost_optimization_opportunities.extend(labelled(
                    &case_id,
                    &f.insights,
                    FinancialInsightType::CostOptimization,
                ));
                out.financial_insights.extend(f.insights.iter().cloned());
                financials.push(f);
            }
            if let Some(g) = governance {
                out.compliance_gaps
                    .extend(labelled(&case_id, &g.insights, GovernanceInsightType::FrameworkGap));
                governance_risks.extend(labelled(
                    &case_id,
                    &g.insights,
                    GovernanceInsightType::RiskAssessment,
                ));
                out.governance_insights.extend(g.insights);
            }
        }

        // Stable: equal ROI keeps input order.
        financials.sort_by(|a, b| b.roi.total_cmp(&a.roi));
        out.top_performers = financials
            .iter()
            .take(self.top_performers)
            .map(|f| f.case_id.clone())
            .collect();

        if !out.risk_alerts.is_empty() && !governance_risks.is_empty() {
            out.cross_domain_insights
                .push(PORTFOLIO_RISK_CONCENTRATION.build(PORTFOLIO_SCOPE));
        }
        out.recommendations = self.recommendations(&out);
        out
    }

    fn recommendations(&self, insights: &PortfolioInsights) -> Vec<String> {
        let mut recs: Vec<String> = Vec::new();
        if !insights.risk_alerts.is_empty() {
            recs.push("Implement portfolio-wide financial risk monitoring".to_string());
        }
        if !insights.cost_optimization_opportunities.is_empty() {
            recs.push("Develop cost optimization program across portfolio".to_string());
        }
        if !insights.compliance_gaps.is_empty() {
            recs.push("Establish portfolio compliance improvement program".to_string());
        }
        recs.extend(
            insights
                .cross_domain_insights
                .iter()
                .filter_map(|i| i.recommendations.first().cloned()),
        );
        recs.truncate(self.recommendation_limit);
        recs
    }
}

fn keep<T>(
    case_id: &str,
    domain: AnalysisDomain,
    result: Result<T, EngineError>,
    skipped: &mut Vec<SkippedCase>,
) -> Option<T> {
    match result {
        Ok(analysis) => Some(analysis),
        Err(err) => {
            tracing::warn!(case_id, %domain, error = %err, "portfolio domain skipped");
            skipped.push(SkippedCase {
                case_id: case_id.to_string(),
                domain: Some(domain),
                reason: err.to_string(),
            });
            None
        }
    }
}

/// High-impact insights of `kind`, labelled with their case.
fn labelled<'a, K: PartialEq + Copy + 'a>(
    case_id: &'a str,
    insights: &'a [Insight<K>],
    kind: K,
) -> impl Iterator<Item = String> + 'a {
    insights
        .iter()
        .filter(move |i| i.kind == kind && i.impact == Impact::High)
        .map(move |i| format!("{case_id}: {}", i.title))
}

/// First occurrence of each id, in input order.
fn distinct(case_ids: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(case_ids.len());
    case_ids
        .iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

fn cache_key(revision: u64, ids: &[String]) -> String {
    let mut sorted: Vec<&str> = ids.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!("portfolio@{revision}:{}", sorted.join(","))
}

// ---------------------------------------------------------------------------
// Executive report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    pub total_cases: usize,
    pub high_risk_count: usize,
    pub compliance_gaps: usize,
    pub cost_optimization_opportunities: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveReport {
    pub summary: String,
    pub key_metrics: KeyMetrics,
    pub top_risks: Vec<String>,
    pub top_opportunities: Vec<String>,
    pub recommendations: Vec<String>,
    pub next_steps: Vec<String>,
}

const REPORT_HIGHLIGHTS: usize = 3;
const REPORT_RECOMMENDATIONS: usize = 5;
const REPORT_NEXT_STEPS: [&str; 4] = [
    "Review high-risk use cases",
    "Implement cost optimization program",
    "Address compliance gaps",
    "Establish portfolio monitoring dashboard",
];

impl ExecutiveReport {
    pub fn from_insights(insights: &PortfolioInsights) -> Self {
        let key_metrics = KeyMetrics {
            total_cases: insights.analyzed_cases,
            high_risk_count: insights.high_risk_cases.len(),
            compliance_gaps: insights.compliance_gaps.len(),
            cost_optimization_opportunities: insights.cost_optimization_opportunities.len(),
        };
        let summary = format!(
            "Portfolio analysis reveals {} high-risk areas and {} cost optimization opportunities. {} strategic recommendations identified.",
            key_metrics.high_risk_count,
            key_metrics.cost_optimization_opportunities,
            insights.recommendations.len()
        );
        Self {
            summary,
            key_metrics,
            top_risks: first(&insights.high_risk_cases, REPORT_HIGHLIGHTS),
            top_opportunities: first(&insights.top_performers, REPORT_HIGHLIGHTS),
            recommendations: first(&insights.recommendations, REPORT_RECOMMENDATIONS),
            next_steps: REPORT_NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn first(items: &[String], n: usize) -> Vec<String> {
    items.iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use govrisk_core::{
        CaseRecord, FinancialRecord, FixedClock, FrameworkAssessment, GovernanceRecord,
        InMemoryCaseStore, RecordedRisk,
    };
    use pretty_assertions::assert_eq;

    fn financial(roi: f64, net_value: f64) -> FinancialRecord {
        FinancialRecord {
            roi,
            total_investment: 1_000_000.0,
            net_value,
            dev_cost_base: 200_000.0,
            value_growth_rate: 0.2,
            ..Default::default()
        }
    }

    fn governed(levels: &[&str]) -> GovernanceRecord {
        GovernanceRecord {
            eu_ai_act: Some(FrameworkAssessment {
                total_requirements: 10,
                completed_requirements: 9,
                ..Default::default()
            }),
            iso_42001: Some(FrameworkAssessment {
                total_requirements: 10,
                completed_requirements: 9,
                ..Default::default()
            }),
            risks: levels
                .iter()
                .map(|l| RecordedRisk {
                    title: None,
                    risk_level: l.to_string(),
                })
                .collect(),
        }
    }

    fn case(id: &str, f: Option<FinancialRecord>, g: Option<GovernanceRecord>) -> CaseRecord {
        CaseRecord {
            id: id.into(),
            title: None,
            financial: f,
            governance: g,
        }
    }

    fn store() -> InMemoryCaseStore {
        InMemoryCaseStore::from_cases([
            case("steady", Some(financial(2.5, 2_500_000.0)), Some(governed(&[]))),
            case("strained", Some(financial(1.0, 800_000.0)), Some(governed(&["critical"]))),
            case("star", Some(financial(3.0, 3_000_000.0)), Some(governed(&["low"]))),
            case("no-finance", None, Some(governed(&["critical", "high"]))),
            case("no-governance", Some(financial(2.5, 2_000_000.0)), None),
        ])
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn aggregator() -> PortfolioAggregator {
        PortfolioAggregator::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn ranks_alerts_and_skips_missing_domains() {
        let insights = aggregator().analyze_all(&store());

        assert_eq!(insights.analyzed_cases, 5);
        assert_eq!(
            insights.top_performers,
            vec!["star", "steady", "no-governance", "strained"]
        );
        assert_eq!(
            insights.risk_alerts,
            vec!["strained: Investment Efficiency Risk"]
        );
        assert_eq!(insights.high_risk_cases, vec!["strained", "no-finance"]);
        assert_eq!(
            insights.skipped_cases,
            vec![
                SkippedCase {
                    case_id: "no-finance".into(),
                    domain: Some(AnalysisDomain::Financial),
                    reason: "no financial data recorded for case no-finance".into(),
                },
                SkippedCase {
                    case_id: "no-governance".into(),
                    domain: Some(AnalysisDomain::Governance),
                    reason: "no governance data recorded for case no-governance".into(),
                },
            ]
        );
        assert!(insights.timed_out_cases.is_empty());
    }

    #[test]
    fn risk_concentration_needs_both_domains_alerting() {
        let insights = aggregator().analyze_all(&store());
        assert_eq!(insights.cross_domain_insights.len(), 1);
        let concentration = &insights.cross_domain_insights[0];
        assert_eq!(concentration.title, "Portfolio Risk Concentration");
        assert_eq!(concentration.id, "portfolio:risk_financial");
        assert_eq!(
            insights.recommendations,
            vec![
                "Implement portfolio-wide financial risk monitoring",
                "Implement portfolio-wide risk management",
            ]
        );

        let calm = aggregator().analyze(&ids(&["steady", "star"]), &store());
        assert!(calm.cross_domain_insights.is_empty());
        assert!(calm.recommendations.is_empty());
    }

    #[test]
    fn unknown_cases_are_skipped_not_fatal() {
        let insights = aggregator().analyze(&ids(&["ghost", "star"]), &store());
        assert_eq!(insights.analyzed_cases, 1);
        assert_eq!(insights.skipped_cases.len(), 1);
        assert_eq!(insights.skipped_cases[0].domain, None);
        assert_eq!(insights.skipped_cases[0].reason, "case not found: ghost");
    }

    #[test]
    fn top_performers_respects_limit() {
        let config = EngineConfig {
            top_performers: 2,
            ..Default::default()
        };
        let insights = PortfolioAggregator::new(&config).unwrap().analyze_all(&store());
        assert_eq!(insights.top_performers, vec!["star", "steady"]);
    }

    #[test]
    fn results_are_cached_by_case_set() {
        let t0 = chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::new(t0);
        let cache = Arc::new(AnalysisCache::with_clock(
            chrono::Duration::seconds(300),
            Arc::new(clock.clone()),
        ));
        let aggregator = aggregator().with_cache(cache);
        let store = store();

        let first = aggregator.analyze(&ids(&["star", "steady"]), &store);
        let again = aggregator.analyze(&ids(&["steady", "star", "star"]), &store);
        assert_eq!(first, again);
        let stats = aggregator.cache_stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(
            stats.keys,
            vec![format!("portfolio@{}:star,steady", store.revision())]
        );

        clock.advance(chrono::Duration::seconds(300));
        aggregator.analyze(&ids(&["star", "steady"]), &store);
        assert_eq!(aggregator.cache_stats().misses, 2);

        aggregator.clear_cache();
        assert_eq!(aggregator.cache_stats().size, 0);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence_order() {
        assert_eq!(
            distinct(&ids(&["b", "a", "b", "c", "a"])),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn passed_deadline_times_out_every_case_and_skips_cache() {
        let aggregator = aggregator().with_deadline(Duration::ZERO);
        let insights = aggregator.analyze(&ids(&["star", "steady"]), &store());
        assert_eq!(insights.timed_out_cases, vec!["star", "steady"]);
        assert_eq!(insights.analyzed_cases, 0);
        assert_eq!(aggregator.cache_stats().size, 0);
    }

    #[test]
    fn executive_report_summarizes_portfolio() {
        let insights = aggregator().analyze_all(&store());
        let report = ExecutiveReport::from_insights(&insights);
        assert_eq!(
            report.summary,
            "Portfolio analysis reveals 2 high-risk areas and 0 cost optimization opportunities. 2 strategic recommendations identified."
        );
        assert_eq!(report.key_metrics.total_cases, 5);
        assert_eq!(report.top_opportunities, vec!["star", "steady", "no-governance"]);
        assert_eq!(report.top_risks, vec!["strained", "no-finance"]);
        assert_eq!(report.next_steps.len(), 4);
    }
}
