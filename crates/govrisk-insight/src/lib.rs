//! # govrisk-insight — Domain Agents, Correlation, and Portfolio Analysis
//!
//! Turns per-case financial and governance records into ranked, typed
//! insights and combines them across domains.
//!
//! - [`financial`]: risk, opportunity, and cost-optimization scores (0–100)
//!   plus four threshold-triggered insight rules and a growth projection.
//! - [`governance`]: compliance, risk, and framework coverage, four insight
//!   rules, per-framework compliance status, and next steps.
//! - [`correlation`]: four cross-domain rules and the [`UnifiedAnalysis`]
//!   with weighted overall scores and priority actions.
//! - [`engine`]: [`InsightEngine`], the single-case entry point.
//! - [`portfolio`]: [`PortfolioAggregator`], parallel batch analysis with
//!   skip-and-continue semantics, a deadline, and a TTL cache.
//!
//! Every analysis is a pure function of its records. Only the portfolio
//! cache carries state between calls, and it is injected.

pub mod correlation;
pub mod engine;
pub mod financial;
pub mod governance;
pub mod insight;
pub mod portfolio;

pub use correlation::{
    CorrelationEngine, CrossDomainCategory, CrossDomainInsight, UnifiedAnalysis,
    CORRELATION_RULES,
};
pub use engine::InsightEngine;
pub use financial::{FinancialAgent, FinancialAnalysis, PerformanceProjection};
pub use governance::{
    ComplianceState, ComplianceStatus, GovernanceAgent, GovernanceAnalysis, RequirementCounts,
};
pub use insight::{
    FinancialInsight, FinancialInsightType, GovernanceInsight, GovernanceInsightType, Insight,
};
pub use portfolio::{
    ExecutiveReport, KeyMetrics, PortfolioAggregator, PortfolioInsights, SkippedCase,
};
