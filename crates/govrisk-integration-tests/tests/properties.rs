//! # Cross-Crate Properties
//!
//! Bounds and determinism that must hold for arbitrary records, checked
//! with proptest.

use govrisk_core::{
    CaseRecord, CaseRecordSource, EngineConfig, FinancialRecord, FrameworkAssessment,
    GovernanceRecord, InMemoryCaseStore, RecordedRisk, RiskFactor, RiskTier,
};
use govrisk_factors::CompositeCalculator;
use govrisk_insight::{CorrelationEngine, FinancialAgent, GovernanceAgent, PortfolioAggregator};
use proptest::prelude::*;

fn financial_record() -> impl Strategy<Value = FinancialRecord> {
    (
        0.0f64..6.0,
        0.0f64..2_000_000.0,
        0.0f64..3_000_000.0,
        proptest::array::uniform4(0.0f64..1_000_000.0),
        -0.2f64..0.5,
    )
        .prop_map(|(roi, total_investment, net_value, costs, growth)| FinancialRecord {
            roi,
            total_investment,
            net_value,
            dev_cost_base: costs[0],
            infra_cost_base: costs[1],
            op_cost_base: costs[2],
            api_cost_base: costs[3],
            value_growth_rate: growth,
        })
}

fn framework() -> impl Strategy<Value = Option<FrameworkAssessment>> {
    proptest::option::of((0u32..50).prop_flat_map(|total| {
        (Just(total), 0..=total).prop_map(|(total, completed)| FrameworkAssessment {
            total_requirements: total,
            completed_requirements: completed,
            ..Default::default()
        })
    }))
}

fn governance_record() -> impl Strategy<Value = GovernanceRecord> {
    let level = proptest::sample::select(vec!["critical", "High", "medium", "low", "unknown"]);
    (
        framework(),
        framework(),
        proptest::collection::vec(level, 0..8),
    )
        .prop_map(|(eu_ai_act, iso_42001, levels)| GovernanceRecord {
            eu_ai_act,
            iso_42001,
            risks: levels
                .into_iter()
                .map(|l| RecordedRisk {
                    title: None,
                    risk_level: l.to_string(),
                })
                .collect(),
        })
}

proptest! {
    #[test]
    fn composite_of_valid_factor_scores_is_in_range(
        scores in proptest::collection::vec(1.0f64..=10.0, 6)
    ) {
        let pairs: Vec<(RiskFactor, f64)> =
            RiskFactor::all().iter().copied().zip(scores).collect();
        let (score, tier) = CompositeCalculator::default().composite_from_scores(&pairs);
        prop_assert!((1.0..=10.0).contains(&score));
        prop_assert_eq!(tier, RiskTier::from_score(score));
    }

    #[test]
    fn financial_scores_stay_within_bounds(record in financial_record()) {
        let analysis = FinancialAgent::default().analyze_record("p", None, &record);
        for score in [
            analysis.risk_score,
            analysis.opportunity_score,
            analysis.cost_optimization_potential,
        ] {
            prop_assert!((0.0..=100.0).contains(&score));
        }
        prop_assert!(analysis.recommendations.len() <= 5);
        prop_assert!(analysis
            .insights
            .windows(2)
            .all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn governance_scores_stay_within_bounds(record in governance_record()) {
        let analysis = GovernanceAgent::default().analyze_record("p", &record);
        prop_assert!((0.0..=1.0).contains(&analysis.compliance_score));
        prop_assert!((0.0..=1.0).contains(&analysis.framework_coverage));
        prop_assert!((0.0..=100.0).contains(&analysis.risk_score));
        prop_assert!(analysis.next_steps.len() <= 4);
    }

    #[test]
    fn unified_scores_stay_within_bounds(
        financial in financial_record(),
        governance in governance_record(),
    ) {
        let f = FinancialAgent::default().analyze_record("p", None, &financial);
        let g = GovernanceAgent::default().analyze_record("p", &governance);
        let unified = CorrelationEngine::default().unify(f, g);

        prop_assert!((0.0..=100.0 + 1e-9).contains(&unified.overall_risk_score));
        prop_assert!((0.0..=100.0 + 1e-9).contains(&unified.overall_opportunity_score));
        prop_assert!(unified.priority_actions.len() <= 5);
        prop_assert!(unified
            .cross_domain_insights
            .windows(2)
            .all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn portfolio_is_independent_of_request_order(
        records in proptest::collection::vec((financial_record(), governance_record()), 1..6)
    ) {
        let store = InMemoryCaseStore::from_cases(records.into_iter().enumerate().map(
            |(i, (financial, governance))| CaseRecord {
                id: format!("case-{i}"),
                title: None,
                financial: Some(financial),
                governance: Some(governance),
            },
        ));
        let mut ids = store.case_ids();
        let forward = PortfolioAggregator::new(&EngineConfig::default())
            .unwrap()
            .analyze(&ids, &store);
        ids.reverse();
        let backward = PortfolioAggregator::new(&EngineConfig::default())
            .unwrap()
            .analyze(&ids, &store);

        prop_assert_eq!(forward.analyzed_cases, backward.analyzed_cases);
        let mut a = forward.high_risk_cases.clone();
        let mut b = backward.high_risk_cases.clone();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
        prop_assert_eq!(forward.recommendations, backward.recommendations);
    }
}
