use govrisk_core::{AssessmentSnapshot, RiskFactor};

use crate::factor::{FactorResult, FactorTrace};
use crate::rules::operational::*;
use crate::rules::{CATASTROPHIC_IMPACT, MISSION_CRITICAL, ON_PREMISE};

/// Criticality, complexity, failure-impact, and redundancy risk.
pub fn calculate_operational(snapshot: &AssessmentSnapshot) -> FactorResult {
    let mut trace = FactorTrace::new(RiskFactor::Operational);
    let mission_critical = snapshot.system_criticality() == Some(MISSION_CRITICAL);
    let catastrophic = snapshot.failure_impact() == Some(CATASTROPHIC_IMPACT);
    let on_premise = snapshot
        .deployment_model()
        .is_some_and(|d| d.contains(ON_PREMISE));

    if mission_critical {
        trace.add(&BUSINESS_CRITICAL);
    }

    let complexity = snapshot.integration_points().len() + snapshot.model_types().len();
    if let Some((_, rule)) = COMPLEXITY_TIERS
        .iter()
        .find(|(floor, _)| complexity > *floor)
    {
        trace.add(rule);
    }

    if catastrophic {
        for rule in &CATASTROPHIC_PAIR {
            trace.add(rule);
        }
    }
    if on_premise {
        trace.add(&LIMITED_REDUNDANCY);
    }

    if mission_critical && !on_premise {
        trace.warn(NO_FAILOVER_WARNING);
    }
    if catastrophic {
        trace.warn(CATASTROPHIC_WARNING);
    }

    trace.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(json: &str) -> AssessmentSnapshot {
        AssessmentSnapshot::from_json(json).unwrap()
    }

    #[test]
    fn catastrophic_impact_scores_both_named_factors() {
        let result = calculate_operational(&snapshot(
            r#"{"businessFeasibility": {"failureImpact": "Catastrophic/Life Safety"}}"#,
        ));
        let labels: Vec<_> = result.factors.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Downtime impact severe", "Catastrophic failure risk"]
        );
        assert_eq!(result.score, 3.5);
        assert_eq!(result.inferred_warnings, vec![CATASTROPHIC_WARNING.to_string()]);
    }

    #[test]
    fn mission_critical_in_cloud_warns_about_failover() {
        let result = calculate_operational(&snapshot(
            r#"{"businessFeasibility": {"systemCriticality": "Mission Critical"},
                "technicalFeasibility": {"deploymentModels": "Public Cloud"}}"#,
        ));
        assert_eq!(result.score, 4.0);
        assert_eq!(result.inferred_warnings, vec![NO_FAILOVER_WARNING.to_string()]);
    }

    #[test]
    fn mission_critical_on_premise_scores_redundancy_without_warning() {
        let result = calculate_operational(&snapshot(
            r#"{"businessFeasibility": {"systemCriticality": "Mission Critical"},
                "technicalFeasibility": {"deploymentModels": "On-Premise"}}"#,
        ));
        assert_eq!(result.formula(), "Base(1) + 3 + 0.5 = 4.5");
        assert!(result.inferred_warnings.is_empty());
    }

    #[test]
    fn complexity_thresholds_are_exclusive() {
        let with = |n: usize| {
            let points: Vec<String> = (0..n).map(|i| format!("\"p{i}\"")).collect();
            snapshot(&format!(
                r#"{{"technicalFeasibility": {{"integrationPoints": [{}]}}}}"#,
                points.join(",")
            ))
        };
        assert_eq!(calculate_operational(&with(3)).score, 1.0);
        assert_eq!(calculate_operational(&with(4)).score, 2.0);
        assert_eq!(calculate_operational(&with(5)).score, 2.0);
        assert!((calculate_operational(&with(6)).score - 2.9).abs() < 1e-12);
    }

    #[test]
    fn model_types_count_toward_complexity() {
        let result = calculate_operational(&snapshot(
            r#"{"technicalFeasibility": {
                "integrationPoints": ["a", "b"],
                "modelTypes": ["Classification", "Regression", "Generative AI", "Computer Vision"]}}"#,
        ));
        assert_eq!(result.factors[0].label, "High complexity");
    }
}
