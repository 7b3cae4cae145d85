use govrisk_core::{AssessmentSnapshot, RiskFactor};

use crate::factor::{FactorResult, FactorTrace};
use crate::rules::security::*;
use crate::rules::{lookup_choice, GENERAL_PUBLIC};

/// Exposure-surface risk.
///
/// Integration complexity is not a fixed weight: it adds the number of
/// integration points times the complexity slider, unrounded.
pub fn calculate_security(snapshot: &AssessmentSnapshot) -> FactorResult {
    let mut trace = FactorTrace::new(RiskFactor::Security);
    let api = snapshot.api_specs();
    let deployment = snapshot.deployment_model();
    let integrations = snapshot.integration_points();

    if let Some(rule) = lookup_choice(API_EXPOSURE, api) {
        trace.add(rule);
    }
    if let Some(rule) = lookup_choice(DEPLOYMENT, deployment) {
        trace.add(rule);
    }

    let integration_score = integrations.len() as f64 * snapshot.technical_complexity();
    if integration_score > 0.0 {
        trace.add_weight(INTEGRATIONS_LABEL, integration_score);
    }

    if snapshot.has_user_category(GENERAL_PUBLIC) {
        trace.add(&AUTH_COMPLEXITY);
    }

    if integrations.is_empty() {
        if api.is_some_and(|a| EXPOSED_APIS.contains(&a)) {
            trace.warn(EXPOSED_API_WARNING);
        }
        if deployment.is_some_and(|d| SHARED_DEPLOYMENTS.contains(&d)) {
            trace.warn(SHARED_DEPLOYMENT_WARNING);
        }
    }

    trace.finish()
}
