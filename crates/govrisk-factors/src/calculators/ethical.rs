use govrisk_core::{AssessmentSnapshot, RiskFactor};

use crate::factor::{FactorResult, FactorTrace};
use crate::rules::ethical::*;
use crate::rules::{BLACK_BOX, FULLY_AUTOMATED, FULLY_AUTONOMOUS_OVERSIGHT, MINORS, NO_BIAS_TESTING};

/// Automation, bias, transparency, and oversight risk.
pub fn calculate_ethical(snapshot: &AssessmentSnapshot) -> FactorResult {
    let mut trace = FactorTrace::new(RiskFactor::Ethical);
    let automation = snapshot.automation_level();
    let bias_testing = snapshot.bias_testing();
    let oversight = snapshot.human_oversight_level();
    let minors_are_users = snapshot.has_user_category(MINORS);

    if automation.is_some_and(|a| AUTOMATED_LEVELS.contains(&a)) {
        trace.add(&AUTOMATED_DECISIONS);
    }
    if bias_testing.is_some_and(|b| WEAK_BIAS_TESTING.contains(&b)) {
        trace.add(&BIAS_RISK);
    }
    if snapshot.explainability_level() == Some(BLACK_BOX) {
        trace.add(&TRANSPARENCY_GAP);
    }
    if minors_are_users {
        trace.add(&VULNERABLE_GROUPS);
    }
    if oversight == Some(FULLY_AUTONOMOUS_OVERSIGHT) {
        trace.add(&NO_HUMAN_OVERSIGHT);
    }

    if minors_are_users && bias_testing.map_or(true, |b| b == NO_BIAS_TESTING) {
        trace.warn(MINORS_WARNING);
    }
    if automation == Some(FULLY_AUTOMATED)
        && oversight.map_or(true, |o| o == FULLY_AUTONOMOUS_OVERSIGHT)
    {
        trace.warn(OVERSIGHT_WARNING);
    }

    trace.finish()
}
