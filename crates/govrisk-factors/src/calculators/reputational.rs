use govrisk_core::{AssessmentSnapshot, RiskFactor};

use crate::factor::{FactorResult, FactorTrace};
use crate::rules::reputational::*;
use crate::rules::{CUSTOMERS, GENERAL_PUBLIC, MINIMAL_IMPACT, NON_CRITICAL};

/// Public-visibility and trust risk. Raises no warnings.
///
/// Missing criticality reads as non-critical and missing failure impact as
/// minimal, so an unanswered questionnaire scores the base.
pub fn calculate_reputational(snapshot: &AssessmentSnapshot) -> FactorResult {
    let mut trace = FactorTrace::new(RiskFactor::Reputational);
    let criticality = snapshot.system_criticality().unwrap_or(NON_CRITICAL);
    let failure_impact = snapshot.failure_impact().unwrap_or(MINIMAL_IMPACT);

    if snapshot.has_user_category(GENERAL_PUBLIC) {
        trace.add(&PUBLIC_FACING);
    }
    if snapshot.has_user_category(CUSTOMERS) && criticality != NON_CRITICAL {
        trace.add(&SOCIAL_AMPLIFICATION);
    }
    if snapshot
        .sector_specific()
        .and_then(|s| s.as_single())
        .is_some_and(|s| s == TRUST_CRITICAL_SECTOR)
    {
        trace.add(&TRUST_CRITICAL);
    }
    if failure_impact != MINIMAL_IMPACT {
        trace.add(&BRAND_IMPACT);
    }

    trace.finish()
}
