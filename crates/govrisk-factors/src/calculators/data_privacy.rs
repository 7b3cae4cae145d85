use govrisk_core::{AssessmentSnapshot, RiskFactor};

use crate::factor::{FactorResult, FactorTrace};
use crate::rules::data_privacy::*;
use crate::rules::{BIOMETRIC_DATA, CHILDRENS_DATA};

/// Personal-data handling risk.
///
/// Children's and biometric data raise advisory warnings in addition to the
/// sensitive-data contribution; they are not scored a second time here.
pub fn calculate_data_privacy(snapshot: &AssessmentSnapshot) -> FactorResult {
    let mut trace = FactorTrace::new(RiskFactor::DataPrivacy);
    let data_types = snapshot.data_types();

    if data_types
        .iter()
        .any(|t| SENSITIVE_TYPES.contains(&t.as_str()))
    {
        trace.add(&SENSITIVE_DATA);
    }
    if snapshot.has_data_type(CHILDRENS_DATA) {
        trace.warn(CHILDREN_WARNING);
    }
    if snapshot.has_data_type(BIOMETRIC_DATA) {
        trace.warn(BIOMETRIC_WARNING);
    }
    if snapshot.cross_border_transfer() && snapshot.data_protection_jurisdictions().is_empty() {
        trace.warn(CROSS_BORDER_WARNING);
    }

    if snapshot
        .data_volume()
        .is_some_and(|v| LARGE_VOLUMES.contains(&v))
    {
        trace.add(&LARGE_VOLUME);
    }
    if snapshot.cross_border_transfer() {
        trace.add(&CROSS_BORDER);
    }
    if snapshot.model_update_frequency() == Some(REAL_TIME_UPDATES) {
        trace.add(&REAL_TIME);
    }
    if snapshot.has_data_type(CHILDRENS_DATA) {
        trace.add(&MINORS_DATA);
    }
    if snapshot.multi_jurisdiction_handling() {
        trace.add(&MULTI_JURISDICTION);
    }
    if snapshot
        .data_retention()
        .is_some_and(|r| EXTENDED_RETENTION.contains(&r))
    {
        trace.add(&RETENTION);
    }

    trace.finish()
}
