//! # Factor Calculators
//!
//! One pure function per [`RiskFactor`]. Each walks its rule table from
//! [`crate::rules`] in a fixed order; rules are additive and independent, so
//! any subset may fire. Absent snapshot fields simply fail their predicates.

mod data_privacy;
mod ethical;
mod operational;
mod regulatory;
mod reputational;
mod security;

pub use data_privacy::calculate_data_privacy;
pub use ethical::calculate_ethical;
pub use operational::calculate_operational;
pub use regulatory::calculate_regulatory;
pub use reputational::calculate_reputational;
pub use security::calculate_security;

use govrisk_core::{AssessmentSnapshot, RiskFactor};

use crate::factor::FactorResult;

/// Score one factor.
pub fn calculate(factor: RiskFactor, snapshot: &AssessmentSnapshot) -> FactorResult {
    match factor {
        RiskFactor::DataPrivacy => calculate_data_privacy(snapshot),
        RiskFactor::Security => calculate_security(snapshot),
        RiskFactor::Regulatory => calculate_regulatory(snapshot),
        RiskFactor::Ethical => calculate_ethical(snapshot),
        RiskFactor::Operational => calculate_operational(snapshot),
        RiskFactor::Reputational => calculate_reputational(snapshot),
    }
}

/// Score every factor, in canonical order.
pub fn calculate_all(snapshot: &AssessmentSnapshot) -> Vec<FactorResult> {
    RiskFactor::all()
        .iter()
        .map(|factor| calculate(*factor, snapshot))
        .collect()
}
