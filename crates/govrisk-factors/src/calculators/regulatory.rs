use govrisk_core::{AssessmentSnapshot, RiskFactor};

use crate::factor::{FactorResult, FactorTrace};
use crate::rules::regulatory::{
    Inference, Regime, AI_ACT, GDPR, MULTI_JURISDICTION, MULTI_JURISDICTION_THRESHOLD, REGIMES,
};
use crate::rules::BLACK_BOX;

/// How a regime came to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applicability {
    Explicit,
    Inferred,
    NotApplicable,
}

fn explicitly_checked(regime: &Regime, snapshot: &AssessmentSnapshot) -> bool {
    let checked = snapshot.data_protection_jurisdictions();
    let sector = snapshot.sector_specific();
    regime.explicit_labels.iter().any(|label| {
        checked.iter().any(|c| c == label) || sector.is_some_and(|s| s.includes(label))
    })
}

fn inferable(inference: &Inference, snapshot: &AssessmentSnapshot) -> bool {
    match *inference {
        Inference::Operates { region, country } => snapshot.operates_in(region, country),
        Inference::OperatesWithData {
            region,
            country,
            data_type,
        } => snapshot.operates_in(region, country) && snapshot.has_data_type(data_type),
        Inference::OperatesInSector {
            region,
            country,
            sectors,
        } => {
            snapshot.operates_in(region, country)
                && snapshot
                    .sector_specific()
                    .is_some_and(|s| sectors.iter().any(|sector| s.includes(sector)))
        }
        Inference::ProcessesData { data_type } => snapshot.has_data_type(data_type),
    }
}

fn applicability(regime: &Regime, snapshot: &AssessmentSnapshot) -> Applicability {
    if explicitly_checked(regime, snapshot) {
        Applicability::Explicit
    } else if inferable(&regime.inference, snapshot) {
        Applicability::Inferred
    } else {
        Applicability::NotApplicable
    }
}

/// Regulatory-regime risk.
///
/// A regime that is explicitly checked scores once and never warns. A regime
/// that is only inferable from jurisdictions, sectors, or data types scores
/// once and warns that it was inferred.
pub fn calculate_regulatory(snapshot: &AssessmentSnapshot) -> FactorResult {
    let mut trace = FactorTrace::new(RiskFactor::Regulatory);
    let mut gdpr_applies = false;

    for regime in REGIMES {
        let applies = applicability(regime, snapshot);
        if applies == Applicability::NotApplicable {
            continue;
        }
        trace.add(&regime.rule);
        if applies == Applicability::Inferred {
            tracing::debug!(regime = regime.name, "regime inferred");
            trace.warn(regime.inferred_warning);
        }
        if regime.name == GDPR.name {
            gdpr_applies = true;
        }
    }

    if gdpr_applies && snapshot.explainability_level() == Some(BLACK_BOX) {
        trace.add(&AI_ACT);
    }
    if snapshot.data_protection_jurisdictions().len() > MULTI_JURISDICTION_THRESHOLD {
        trace.add(&MULTI_JURISDICTION);
    }

    trace.finish()
}
