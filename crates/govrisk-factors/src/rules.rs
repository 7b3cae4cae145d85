//! # Rule Tables
//!
//! Every weight, threshold, and matched option string used by the factor
//! calculators. The calculators in [`crate::calculators`] only walk these
//! tables; changing a weight is a one-line diff here.
//!
//! Option strings are the exact values the assessment portal emits.

/// A named, fixed contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub label: &'static str,
    pub weight: f64,
}

const fn rule(label: &'static str, weight: f64) -> Rule {
    Rule { label, weight }
}

/// A rule selected by an exact option value.
pub type ChoiceRule = (&'static str, Rule);

/// Find the rule for `value` in a choice table.
pub fn lookup_choice(table: &'static [ChoiceRule], value: Option<&str>) -> Option<&'static Rule> {
    let value = value?;
    table
        .iter()
        .find(|(choice, _)| *choice == value)
        .map(|(_, rule)| rule)
}

// ---------------------------------------------------------------------------
// Shared option strings
// ---------------------------------------------------------------------------

pub const CHILDRENS_DATA: &str = "Children's Data (under 16)";
pub const BIOMETRIC_DATA: &str = "Biometric Data";
pub const HEALTH_RECORDS: &str = "Health/Medical Records";
pub const FINANCIAL_RECORDS: &str = "Financial Records";

pub const GENERAL_PUBLIC: &str = "General Public";
pub const CUSTOMERS: &str = "Customers";
pub const MINORS: &str = "Minors/Children";

pub const MISSION_CRITICAL: &str = "Mission Critical";
/// Assumed when no criticality was recorded.
pub const NON_CRITICAL: &str = "Non-Critical";
pub const CATASTROPHIC_IMPACT: &str = "Catastrophic/Life Safety";
/// Assumed when no failure impact was recorded.
pub const MINIMAL_IMPACT: &str = "Minimal/No Impact";

pub const BLACK_BOX: &str = "black-box";
pub const FULLY_AUTONOMOUS_OVERSIGHT: &str = "fully-autonomous";
pub const FULLY_AUTOMATED: &str = "Fully Automated";
pub const NO_BIAS_TESTING: &str = "No Testing Planned";

pub const ON_PREMISE: &str = "On-Premise";

// ---------------------------------------------------------------------------
// Data privacy
// ---------------------------------------------------------------------------

pub mod data_privacy {
    use super::{rule, Rule};

    pub const SENSITIVE_TYPES: &[&str] = &[
        super::HEALTH_RECORDS,
        super::FINANCIAL_RECORDS,
        super::BIOMETRIC_DATA,
        super::CHILDRENS_DATA,
    ];
    pub const LARGE_VOLUMES: &[&str] = &["large", "vlarge", "massive"];
    pub const EXTENDED_RETENTION: &[&str] = &["3-7years", "7+years"];
    pub const REAL_TIME_UPDATES: &str = "Real-time/Continuous";

    pub const SENSITIVE_DATA: Rule = rule("Processing sensitive PII", 3.0);
    pub const LARGE_VOLUME: Rule = rule("Large data volume >1TB", 1.5);
    pub const CROSS_BORDER: Rule = rule("Cross-border transfers", 2.0);
    pub const REAL_TIME: Rule = rule("Real-time processing", 0.5);
    pub const MINORS_DATA: Rule = rule("Processing minors data", 1.0);
    pub const MULTI_JURISDICTION: Rule = rule("Multi-jurisdiction handling", 0.8);
    pub const RETENTION: Rule = rule("Extended data retention", 0.5);

    pub const CHILDREN_WARNING: &str =
        "Children's Data (under 16) detected. Data privacy risk has been flagged as sensitive.";
    pub const BIOMETRIC_WARNING: &str =
        "Biometric Data detected. Data privacy risk has been flagged as sensitive.";
    pub const CROSS_BORDER_WARNING: &str = "Cross-border data transfer is required, but no jurisdictions are specified. Please review data protection requirements.";
}

// ---------------------------------------------------------------------------
// Security
// ---------------------------------------------------------------------------

pub mod security {
    use super::{rule, ChoiceRule, Rule};

    pub const API_EXPOSURE: &[ChoiceRule] = &[
        ("Public API", rule("Public API exposure", 2.0)),
        ("Partner API", rule("Partner API exposure", 1.5)),
        ("Internal API only", rule("Internal API exposure", 0.5)),
    ];
    pub const DEPLOYMENT: &[ChoiceRule] = &[
        ("Public Cloud", rule("Cloud deployment", 1.0)),
        ("Hybrid Cloud", rule("Hybrid deployment", 0.8)),
        ("Edge Computing", rule("Edge deployment", 1.2)),
    ];

    /// Label for the variable integration contribution.
    pub const INTEGRATIONS_LABEL: &str = "Multiple integrations";
    pub const AUTH_COMPLEXITY: Rule = rule("Authentication complexity", 0.5);

    pub const EXPOSED_APIS: &[&str] = &["Public API", "Partner API"];
    pub const SHARED_DEPLOYMENTS: &[&str] = &["Public Cloud", "Hybrid Cloud"];

    pub const EXPOSED_API_WARNING: &str = "Public or Partner API selected, but no integration points specified. Please ensure security controls are in place.";
    pub const SHARED_DEPLOYMENT_WARNING: &str = "Cloud or Hybrid deployment selected, but no integration points specified. Please ensure security controls are in place.";
}

// ---------------------------------------------------------------------------
// Regulatory
// ---------------------------------------------------------------------------

pub mod regulatory {
    use super::{rule, Rule};

    /// Jurisdiction/sector/data combination that implies a regime applies.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub enum Inference {
        /// The country is checked under the region.
        Operates {
            region: &'static str,
            country: &'static str,
        },
        /// The country is checked and the data type is processed.
        OperatesWithData {
            region: &'static str,
            country: &'static str,
            data_type: &'static str,
        },
        /// The country is checked and any of the sectors is selected.
        OperatesInSector {
            region: &'static str,
            country: &'static str,
            sectors: &'static [&'static str],
        },
        /// The data type is processed anywhere.
        ProcessesData { data_type: &'static str },
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Regime {
        pub name: &'static str,
        pub rule: Rule,
        /// Checklist labels that count as explicitly selecting the regime.
        pub explicit_labels: &'static [&'static str],
        pub inference: Inference,
        /// Emitted when the regime is inferred but not explicitly checked.
        pub inferred_warning: &'static str,
    }

    pub const US_FEDERAL: &str = "United States (Federal)";

    pub const GDPR: Regime = Regime {
        name: "GDPR",
        rule: rule("GDPR compliance required", 3.0),
        explicit_labels: &["GDPR (EU)"],
        inference: Inference::Operates {
            region: "Europe",
            country: "European Union",
        },
        inferred_warning: "European Union is selected as an operating jurisdiction, but GDPR (EU) is not checked in Data Protection. GDPR risk has been inferred.",
    };

    pub const REGIMES: &[Regime] = &[
        GDPR,
        Regime {
            name: "HIPAA",
            rule: rule("HIPAA compliance required", 3.0),
            explicit_labels: &["HIPAA (Healthcare)"],
            // Inferred from the data processed, not from a sector answer:
            // the HIPAA sector checkbox is already an explicit label above.
            inference: Inference::OperatesWithData {
                region: "Americas",
                country: US_FEDERAL,
                data_type: super::HEALTH_RECORDS,
            },
            inferred_warning: "United States (Federal) is selected and Health/Medical Records are processed, but HIPAA is not checked. HIPAA risk has been inferred.",
        },
        Regime {
            name: "PCI-DSS",
            rule: rule("PCI-DSS compliance required", 2.5),
            explicit_labels: &["PCI-DSS (Payment Cards)"],
            inference: Inference::ProcessesData {
                data_type: super::FINANCIAL_RECORDS,
            },
            inferred_warning: "Financial Records data type is selected, but PCI-DSS is not checked. PCI-DSS risk has been inferred.",
        },
        Regime {
            name: "SOX",
            rule: rule("SOX compliance required", 2.0),
            explicit_labels: &["SOX (Financial Reporting)", "SOX (Financial Services)"],
            inference: Inference::OperatesInSector {
                region: "Americas",
                country: US_FEDERAL,
                sectors: &["GLBA (Financial Privacy)", "FCRA (Credit Reporting)"],
            },
            inferred_warning: "United States (Federal) and Financial sector are selected, but SOX is not checked. SOX risk has been inferred.",
        },
        Regime {
            name: "LGPD",
            rule: rule("LGPD compliance required", 2.5),
            explicit_labels: &["LGPD (Brazil)"],
            inference: Inference::Operates {
                region: "Americas",
                country: "Brazil",
            },
            inferred_warning: "Brazil is selected as an operating jurisdiction, but LGPD (Brazil) is not checked in Data Protection. LGPD risk has been inferred.",
        },
        Regime {
            name: "PIPEDA",
            rule: rule("PIPEDA compliance required", 2.5),
            explicit_labels: &["PIPEDA (Canada)"],
            inference: Inference::Operates {
                region: "Americas",
                country: "Canada",
            },
            inferred_warning: "Canada is selected as an operating jurisdiction, but PIPEDA (Canada) is not checked in Data Protection. PIPEDA risk has been inferred.",
        },
        Regime {
            name: "POPI",
            rule: rule("POPI compliance required", 2.5),
            explicit_labels: &["POPI (South Africa)"],
            inference: Inference::Operates {
                region: "Middle East & Africa",
                country: "South Africa",
            },
            inferred_warning: "South Africa is selected as an operating jurisdiction, but POPI (South Africa) is not checked in Data Protection. POPI risk has been inferred.",
        },
        Regime {
            name: "APPI",
            rule: rule("APPI compliance required", 2.5),
            explicit_labels: &["APPI (Japan)"],
            inference: Inference::Operates {
                region: "Asia-Pacific",
                country: "Japan",
            },
            inferred_warning: "Japan is selected as an operating jurisdiction, but APPI (Japan) is not checked in Data Protection. APPI risk has been inferred.",
        },
        Regime {
            name: "Privacy Act (Australia)",
            rule: rule("Privacy Act (Australia) compliance required", 2.5),
            explicit_labels: &["Privacy Act (Australia)"],
            inference: Inference::Operates {
                region: "Asia-Pacific",
                country: "Australia",
            },
            inferred_warning: "Australia is selected as an operating jurisdiction, but Privacy Act (Australia) is not checked in Data Protection. Privacy Act risk has been inferred.",
        },
        Regime {
            name: "PDPA",
            rule: rule("PDPA compliance required", 2.5),
            explicit_labels: &["PDPA (Singapore)"],
            inference: Inference::Operates {
                region: "Asia-Pacific",
                country: "Singapore",
            },
            inferred_warning: "Singapore is selected as an operating jurisdiction, but PDPA (Singapore) is not checked in Data Protection. PDPA risk has been inferred.",
        },
    ];

    /// Added when GDPR applies and the model is a black box.
    pub const AI_ACT: Rule = rule("AI Act compliance", 1.8);
    /// Added when more than [`MULTI_JURISDICTION_THRESHOLD`] data-protection
    /// regimes are checked.
    pub const MULTI_JURISDICTION: Rule = rule("Multi-jurisdiction", 1.0);
    pub const MULTI_JURISDICTION_THRESHOLD: usize = 2;
}

// ---------------------------------------------------------------------------
// Ethical
// ---------------------------------------------------------------------------

pub mod ethical {
    use super::{rule, Rule};

    pub const AUTOMATED_LEVELS: &[&str] = &[super::FULLY_AUTOMATED, "Autonomous"];
    pub const WEAK_BIAS_TESTING: &[&str] = &[super::NO_BIAS_TESTING, "basic-statistical"];

    pub const AUTOMATED_DECISIONS: Rule = rule("Automated decision-making", 2.0);
    pub const BIAS_RISK: Rule = rule("Potential bias in outcomes", 1.3);
    pub const TRANSPARENCY_GAP: Rule = rule("Limited explainability", 0.5);
    pub const VULNERABLE_GROUPS: Rule = rule("Affects vulnerable groups", 1.0);
    pub const NO_HUMAN_OVERSIGHT: Rule = rule("No human oversight", 1.5);

    pub const MINORS_WARNING: &str =
        "Minors/Children are users, but no bias testing is planned. Please review ethical risk.";
    pub const OVERSIGHT_WARNING: &str =
        "Fully Automated decision-making selected with no human oversight. Please review ethical risk.";
}

// ---------------------------------------------------------------------------
// Operational
// ---------------------------------------------------------------------------

pub mod operational {
    use super::{rule, Rule};

    pub const BUSINESS_CRITICAL: Rule = rule("Business critical system", 3.0);

    /// (exclusive lower bound on integrations + model types, rule), highest first.
    pub const COMPLEXITY_TIERS: &[(usize, Rule)] = &[
        (5, rule("High complexity", 1.9)),
        (3, rule("Medium complexity", 1.0)),
    ];

    /// A catastrophic failure impact scores under both of these. The pair is
    /// kept separate so that dropping either is a single-line change.
    pub const CATASTROPHIC_PAIR: [Rule; 2] = [
        rule("Downtime impact severe", 1.0),
        rule("Catastrophic failure risk", 1.5),
    ];

    pub const LIMITED_REDUNDANCY: Rule = rule("Limited redundancy", 0.5);

    pub const NO_FAILOVER_WARNING: &str = "Mission Critical system selected, but no redundancy or failover specified. Please review operational risk mitigation.";
    pub const CATASTROPHIC_WARNING: &str =
        "Catastrophic/Life Safety failure impact selected. Please ensure mitigation strategies are documented.";
}

// ---------------------------------------------------------------------------
// Reputational
// ---------------------------------------------------------------------------

pub mod reputational {
    use super::{rule, Rule};

    pub const TRUST_CRITICAL_SECTOR: &str = "SOX (Financial Reporting)";

    pub const PUBLIC_FACING: Rule = rule("Public-facing system", 2.0);
    pub const SOCIAL_AMPLIFICATION: Rule = rule("Social media amplification", 1.5);
    pub const TRUST_CRITICAL: Rule = rule("Trust-critical decisions", 1.0);
    pub const BRAND_IMPACT: Rule = rule("Brand impact potential", 0.5);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_choice_matches_exact_value() {
        let rule = lookup_choice(security::API_EXPOSURE, Some("Partner API")).unwrap();
        assert_eq!(rule.weight, 1.5);
        assert!(lookup_choice(security::API_EXPOSURE, Some("partner api")).is_none());
        assert!(lookup_choice(security::API_EXPOSURE, None).is_none());
    }

    #[test]
    fn regime_names_are_unique() {
        let mut names: Vec<_> = regulatory::REGIMES.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), regulatory::REGIMES.len());
    }

    #[test]
    fn regime_weights_match_published_table() {
        let weight = |name: &str| {
            regulatory::REGIMES
                .iter()
                .find(|r| r.name == name)
                .map(|r| r.rule.weight)
                .unwrap()
        };
        assert_eq!(weight("GDPR"), 3.0);
        assert_eq!(weight("HIPAA"), 3.0);
        assert_eq!(weight("PCI-DSS"), 2.5);
        assert_eq!(weight("SOX"), 2.0);
        for name in ["LGPD", "PIPEDA", "POPI", "APPI", "Privacy Act (Australia)", "PDPA"] {
            assert_eq!(weight(name), 2.5, "{name}");
        }
    }

    #[test]
    fn gdpr_is_first_regime() {
        assert_eq!(regulatory::REGIMES[0], regulatory::GDPR);
    }

    #[test]
    fn every_regime_has_an_explicit_label_and_warning() {
        for regime in regulatory::REGIMES {
            assert!(!regime.explicit_labels.is_empty(), "{}", regime.name);
            assert!(regime.inferred_warning.contains("inferred"), "{}", regime.name);
        }
    }

    #[test]
    fn complexity_tiers_descend() {
        let bounds: Vec<_> = operational::COMPLEXITY_TIERS.iter().map(|(b, _)| *b).collect();
        assert!(bounds.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn catastrophic_pair_totals_two_and_a_half() {
        let total: f64 = operational::CATASTROPHIC_PAIR.iter().map(|r| r.weight).sum();
        assert_eq!(total, 2.5);
    }
}
