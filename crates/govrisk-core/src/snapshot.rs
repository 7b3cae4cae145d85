//! # Assessment Snapshot
//!
//! The structured answers captured by the assessment wizard, as supplied by
//! the surrounding application. Every section and every field is optional:
//! absence means "not provided" and contributes nothing to any score.
//!
//! Choice answers are kept as the exact option strings the portal emits
//! (`"Public API"`, `"Mission Critical"`, ...). The rule tables in
//! `govrisk-factors` match against those strings, so the snapshot never needs
//! to know which options exist.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Region → country → selected, as emitted by the jurisdiction checklists.
pub type JurisdictionMap = BTreeMap<String, BTreeMap<String, bool>>;

// Checklist entries are checked only when literally `true`. `null`, strings,
// and other stray values read as unchecked instead of rejecting the snapshot.

fn checked_entries(entries: serde_json::Map<String, Value>) -> BTreeMap<String, bool> {
    entries
        .into_iter()
        .map(|(label, value)| (label, matches!(value, Value::Bool(true))))
        .collect()
}

fn lenient_checklist<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Map::deserialize(deserializer).map(checked_entries)
}

fn lenient_jurisdictions<'de, D>(deserializer: D) -> Result<Option<JurisdictionMap>, D::Error>
where
    D: Deserializer<'de>,
{
    let regions = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(regions.map(|regions| {
        regions
            .into_iter()
            .map(|(region, countries)| {
                let countries = match countries {
                    Value::Object(entries) => checked_entries(entries),
                    _ => BTreeMap::new(),
                };
                (region, countries)
            })
            .collect()
    }))
}

/// A complete (possibly sparse) assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssessmentSnapshot {
    pub data_readiness: Option<DataReadiness>,
    pub technical_feasibility: Option<TechnicalFeasibility>,
    pub business_feasibility: Option<BusinessFeasibility>,
    pub risk_assessment: Option<RiskAssessmentSection>,
    pub ethical_impact: Option<EthicalImpact>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataReadiness {
    pub data_types: Option<Vec<String>>,
    pub data_volume: Option<String>,
    pub cross_border_transfer: Option<bool>,
    pub data_retention: Option<String>,
    pub multi_jurisdiction_handling: Option<bool>,
    #[serde(deserialize_with = "lenient_jurisdictions")]
    pub operating_jurisdictions: Option<JurisdictionMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalFeasibility {
    pub model_update_frequency: Option<String>,
    pub api_specs: Option<String>,
    pub deployment_models: Option<String>,
    pub integration_points: Option<Vec<String>>,
    /// Slider value; multiplies the integration count in the security score.
    pub technical_complexity: Option<f64>,
    pub model_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessFeasibility {
    pub user_categories: Option<Vec<String>>,
    pub system_criticality: Option<String>,
    pub failure_impact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RiskAssessmentSection {
    pub data_protection: Option<DataProtection>,
    pub sector_specific: Option<SectorSelection>,
    #[serde(deserialize_with = "lenient_jurisdictions")]
    pub operating_jurisdictions: Option<JurisdictionMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataProtection {
    /// Checked data-protection regimes, e.g. `"GDPR (EU)"`.
    pub jurisdictions: Option<Vec<String>>,
}

/// The sector-specific answer: older records store a single radio value,
/// newer ones a checklist map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectorSelection {
    Single(String),
    Checklist(#[serde(deserialize_with = "lenient_checklist")] BTreeMap<String, bool>),
}

impl SectorSelection {
    /// Whether `label` is the selected value or a checked entry.
    pub fn includes(&self, label: &str) -> bool {
        match self {
            Self::Single(value) => value == label,
            Self::Checklist(map) => map.get(label).copied().unwrap_or(false),
        }
    }

    /// The single-string form, if this selection is a radio value.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Checklist(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EthicalImpact {
    pub decision_making: Option<DecisionMaking>,
    pub model_characteristics: Option<ModelCharacteristics>,
    pub ai_governance: Option<AiGovernance>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionMaking {
    pub automation_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelCharacteristics {
    pub bias_testing: Option<String>,
    pub explainability_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AiGovernance {
    pub human_oversight_level: Option<String>,
}

// ---------------------------------------------------------------------------
// Read accessors
// ---------------------------------------------------------------------------
//
// Calculators read through these so that a missing section, a missing field,
// and an empty list all look the same.

fn list(values: Option<&Vec<String>>) -> &[String] {
    values.map(Vec::as_slice).unwrap_or(&[])
}

impl AssessmentSnapshot {
    /// Parse a snapshot from JSON. Unknown fields are ignored.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn data_types(&self) -> &[String] {
        list(self.data_readiness.as_ref().and_then(|d| d.data_types.as_ref()))
    }

    pub fn has_data_type(&self, data_type: &str) -> bool {
        self.data_types().iter().any(|t| t == data_type)
    }

    pub fn data_volume(&self) -> Option<&str> {
        self.data_readiness.as_ref()?.data_volume.as_deref()
    }

    pub fn data_retention(&self) -> Option<&str> {
        self.data_readiness.as_ref()?.data_retention.as_deref()
    }

    /// `true` only when the flag was explicitly set.
    pub fn cross_border_transfer(&self) -> bool {
        self.data_readiness
            .as_ref()
            .and_then(|d| d.cross_border_transfer)
            .unwrap_or(false)
    }

    pub fn multi_jurisdiction_handling(&self) -> bool {
        self.data_readiness
            .as_ref()
            .and_then(|d| d.multi_jurisdiction_handling)
            .unwrap_or(false)
    }

    pub fn model_update_frequency(&self) -> Option<&str> {
        self.technical_feasibility.as_ref()?.model_update_frequency.as_deref()
    }

    pub fn api_specs(&self) -> Option<&str> {
        self.technical_feasibility.as_ref()?.api_specs.as_deref()
    }

    pub fn deployment_model(&self) -> Option<&str> {
        self.technical_feasibility.as_ref()?.deployment_models.as_deref()
    }

    pub fn integration_points(&self) -> &[String] {
        list(
            self.technical_feasibility
                .as_ref()
                .and_then(|t| t.integration_points.as_ref()),
        )
    }

    /// Complexity slider; 0 when absent.
    pub fn technical_complexity(&self) -> f64 {
        self.technical_feasibility
            .as_ref()
            .and_then(|t| t.technical_complexity)
            .unwrap_or(0.0)
    }

    pub fn model_types(&self) -> &[String] {
        list(
            self.technical_feasibility
                .as_ref()
                .and_then(|t| t.model_types.as_ref()),
        )
    }

    pub fn user_categories(&self) -> &[String] {
        list(
            self.business_feasibility
                .as_ref()
                .and_then(|b| b.user_categories.as_ref()),
        )
    }

    pub fn has_user_category(&self, category: &str) -> bool {
        self.user_categories().iter().any(|c| c == category)
    }

    pub fn system_criticality(&self) -> Option<&str> {
        self.business_feasibility.as_ref()?.system_criticality.as_deref()
    }

    pub fn failure_impact(&self) -> Option<&str> {
        self.business_feasibility.as_ref()?.failure_impact.as_deref()
    }

    /// Checked data-protection regimes.
    pub fn data_protection_jurisdictions(&self) -> &[String] {
        list(
            self.risk_assessment
                .as_ref()
                .and_then(|r| r.data_protection.as_ref())
                .and_then(|d| d.jurisdictions.as_ref()),
        )
    }

    pub fn sector_specific(&self) -> Option<&SectorSelection> {
        self.risk_assessment.as_ref()?.sector_specific.as_ref()
    }

    /// Operating jurisdictions, preferring the risk-assessment copy.
    pub fn operating_jurisdictions(&self) -> Option<&JurisdictionMap> {
        self.risk_assessment
            .as_ref()
            .and_then(|r| r.operating_jurisdictions.as_ref())
            .or_else(|| {
                self.data_readiness
                    .as_ref()
                    .and_then(|d| d.operating_jurisdictions.as_ref())
            })
    }

    /// Whether `country` is checked under `region`.
    pub fn operates_in(&self, region: &str, country: &str) -> bool {
        self.operating_jurisdictions()
            .and_then(|regions| regions.get(region))
            .and_then(|countries| countries.get(country))
            .copied()
            .unwrap_or(false)
    }

    pub fn automation_level(&self) -> Option<&str> {
        self.ethical_impact
            .as_ref()?
            .decision_making
            .as_ref()?
            .automation_level
            .as_deref()
    }

    pub fn bias_testing(&self) -> Option<&str> {
        self.ethical_impact
            .as_ref()?
            .model_characteristics
            .as_ref()?
            .bias_testing
            .as_deref()
    }

    pub fn explainability_level(&self) -> Option<&str> {
        self.ethical_impact
            .as_ref()?
            .model_characteristics
            .as_ref()?
            .explainability_level
            .as_deref()
    }

    pub fn human_oversight_level(&self) -> Option<&str> {
        self.ethical_impact
            .as_ref()?
            .ai_governance
            .as_ref()?
            .human_oversight_level
            .as_deref()
    }
}
