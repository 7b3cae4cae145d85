//! # Domain Records
//!
//! Financial (FinOps) and governance records for a case, plus the
//! [`CaseRecordSource`] seam through which the engine obtains them.
//!
//! The engine never touches persistence. Whatever stores cases implements
//! [`CaseRecordSource`]; [`InMemoryCaseStore`] is the bundled implementation
//! used by the CLI and the tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Financial
// ---------------------------------------------------------------------------

/// Cost categories tracked in a FinOps record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    Development,
    Infrastructure,
    Operations,
    Api,
}

impl CostCategory {
    /// All categories in reporting order.
    pub fn all() -> &'static [CostCategory] {
        &[
            Self::Development,
            Self::Infrastructure,
            Self::Operations,
            Self::Api,
        ]
    }

    /// Short key used in insight descriptions and metrics.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Infrastructure => "infra",
            Self::Operations => "op",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// FinOps data for one case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    /// Return on investment as a multiple (1.0 = break-even).
    #[serde(rename = "ROI", alias = "roi")]
    pub roi: f64,
    pub total_investment: f64,
    pub net_value: f64,
    #[serde(default)]
    pub dev_cost_base: f64,
    #[serde(default)]
    pub infra_cost_base: f64,
    #[serde(default)]
    pub op_cost_base: f64,
    #[serde(default)]
    pub api_cost_base: f64,
    /// Annual growth of delivered value as a fraction (0.1 = 10%).
    #[serde(default)]
    pub value_growth_rate: f64,
}

impl FinancialRecord {
    /// Whether ratios against total investment are defined.
    pub fn has_investment(&self) -> bool {
        self.total_investment > 0.0
    }

    /// `amount / totalInvestment`, or 0 when nothing was invested.
    pub fn share_of_investment(&self, amount: f64) -> f64 {
        if self.has_investment() {
            amount / self.total_investment
        } else {
            0.0
        }
    }

    /// Net value per unit invested.
    pub fn investment_efficiency(&self) -> f64 {
        self.share_of_investment(self.net_value)
    }

    pub fn cost_base(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Development => self.dev_cost_base,
            CostCategory::Infrastructure => self.infra_cost_base,
            CostCategory::Operations => self.op_cost_base,
            CostCategory::Api => self.api_cost_base,
        }
    }

    /// Share of total investment spent in `category`.
    pub fn cost_share(&self, category: CostCategory) -> f64 {
        self.share_of_investment(self.cost_base(category))
    }
}

// ---------------------------------------------------------------------------
// Governance
// ---------------------------------------------------------------------------

/// The governance frameworks a case can be assessed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameworkKind {
    EuAiAct,
    Iso42001,
}

impl FrameworkKind {
    pub fn all() -> &'static [FrameworkKind] {
        &[Self::EuAiAct, Self::Iso42001]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::EuAiAct => "EU AI Act",
            Self::Iso42001 => "ISO 42001",
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress against one framework.
///
/// ISO 42001 assessments count clauses rather than requirements; the aliases
/// accept either naming.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameworkAssessment {
    #[serde(alias = "totalClauses")]
    pub total_requirements: u32,
    #[serde(alias = "compliantClauses")]
    pub completed_requirements: u32,
    #[serde(alias = "criticalClauses")]
    pub critical_requirements: u32,
    /// Outstanding requirement or clause identifiers.
    #[serde(alias = "missingRequirements", alias = "nonCompliantClauses")]
    pub gaps: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl FrameworkAssessment {
    /// completed / total in [0, 1], or 0 when the framework has no
    /// requirements. Over-reported completions count as full completion.
    pub fn completion_ratio(&self) -> f64 {
        if self.total_requirements == 0 {
            0.0
        } else {
            (f64::from(self.completed_requirements) / f64::from(self.total_requirements))
                .clamp(0.0, 1.0)
        }
    }

    pub fn pending_requirements(&self) -> u32 {
        self.total_requirements
            .saturating_sub(self.completed_requirements)
    }
}

/// An entry in the case's risk register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordedRisk {
    pub title: Option<String>,
    /// `critical`, `high`, `medium` or `low`. Anything else carries no weight.
    pub risk_level: String,
}

/// Governance data for one case. An empty record is valid and scores zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GovernanceRecord {
    #[serde(alias = "euAiActAssessments")]
    pub eu_ai_act: Option<FrameworkAssessment>,
    #[serde(rename = "iso42001", alias = "iso42001Assessments")]
    pub iso_42001: Option<FrameworkAssessment>,
    pub risks: Vec<RecordedRisk>,
}

impl GovernanceRecord {
    pub fn assessment(&self, kind: FrameworkKind) -> Option<&FrameworkAssessment> {
        match kind {
            FrameworkKind::EuAiAct => self.eu_ai_act.as_ref(),
            FrameworkKind::Iso42001 => self.iso_42001.as_ref(),
        }
    }

    /// Assessed frameworks in canonical order.
    pub fn assessed_frameworks(
        &self,
    ) -> impl Iterator<Item = (FrameworkKind, &FrameworkAssessment)> + '_ {
        FrameworkKind::all()
            .iter()
            .filter_map(move |kind| self.assessment(*kind).map(|a| (*kind, a)))
    }
}

// ---------------------------------------------------------------------------
// Record source
// ---------------------------------------------------------------------------

/// Supplies case records to the engine.
///
/// Implementations must be shareable across threads: the portfolio
/// aggregator queries them from a worker pool.
pub trait CaseRecordSource: Send + Sync {
    /// Every known case id, in a stable order.
    fn case_ids(&self) -> Vec<String>;

    fn contains_case(&self, case_id: &str) -> bool;

    /// `None` when the case has no FinOps data (or does not exist).
    fn financial_record(&self, case_id: &str) -> Option<FinancialRecord>;

    /// `None` when the case has no governance data (or does not exist).
    fn governance_record(&self, case_id: &str) -> Option<GovernanceRecord>;

    fn case_title(&self, case_id: &str) -> Option<String>;

    /// Identifies the current contents of this source. Two reads that see
    /// the same revision see the same records; any change to the records
    /// must produce a revision not used before. Cached results are keyed
    /// by it.
    fn revision(&self) -> u64;
}

/// One case as stored in a records document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub financial: Option<FinancialRecord>,
    #[serde(default)]
    pub governance: Option<GovernanceRecord>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CaseDocument {
    #[serde(default)]
    cases: Vec<CaseRecord>,
}

/// A [`CaseRecordSource`] over records held in memory.
///
/// Iteration order is insertion order. A later record with a duplicate id
/// replaces the earlier one in place.
///
/// Every insert draws a fresh revision from a process-wide counter, so
/// distinct stores never share a revision unless they are clones with
/// identical contents.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseStore {
    cases: Vec<CaseRecord>,
    index: HashMap<String, usize>,
    revision: u64,
}

/// Revision 0 is reserved for the empty store.
static NEXT_REVISION: AtomicU64 = AtomicU64::new(1);

impl InMemoryCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `{ "cases": [...] }` document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let doc: CaseDocument = serde_json::from_str(json)?;
        Ok(Self::from_cases(doc.cases))
    }

    pub fn from_cases(cases: impl IntoIterator<Item = CaseRecord>) -> Self {
        let mut store = Self::new();
        for case in cases {
            store.insert(case);
        }
        store
    }

    pub fn insert(&mut self, case: CaseRecord) {
        self.revision = NEXT_REVISION.fetch_add(1, Ordering::Relaxed);
        if let Some(&slot) = self.index.get(&case.id) {
            self.cases[slot] = case;
        } else {
            self.index.insert(case.id.clone(), self.cases.len());
            self.cases.push(case);
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    fn get(&self, case_id: &str) -> Option<&CaseRecord> {
        self.index.get(case_id).and_then(|&i| self.cases.get(i))
    }
}

impl CaseRecordSource for InMemoryCaseStore {
    fn case_ids(&self) -> Vec<String> {
        self.cases.iter().map(|c| c.id.clone()).collect()
    }

    fn contains_case(&self, case_id: &str) -> bool {
        self.index.contains_key(case_id)
    }

    fn financial_record(&self, case_id: &str) -> Option<FinancialRecord> {
        self.get(case_id)?.financial.clone()
    }

    fn governance_record(&self, case_id: &str) -> Option<GovernanceRecord> {
        self.get(case_id)?.governance.clone()
    }

    fn case_title(&self, case_id: &str) -> Option<String> {
        self.get(case_id)?.title.clone()
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
