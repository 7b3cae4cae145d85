//! # Insight Engine
//!
//! Entry point for single-case analysis: runs both domain agents against a
//! [`CaseRecordSource`] and correlates their results.

use std::sync::Arc;

use govrisk_core::{CaseRecordSource, Clock, EngineConfig, EngineError};

use crate::correlation::{CorrelationEngine, UnifiedAnalysis};
use crate::financial::FinancialAgent;
use crate::governance::GovernanceAgent;

#[derive(Debug, Default)]
pub struct InsightEngine {
    financial: FinancialAgent,
    governance: GovernanceAgent,
    correlation: CorrelationEngine,
}

impl InsightEngine {
    /// Build every component from one validated configuration.
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        Ok(Self {
            financial: FinancialAgent::new(config)?,
            governance: GovernanceAgent::new(config)?,
            correlation: CorrelationEngine::new(config)?,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.governance = self.governance.with_clock(clock);
        self
    }

    pub fn financial(&self) -> &FinancialAgent {
        &self.financial
    }

    pub fn governance(&self) -> &GovernanceAgent {
        &self.governance
    }

    pub fn correlation(&self) -> &CorrelationEngine {
        &self.correlation
    }

    /// Full two-domain analysis of one case.
    ///
    /// Both domains must be present. A case missing either one fails with
    /// [`EngineError::MissingData`] naming that domain; financial is checked
    /// first.
    pub fn analyze(
        &self,
        case_id: &str,
        source: &dyn CaseRecordSource,
    ) -> Result<UnifiedAnalysis, EngineError> {
        let (financial, governance) = rayon::join(
            || self.financial.analyze(case_id, source),
            || self.governance.analyze(case_id, source),
        );
        Ok(self.correlation.unify(financial?, governance?))
    }
}
