//! # Engine Configuration
//!
//! Weight tables and tunables for the scoring and insight engines. Defaults
//! reproduce the production weighting; a YAML or JSON file may override any
//! subset of fields.
//!
//! Every engine constructor calls [`EngineConfig::validate`], so a weight
//! table that does not sum to 1.0 is rejected before any score is produced.

use serde::{Deserialize, Serialize};

use crate::domain::RiskFactor;
use crate::error::ConfigurationError;

/// Allowed drift of a weight table's sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Per-factor weights for the composite risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    pub data_privacy: f64,
    pub security: f64,
    pub regulatory: f64,
    pub ethical: f64,
    pub operational: f64,
    pub reputational: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            data_privacy: 0.25,
            security: 0.20,
            regulatory: 0.30,
            ethical: 0.10,
            operational: 0.10,
            reputational: 0.05,
        }
    }
}

impl CompositeWeights {
    pub fn weight(&self, factor: RiskFactor) -> f64 {
        match factor {
            RiskFactor::DataPrivacy => self.data_privacy,
            RiskFactor::Security => self.security,
            RiskFactor::Regulatory => self.regulatory,
            RiskFactor::Ethical => self.ethical,
            RiskFactor::Operational => self.operational,
            RiskFactor::Reputational => self.reputational,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_table(
            "composite",
            RiskFactor::all()
                .iter()
                .map(|f| (f.as_str(), self.weight(*f))),
        )
    }
}

/// Blend weights for the unified cross-domain scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnifiedWeights {
    pub risk_financial: f64,
    pub risk_governance: f64,
    pub opportunity_financial: f64,
    pub opportunity_governance: f64,
}

impl Default for UnifiedWeights {
    fn default() -> Self {
        Self {
            risk_financial: 0.6,
            risk_governance: 0.4,
            opportunity_financial: 0.7,
            opportunity_governance: 0.3,
        }
    }
}

impl UnifiedWeights {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_table(
            "unified_risk",
            [
                ("financial", self.risk_financial),
                ("governance", self.risk_governance),
            ],
        )?;
        validate_table(
            "unified_opportunity",
            [
                ("financial", self.opportunity_financial),
                ("governance", self.opportunity_governance),
            ],
        )
    }
}

fn validate_table(
    table: &'static str,
    weights: impl IntoIterator<Item = (&'static str, f64)>,
) -> Result<(), ConfigurationError> {
    let mut sum = 0.0;
    for (key, weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigurationError::InvalidWeight { table, key, weight });
        }
        sum += weight;
    }
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigurationError::WeightSum { table, sum });
    }
    Ok(())
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub composite_weights: CompositeWeights,
    pub unified_weights: UnifiedWeights,
    /// How many of the highest-scoring factors the action summary covers.
    pub action_depth: usize,
    pub top_performers: usize,
    pub priority_action_limit: usize,
    pub recommendation_limit: usize,
    pub cache_ttl_secs: u64,
    /// Portfolio evaluation budget. Cases not started in time are reported
    /// as timed out.
    pub portfolio_deadline_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            composite_weights: CompositeWeights::default(),
            unified_weights: UnifiedWeights::default(),
            action_depth: 3,
            top_performers: 5,
            priority_action_limit: 5,
            recommendation_limit: 5,
            cache_ttl_secs: 300,
            portfolio_deadline_ms: None,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.composite_weights.validate()?;
        self.unified_weights.validate()?;

        let factor_count = RiskFactor::all().len();
        if self.action_depth == 0 || self.action_depth > factor_count {
            return Err(ConfigurationError::InvalidValue {
                field: "action_depth",
                reason: format!("must be between 1 and {factor_count}"),
            });
        }
        for (field, value) in [
            ("top_performers", self.top_performers),
            ("priority_action_limit", self.priority_action_limit),
            ("recommendation_limit", self.recommendation_limit),
        ] {
            if value == 0 {
                return Err(ConfigurationError::InvalidValue {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if self.portfolio_deadline_ms == Some(0) {
            return Err(ConfigurationError::InvalidValue {
                field: "portfolio_deadline_ms",
                reason: "must be positive when set".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn composite_defaults_sum_to_one() {
        let w = CompositeWeights::default();
        let sum: f64 = RiskFactor::all().iter().map(|f| w.weight(*f)).sum();
        assert!((sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn unbalanced_composite_rejected() {
        let config = EngineConfig {
            composite_weights: CompositeWeights {
                regulatory: 0.35,
                ..Default::default()
            },
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigurationError::WeightSum { table, sum }) => {
                assert_eq!(table, "composite");
                assert!((sum - 1.05).abs() < 1e-9);
            }
            other => panic!("expected WeightSum, got {other:?}"),
        }
    }

    #[test]
    fn negative_weight_rejected() {
        let weights = UnifiedWeights {
            risk_financial: 1.4,
            risk_governance: -0.4,
            ..Default::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ConfigurationError::InvalidWeight {
                table: "unified_risk",
                key: "governance",
                ..
            })
        ));
    }

    #[test]
    fn nan_weight_rejected() {
        let weights = CompositeWeights {
            ethical: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ConfigurationError::InvalidWeight { key: "ethical", .. })
        ));
    }

    #[test]
    fn action_depth_bounds() {
        for depth in [0, 7] {
            let config = EngineConfig {
                action_depth: depth,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigurationError::InvalidValue { field: "action_depth", .. })
            ));
        }
    }

    #[test]
    fn zero_deadline_rejected() {
        let config = EngineConfig {
            portfolio_deadline_ms: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = EngineConfig::from_json(
            r#"{"action_depth": 2, "composite_weights": {"security": 0.2}}"#,
        )
        .unwrap();
        assert_eq!(config.action_depth, 2);
        assert_eq!(config.top_performers, 5);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.composite_weights, CompositeWeights::default());
        config.validate().unwrap();
    }
}
