//! # Composite Risk
//!
//! Blends the six factor scores into one 0–10 score with the configured
//! weights, classifies it into a [`RiskTier`], and ranks the factors into an
//! action summary.
//!
//! The reported score is rounded to one decimal. The tier is taken from the
//! unrounded weighted sum, so 7.96 reports as 8.0 but stays `High`.

use serde::{Deserialize, Serialize};

use govrisk_core::{
    AssessmentSnapshot, CompositeWeights, EngineConfig, EngineError, RiskFactor, RiskTier,
};

use crate::calculators;
use crate::factor::{format_number, FactorResult};

/// One point on the risk radar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub factor: RiskFactor,
    pub label: String,
    pub score: f64,
}

/// How urgently a factor needs attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionLevel {
    /// Score of 8 or more.
    Act,
    /// Score in [4, 8).
    Monitor,
    /// Score below 4.
    None,
}

impl ActionLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= RiskTier::CRITICAL_FLOOR {
            Self::Act
        } else if score >= RiskTier::MEDIUM_FLOOR {
            Self::Monitor
        } else {
            Self::None
        }
    }
}

/// One ranked entry of the action summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSummaryEntry {
    pub factor: RiskFactor,
    pub score: f64,
    pub level: ActionLevel,
    pub items: Vec<String>,
}

/// Tier of every factor counted at or above medium.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeRiskResult {
    /// Weighted score rounded to one decimal.
    pub score: f64,
    pub tier: RiskTier,
    /// One result per factor, canonical order.
    pub per_factor_results: Vec<FactorResult>,
    pub regulatory_warnings: Vec<String>,
    pub action_summary: Vec<ActionSummaryEntry>,
    /// The weighted sum with each factor score substituted in.
    pub formula: String,
    pub chart: Vec<ChartPoint>,
}

impl CompositeRiskResult {
    pub fn factor(&self, factor: RiskFactor) -> Option<&FactorResult> {
        self.per_factor_results.iter().find(|r| r.factor == factor)
    }

    /// How many factors sit in each of the upper three tiers.
    pub fn tier_counts(&self) -> TierCounts {
        let mut counts = TierCounts::default();
        for result in &self.per_factor_results {
            match RiskTier::from_score(result.score) {
                RiskTier::Critical => counts.critical += 1,
                RiskTier::High => counts.high += 1,
                RiskTier::Medium => counts.medium += 1,
                RiskTier::Low => {}
            }
        }
        counts
    }

    /// Every warning raised by any factor, in canonical factor order.
    pub fn all_warnings(&self) -> Vec<&str> {
        self.per_factor_results
            .iter()
            .flat_map(|r| r.inferred_warnings.iter().map(String::as_str))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// CompositeCalculator
// ---------------------------------------------------------------------------

/// Computes [`CompositeRiskResult`]s under a validated configuration.
#[derive(Debug, Clone)]
pub struct CompositeCalculator {
    weights: CompositeWeights,
    action_depth: usize,
}

impl Default for CompositeCalculator {
    fn default() -> Self {
        Self {
            weights: CompositeWeights::default(),
            action_depth: EngineConfig::default().action_depth,
        }
    }
}

impl CompositeCalculator {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            weights: config.composite_weights,
            action_depth: config.action_depth,
        })
    }

    pub fn weights(&self) -> &CompositeWeights {
        &self.weights
    }

    /// Score every factor of `snapshot` and combine them.
    pub fn calculate(&self, snapshot: &AssessmentSnapshot) -> CompositeRiskResult {
        self.combine(calculators::calculate_all(snapshot))
    }

    /// Combine already-computed factor results.
    ///
    /// Results may arrive in any order; they are re-sorted into canonical
    /// order. A factor missing from `results` contributes nothing.
    pub fn combine(&self, mut results: Vec<FactorResult>) -> CompositeRiskResult {
        results.sort_by_key(|r| r.factor);

        let raw = self.weighted_sum(results.iter().map(|r| (r.factor, r.score)));
        let tier = RiskTier::from_score(raw);
        let score = round_one_decimal(raw);

        let regulatory_warnings = results
            .iter()
            .filter(|r| r.factor == RiskFactor::Regulatory)
            .flat_map(|r| r.inferred_warnings.iter().cloned())
            .collect();
        let action_summary = action_summary(&results, self.action_depth);
        let formula = self.formula(&results);
        let chart = results
            .iter()
            .map(|r| ChartPoint {
                factor: r.factor,
                label: r.factor.label().to_string(),
                score: r.score,
            })
            .collect();

        tracing::debug!(score, %tier, "composite risk computed");

        CompositeRiskResult {
            score,
            tier,
            per_factor_results: results,
            regulatory_warnings,
            action_summary,
            formula,
            chart,
        }
    }

    /// Composite of bare factor scores, unrounded. Returns the score and its
    /// tier.
    pub fn composite_from_scores(&self, scores: &[(RiskFactor, f64)]) -> (f64, RiskTier) {
        let raw = self.weighted_sum(scores.iter().copied());
        (raw, RiskTier::from_score(raw))
    }

    fn weighted_sum(&self, scores: impl Iterator<Item = (RiskFactor, f64)>) -> f64 {
        let mut by_factor: Vec<(RiskFactor, f64)> = scores.collect();
        by_factor.sort_by_key(|(factor, _)| *factor);
        let sum: f64 = by_factor
            .iter()
            .map(|(factor, score)| self.weights.weight(*factor) * score)
            .sum();
        denoise(sum)
    }

    fn formula(&self, results: &[FactorResult]) -> String {
        let terms: Vec<String> = RiskFactor::all()
            .iter()
            .map(|factor| {
                let score = results
                    .iter()
                    .find(|r| r.factor == *factor)
                    .map_or(0.0, |r| r.score);
                format!(
                    "{:.2}×{}",
                    self.weights.weight(*factor),
                    format_number(score)
                )
            })
            .collect();
        format!("({})", terms.join(" + "))
    }
}

/// Score a snapshot under the default weights.
pub fn calculate_composite(snapshot: &AssessmentSnapshot) -> CompositeRiskResult {
    CompositeCalculator::default().calculate(snapshot)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Strip floating-point accumulation noise below 1e-9 so that, for example,
/// nine on every factor sums to exactly 9.
fn denoise(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}

fn action_summary(results: &[FactorResult], depth: usize) -> Vec<ActionSummaryEntry> {
    let mut ranked: Vec<&FactorResult> = results.iter().collect();
    // Stable: ties keep canonical order.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

    ranked
        .into_iter()
        .take(depth)
        .map(|result| {
            let level = ActionLevel::from_score(result.score);
            let items = match level {
                ActionLevel::Act => {
                    let sources = if result.inferred_warnings.is_empty() {
                        result.factor_labels()
                    } else {
                        result.inferred_warnings.clone()
                    };
                    if sources.is_empty() {
                        vec!["Action: Critical - Immediate action required".to_string()]
                    } else {
                        sources.into_iter().map(|s| format!("Action: {s}")).collect()
                    }
                }
                ActionLevel::Monitor => {
                    let labels = result.factor_labels();
                    if labels.is_empty() {
                        vec!["Monitor this area".to_string()]
                    } else {
                        vec![format!("Monitor: {}", labels.join(", "))]
                    }
                }
                ActionLevel::None => vec!["No immediate action required".to_string()],
            };
            ActionSummaryEntry {
                factor: result.factor,
                score: result.score,
                level,
                items,
            }
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const DATA_TYPES: &[&str] = &[
        "Health/Medical Records",
        "Financial Records",
        "Biometric Data",
        "Children's Data (under 16)",
        "Contact Information",
    ];
    const USERS: &[&str] = &["General Public", "Customers", "Minors/Children", "Employees"];
    const PROTECTION: &[&str] = &["GDPR (EU)", "LGPD (Brazil)", "APPI (Japan)", "PDPA (Singapore)"];

    fn subset(pool: &'static [&'static str]) -> impl Strategy<Value = Vec<&'static str>> {
        proptest::sample::subsequence(pool, 0..=pool.len())
    }

    fn option(pool: &'static [&'static str]) -> impl Strategy<Value = Option<&'static str>> {
        proptest::option::of(proptest::sample::select(pool))
    }

    /// Sparse snapshots drawn from the option values the rule tables match on.
    fn snapshot() -> impl Strategy<Value = AssessmentSnapshot> {
        (
            (
                subset(DATA_TYPES),
                option(&["small", "large", "vlarge", "massive"]),
                any::<bool>(),
                option(&["1-3years", "7+years"]),
                subset(PROTECTION),
            ),
            (
                option(&["Public API", "Partner API", "Internal API", "No API"]),
                option(&["Public Cloud", "Hybrid", "On-Premise"]),
                0usize..6,
                0.0f64..5.0,
                option(&["Real-time/Continuous", "Monthly"]),
            ),
            (
                subset(USERS),
                option(&["Mission Critical", "Moderate", "Non-Critical"]),
                option(&["Catastrophic/Life Safety", "Moderate Disruption", "Minimal/No Impact"]),
                option(&["Fully Automated", "Autonomous", "Human-in-the-loop"]),
                option(&["black-box", "interpretable"]),
                any::<bool>(),
            ),
        )
            .prop_map(|(data, tech, business)| {
                let (types, volume, cross_border, retention, protection) = data;
                let (api, deployment, integrations, complexity, updates) = tech;
                let (users, criticality, impact, automation, explainability, eu) = business;
                let points: Vec<String> = (0..integrations).map(|i| format!("system-{i}")).collect();
                let value = json!({
                    "dataReadiness": {
                        "dataTypes": types,
                        "dataVolume": volume,
                        "crossBorderTransfer": cross_border,
                        "dataRetention": retention,
                    },
                    "technicalFeasibility": {
                        "apiSpecs": api,
                        "deploymentModels": deployment,
                        "integrationPoints": points,
                        "technicalComplexity": complexity,
                        "modelUpdateFrequency": updates,
                    },
                    "businessFeasibility": {
                        "userCategories": users,
                        "systemCriticality": criticality,
                        "failureImpact": impact,
                    },
                    "riskAssessment": {
                        "dataProtection": {"jurisdictions": protection},
                        "operatingJurisdictions": {"Europe": {"European Union": eu}},
                    },
                    "ethicalImpact": {
                        "decisionMaking": {"automationLevel": automation},
                        "modelCharacteristics": {"explainabilityLevel": explainability},
                    },
                });
                serde_json::from_value(value).unwrap()
            })
    }

    proptest! {
        /// Every factor score and the composite stay within [1, 10].
        #[test]
        fn scores_are_bounded(snapshot in snapshot()) {
            let composite = calculate_composite(&snapshot);
            prop_assert!((1.0..=10.0).contains(&composite.score));
            for result in &composite.per_factor_results {
                prop_assert!((1.0..=10.0).contains(&result.score), "{:?}", result);
            }
        }

        /// A factor score is exactly its contributions folded onto the base.
        #[test]
        fn score_reconstructs_from_contributions(snapshot in snapshot()) {
            for result in calculators::calculate_all(&snapshot) {
                let folded = result
                    .factors
                    .iter()
                    .fold(crate::factor::BASE_SCORE, |acc, c| acc + c.weight)
                    .min(crate::factor::MAX_SCORE);
                prop_assert_eq!(result.score, folded);
            }
        }

        /// Scoring the same snapshot twice is indistinguishable.
        #[test]
        fn scoring_is_idempotent(snapshot in snapshot()) {
            prop_assert_eq!(calculate_composite(&snapshot), calculate_composite(&snapshot));
        }

        /// The tier always matches the unrounded weighted sum.
        #[test]
        fn tier_matches_weighted_sum(snapshot in snapshot()) {
            let calc = CompositeCalculator::default();
            let composite = calc.calculate(&snapshot);
            let scores: Vec<_> = composite
                .per_factor_results
                .iter()
                .map(|r| (r.factor, r.score))
                .collect();
            let (raw, tier) = calc.composite_from_scores(&scores);
            prop_assert_eq!(composite.tier, tier);
            prop_assert!((composite.score - raw).abs() <= 0.05 + 1e-9);
        }
    }
}
