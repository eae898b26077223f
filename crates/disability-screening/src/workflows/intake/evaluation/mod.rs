mod config;
mod policy;
pub(crate) mod rules;

pub use config::EvaluationConfig;
pub use policy::{Determination, IndicatorStrength};
pub use rules::ScoringRule;

use chrono::NaiveDate;
use policy::decide_strength;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::domain::FieldSnapshot;

/// Stateless scorer applying the point heuristic to a snapshot.
#[derive(Debug, Clone, Default)]
pub struct EligibilityScorer {
    config: EvaluationConfig,
}

impl EligibilityScorer {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    /// Score `snapshot` as of `as_of`; the date only affects the work-gap rule.
    pub fn evaluate(&self, snapshot: &FieldSnapshot, as_of: NaiveDate) -> EvaluationResult {
        let (components, score, signals) = rules::score_snapshot(snapshot, &self.config, as_of);
        let strength = decide_strength(score, &self.config, &signals);

        for component in &components {
            trace!(rule = ?component.rule, points = component.points, "rule applied");
        }
        debug!(
            score,
            severe_condition = signals.severe_condition,
            ?strength,
            "snapshot scored"
        );

        EvaluationResult {
            determination: strength.determination(),
            strength,
            score,
            summary: strength.summary(),
            factors: components
                .into_iter()
                .map(|component| component.note)
                .collect(),
            recommendations: strength.recommendations(),
        }
    }
}

/// Score `snapshot` with the default thresholds.
pub fn evaluate(snapshot: &FieldSnapshot, as_of: NaiveDate) -> EvaluationResult {
    EligibilityScorer::default().evaluate(snapshot, as_of)
}

/// Verdict returned when the final step is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub determination: Determination,
    pub strength: IndicatorStrength,
    pub score: u32,
    pub summary: String,
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}
