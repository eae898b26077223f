use serde::{Deserialize, Serialize};

/// Thresholds and windows applied by the eligibility scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Score at or above which the case shows strong indicators.
    pub strong_allowance_score: u32,
    /// Score at or above which the case shows moderate indicators.
    pub moderate_allowance_score: u32,
    pub work_gap_months: u32,
    /// Month length used when measuring the work gap.
    pub days_per_month: u32,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            strong_allowance_score: 10,
            moderate_allowance_score: 6,
            work_gap_months: 60,
            days_per_month: 30,
        }
    }
}
