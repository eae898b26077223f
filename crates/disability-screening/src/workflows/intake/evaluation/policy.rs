use serde::{Deserialize, Serialize};

use super::config::EvaluationConfig;
use super::rules::ScoreSignals;

/// Preliminary screening verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Determination {
    Allowance,
    Denial,
}

impl Determination {
    pub const fn label(self) -> &'static str {
        match self {
            Determination::Allowance => "Likely Allowance",
            Determination::Denial => "Likely Denial",
        }
    }
}

/// How strongly the answers point toward an allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorStrength {
    Strong,
    Moderate,
    Limited,
}

impl IndicatorStrength {
    pub const fn determination(self) -> Determination {
        match self {
            IndicatorStrength::Strong | IndicatorStrength::Moderate => Determination::Allowance,
            IndicatorStrength::Limited => Determination::Denial,
        }
    }

    pub fn summary(self) -> String {
        match self {
            IndicatorStrength::Strong => "Based on the information provided, this case shows strong indicators for disability allowance. The combination of medical conditions, functional limitations, and other factors suggests you likely meet SSA disability criteria.".to_string(),
            IndicatorStrength::Moderate => "Based on the information provided, this case shows moderate to strong indicators for disability allowance. However, the outcome will heavily depend on the medical evidence and documentation you can provide.".to_string(),
            IndicatorStrength::Limited => "Based on the information provided, this preliminary screening suggests your case may face challenges in meeting SSA disability criteria. However, this does not mean you should not apply - each case is unique and evaluated on complete medical evidence.".to_string(),
        }
    }

    pub fn recommendations(self) -> Vec<String> {
        let items: &[&str] = match self {
            IndicatorStrength::Strong => &[
                "Gather all medical records documenting your conditions and limitations",
                "Obtain detailed statements from treating physicians about your functional capacity",
                "File your application as soon as possible if you haven't already",
            ],
            IndicatorStrength::Moderate => &[
                "Ensure you have comprehensive medical documentation of all conditions",
                "Request detailed RFC assessments from your doctors",
                "Document all limitations in daily activities",
            ],
            IndicatorStrength::Limited => &[
                "Consult with your doctors about the full extent of your limitations",
                "Ensure all medical conditions are properly documented and treated",
                "Consider whether your conditions have worsened since last evaluation",
                "If denied, you have the right to appeal with additional evidence",
            ],
        };
        items.iter().map(|item| item.to_string()).collect()
    }
}

pub(crate) fn decide_strength(
    score: u32,
    config: &EvaluationConfig,
    signals: &ScoreSignals,
) -> IndicatorStrength {
    if signals.severe_condition || score >= config.strong_allowance_score {
        return IndicatorStrength::Strong;
    }

    if score >= config.moderate_allowance_score {
        return IndicatorStrength::Moderate;
    }

    IndicatorStrength::Limited
}
