use serde::{Deserialize, Serialize};

use super::fields::{FieldKey, TOTAL_STEPS};

/// Progress bar state for the host to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
    pub percentage: f64,
    pub label: String,
}

impl Progress {
    pub fn at_step(step: usize) -> Self {
        let label = if step == 0 {
            "Welcome".to_string()
        } else {
            format!("Step {step} of {TOTAL_STEPS}")
        };

        Self {
            percentage: step as f64 / TOTAL_STEPS as f64 * 100.0,
            label,
        }
    }

    pub fn complete() -> Self {
        Self {
            percentage: 100.0,
            label: "Evaluation Complete".to_string(),
        }
    }
}

/// Blocking problems found when validating a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssue {
    ConsentRequired,
    InvalidAge,
}

impl ValidationIssue {
    pub const fn message(self) -> &'static str {
        match self {
            ValidationIssue::ConsentRequired => "Please acknowledge that you understand this is a preliminary screening tool by checking the consent box.",
            ValidationIssue::InvalidAge => "Please enter a valid age (0-120)",
        }
    }
}

/// Field-scoped validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: FieldKey,
    pub issue: ValidationIssue,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: impl Into<FieldKey>, issue: ValidationIssue) -> Self {
        Self {
            field: field.into(),
            issue,
            message: issue.message(),
        }
    }
}

/// Notification that the visible page changed; `TOTAL_STEPS + 1` is the results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepChange {
    pub from: usize,
    pub to: usize,
}

/// Position index of the results page.
pub const RESULTS_POSITION: usize = TOTAL_STEPS + 1;
