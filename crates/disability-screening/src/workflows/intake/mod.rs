//! Multi-step disability screening intake.
//!
//! `FormSession` drives the questionnaire: it validates each step, masks date
//! input, derives the last-employment date from the job history, and persists
//! the whole answer snapshot through a `SessionStore` after every change. On the
//! final step it hands the snapshot to the `EligibilityScorer`, which applies a
//! fixed point heuristic and returns a preliminary determination.

pub mod dates;
pub mod domain;
pub mod evaluation;
pub mod events;
pub mod fields;
pub mod repository;
pub mod session;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{FieldSnapshot, FieldValue, RestoredSnapshot};
pub use evaluation::{
    evaluate, Determination, EligibilityScorer, EvaluationConfig, EvaluationResult,
    IndicatorStrength, ScoringRule,
};
pub use events::{SessionEvent, SessionUpdate};
pub use fields::{
    fields_for_step, Field, FieldDescriptor, FieldKey, FieldKeyError, FieldKind,
    FieldValueError, JobField, MAX_JOB_ENTRIES, TOTAL_STEPS,
};
pub use repository::{InMemorySessionStore, SessionStore, StorageError};
pub use session::{AdvanceOutcome, FormSession, ResetConfirmation, SessionError};
pub use views::{FieldError, Progress, StepChange, ValidationIssue, RESULTS_POSITION};
