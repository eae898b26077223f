//! Event contract between the input surface and the session.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::FieldValue;
use super::evaluation::EvaluationResult;
use super::fields::FieldKey;
use super::repository::SessionStore;
use super::session::{AdvanceOutcome, FormSession, ResetConfirmation, SessionError};
use super::views::{FieldError, Progress, StepChange, RESULTS_POSITION};

/// Discrete user action forwarded by the host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    FieldChanged { key: FieldKey, value: FieldValue },
    Advance,
    Retreat,
    AddJobEntry,
    Reset { confirmation: ResetConfirmation },
}

/// Everything the host needs to re-render after an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionUpdate {
    pub progress: Progress,
    pub errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_change: Option<StepChange>,
    /// Suffix of the entry an `AddJobEntry` created; absent at the entry limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_entry: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<EvaluationResult>,
}

impl<S> FormSession<S>
where
    S: SessionStore + 'static,
{
    pub fn handle(&mut self, event: SessionEvent) -> Result<SessionUpdate, SessionError> {
        self.handle_on(event, Local::now().date_naive())
    }

    /// Apply `event`, evaluating against `today` if it finishes the questionnaire.
    pub fn handle_on(
        &mut self,
        event: SessionEvent,
        today: NaiveDate,
    ) -> Result<SessionUpdate, SessionError> {
        let mut errors = Vec::new();
        let mut step_change = None;
        let mut job_entry = None;
        let mut result = None;

        match event {
            SessionEvent::FieldChanged { key, value } => {
                let before = self.position();
                self.record_field(key, value)?;
                if before != self.position() {
                    step_change = Some(StepChange {
                        from: before,
                        to: self.position(),
                    });
                }
            }
            SessionEvent::Advance => {
                let before = self.position();
                match self.advance_on(today)? {
                    AdvanceOutcome::Blocked(blocked) => errors = blocked,
                    AdvanceOutcome::Moved(change) => step_change = Some(change),
                    AdvanceOutcome::Completed(evaluation) => {
                        if before != RESULTS_POSITION {
                            step_change = Some(StepChange {
                                from: before,
                                to: RESULTS_POSITION,
                            });
                        }
                        result = Some(evaluation);
                    }
                }
            }
            SessionEvent::Retreat => step_change = self.retreat(),
            SessionEvent::AddJobEntry => job_entry = self.add_job_entry(),
            SessionEvent::Reset { confirmation } => {
                let before = self.position();
                if self.reset(confirmation)? && before != 0 {
                    step_change = Some(StepChange { from: before, to: 0 });
                }
            }
        }

        Ok(SessionUpdate {
            progress: self.progress(),
            errors,
            step_change,
            job_entry,
            result,
        })
    }
}
