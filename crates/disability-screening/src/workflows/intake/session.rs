use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::dates;
use super::domain::{FieldSnapshot, FieldValue, RestoredSnapshot};
use super::evaluation::{EligibilityScorer, EvaluationResult};
use super::fields::{
    Field, FieldKey, FieldValueError, JobField, CONSENT_ACKNOWLEDGED, MAX_JOB_ENTRIES,
    TOTAL_STEPS,
};
use super::repository::{SessionStore, StorageError};
use super::views::{FieldError, Progress, StepChange, ValidationIssue, RESULTS_POSITION};
use crate::config::SessionConfig;

const MAX_AGE: f64 = 120.0;

/// Result of an `advance` request.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// The current step failed validation; nothing moved.
    Blocked(Vec<FieldError>),
    Moved(StepChange),
    Completed(EvaluationResult),
}

/// Explicit answer to the "start over?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetConfirmation {
    Confirmed,
    Declined,
}

/// Error raised by the intake session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("field {0} is not part of this questionnaire")]
    UnknownField(FieldKey),
    #[error("field {key} rejected value: {source}")]
    InvalidValue {
        key: FieldKey,
        #[source]
        source: FieldValueError,
    },
    #[error("field {0} is disabled")]
    FieldDisabled(FieldKey),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One user's pass through the questionnaire.
///
/// Owns the navigation position and the field snapshot, and writes the whole
/// snapshot to the store after every change.
pub struct FormSession<S> {
    store: Arc<S>,
    storage_key: String,
    scorer: EligibilityScorer,
    snapshot: FieldSnapshot,
    step: usize,
    job_count: u32,
    result: Option<EvaluationResult>,
}

impl<S> FormSession<S>
where
    S: SessionStore + 'static,
{
    /// Start a session, restoring any snapshot left in the store.
    pub fn open(store: Arc<S>, config: &SessionConfig) -> Self {
        Self::with_scorer(store, config, EligibilityScorer::default())
    }

    /// Only job entries with at least one answered part are restored; blank
    /// trailing entries are not persisted and do not survive a reload.
    pub fn with_scorer(store: Arc<S>, config: &SessionConfig, scorer: EligibilityScorer) -> Self {
        let snapshot = restore_snapshot(store.as_ref(), &config.storage_key);
        let job_count = snapshot.job_indices().last().copied().unwrap_or(1).max(1);

        let mut session = Self {
            store,
            storage_key: config.storage_key.clone(),
            scorer,
            snapshot,
            step: 0,
            job_count,
            result: None,
        };

        if session.snapshot.text(Field::CurrentlyWorking) == Some("yes") {
            session.snapshot.remove(Field::LastEmployed);
        }

        session
    }

    pub fn snapshot(&self) -> &FieldSnapshot {
        &self.snapshot
    }

    /// Current data-entry step in `0..=TOTAL_STEPS`.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Visible page; `RESULTS_POSITION` while a result is shown.
    pub fn position(&self) -> usize {
        if self.result.is_some() {
            RESULTS_POSITION
        } else {
            self.step
        }
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        self.result.as_ref()
    }

    pub fn job_count(&self) -> u32 {
        self.job_count
    }

    pub fn progress(&self) -> Progress {
        if self.result.is_some() {
            Progress::complete()
        } else {
            Progress::at_step(self.step)
        }
    }

    /// `lastEmployed` is only editable while the user is not currently working.
    pub fn is_enabled(&self, key: impl Into<FieldKey>) -> bool {
        match key.into() {
            FieldKey::Question(Field::LastEmployed) => {
                self.snapshot.text(Field::CurrentlyWorking) != Some("yes")
            }
            _ => true,
        }
    }

    /// Upsert a field, normalize it, and persist the whole snapshot.
    ///
    /// The change is applied in memory only once the store accepts it.
    pub fn record_field(
        &mut self,
        key: impl Into<FieldKey>,
        value: FieldValue,
    ) -> Result<(), SessionError> {
        let key = key.into();
        if let FieldKey::Job { index, .. } = key {
            if index == 0 || index > self.job_count {
                return Err(SessionError::UnknownField(key));
            }
        }
        if !self.is_enabled(key) {
            return Err(SessionError::FieldDisabled(key));
        }

        let value = key
            .kind()
            .normalize(value)
            .map_err(|source| SessionError::InvalidValue { key, source })?;

        let mut candidate = self.snapshot.clone();
        candidate.insert(key, value);

        match key {
            FieldKey::Job {
                part: JobField::To, ..
            } => populate_last_employed(&mut candidate),
            FieldKey::Question(Field::CurrentlyWorking) => sync_last_employed(&mut candidate),
            _ => {}
        }

        self.persist(&candidate)?;
        self.snapshot = candidate;
        self.result = None;
        Ok(())
    }

    pub fn record_text(
        &mut self,
        key: impl Into<FieldKey>,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.record_field(key, FieldValue::Text(value.into()))
    }

    pub fn record_choices<I, V>(
        &mut self,
        key: impl Into<FieldKey>,
        values: I,
    ) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.record_field(key, FieldValue::choices(values))
    }

    /// Append one job-history entry and return its suffix, or `None` once
    /// `MAX_JOB_ENTRIES` entries exist.
    pub fn add_job_entry(&mut self) -> Option<u32> {
        if self.job_count >= MAX_JOB_ENTRIES {
            info!(jobs = self.job_count, "job entry limit reached");
            return None;
        }
        self.job_count += 1;
        debug!(job = self.job_count, "job entry added");
        Some(self.job_count)
    }

    /// Blocking validation for `step`; empty when the step may be left.
    pub fn validate_step(&self, step: usize) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if step == 0 && !self.snapshot.has_choice(Field::Consent, CONSENT_ACKNOWLEDGED) {
            errors.push(FieldError::new(Field::Consent, ValidationIssue::ConsentRequired));
        }

        if step == TOTAL_STEPS && !valid_age(self.snapshot.text(Field::CurrentAge)) {
            errors.push(FieldError::new(Field::CurrentAge, ValidationIssue::InvalidAge));
        }

        errors
    }

    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        self.advance_on(Local::now().date_naive())
    }

    /// Validate the current step and move forward, evaluating on the final step.
    pub fn advance_on(&mut self, today: NaiveDate) -> Result<AdvanceOutcome, SessionError> {
        if let Some(result) = &self.result {
            return Ok(AdvanceOutcome::Completed(result.clone()));
        }

        let errors = self.validate_step(self.step);
        if !errors.is_empty() {
            info!(step = self.step, issues = errors.len(), "step blocked by validation");
            return Ok(AdvanceOutcome::Blocked(errors));
        }

        self.persist(&self.snapshot)?;

        if self.step < TOTAL_STEPS {
            let change = StepChange {
                from: self.step,
                to: self.step + 1,
            };
            self.step += 1;
            debug!(from = change.from, to = change.to, "step advanced");
            return Ok(AdvanceOutcome::Moved(change));
        }

        let result = self.scorer.evaluate(&self.snapshot, today);
        info!(
            determination = ?result.determination,
            score = result.score,
            "screening evaluated"
        );
        self.result = Some(result.clone());
        Ok(AdvanceOutcome::Completed(result))
    }

    /// Step back one page; leaving the results page discards the result.
    pub fn retreat(&mut self) -> Option<StepChange> {
        if self.result.take().is_some() {
            return Some(StepChange {
                from: RESULTS_POSITION,
                to: self.step,
            });
        }

        if self.step == 0 {
            return None;
        }

        let change = StepChange {
            from: self.step,
            to: self.step - 1,
        };
        self.step -= 1;
        debug!(from = change.from, to = change.to, "step retreated");
        Some(change)
    }

    /// Clear every answer and return to the consent page once confirmed.
    pub fn reset(&mut self, confirmation: ResetConfirmation) -> Result<bool, SessionError> {
        if confirmation == ResetConfirmation::Declined {
            return Ok(false);
        }

        self.store.remove(&self.storage_key)?;
        self.snapshot.clear();
        self.step = 0;
        self.job_count = 1;
        self.result = None;
        info!("intake session reset");
        Ok(true)
    }

    fn persist(&self, snapshot: &FieldSnapshot) -> Result<(), SessionError> {
        let payload = snapshot.to_json()?;
        self.store.save(&self.storage_key, &payload)?;
        Ok(())
    }
}

fn populate_last_employed(snapshot: &mut FieldSnapshot) {
    if snapshot.text(Field::CurrentlyWorking) != Some("no") {
        return;
    }

    if let Some(latest) = dates::latest(snapshot.job_end_dates()) {
        let latest = latest.to_string();
        snapshot.insert(Field::LastEmployed, FieldValue::Text(latest));
    }
}

fn sync_last_employed(snapshot: &mut FieldSnapshot) {
    match snapshot.text(Field::CurrentlyWorking) {
        Some("yes") => {
            snapshot.remove(Field::LastEmployed);
        }
        Some("no") => populate_last_employed(snapshot),
        _ => {}
    }
}

fn valid_age(raw: Option<&str>) -> bool {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .map(|age| age.is_finite() && (0.0..=MAX_AGE).contains(&age))
        .unwrap_or(false)
}

fn restore_snapshot<S: SessionStore>(store: &S, key: &str) -> FieldSnapshot {
    let payload = match store.load(key) {
        Ok(Some(payload)) => payload,
        Ok(None) => return FieldSnapshot::new(),
        Err(err) => {
            warn!(error = %err, "session store unreadable, starting fresh");
            return FieldSnapshot::new();
        }
    };

    match FieldSnapshot::from_persisted(&payload) {
        Ok(RestoredSnapshot { snapshot, skipped }) => {
            if !skipped.is_empty() {
                warn!(?skipped, "dropped persisted fields the questionnaire does not accept");
            }
            debug!(fields = snapshot.len(), "session restored");
            snapshot
        }
        Err(err) => {
            warn!(error = %err, "persisted snapshot is corrupt, starting fresh");
            FieldSnapshot::new()
        }
    }
}
