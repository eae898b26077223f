use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::SessionConfig;
use crate::workflows::intake::domain::{FieldSnapshot, FieldValue};
use crate::workflows::intake::fields::{Field, CONSENT_ACKNOWLEDGED, TOTAL_STEPS};
use crate::workflows::intake::repository::{InMemorySessionStore, SessionStore, StorageError};
use crate::workflows::intake::session::{AdvanceOutcome, FormSession};

pub(super) const STORAGE_KEY: &str = "disabilityEvaluation";

pub(super) fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
}

pub(super) fn session_config() -> SessionConfig {
    SessionConfig {
        storage_key: STORAGE_KEY.to_string(),
    }
}

pub(super) fn answers(pairs: &[(Field, &str)]) -> FieldSnapshot {
    pairs.iter().fold(FieldSnapshot::new(), |snapshot, (field, value)| {
        snapshot.with(*field, FieldValue::text(*value))
    })
}

pub(super) fn with_devices(snapshot: FieldSnapshot, devices: &[&str]) -> FieldSnapshot {
    snapshot.with(Field::Device, FieldValue::choices(devices.iter().copied()))
}

pub(super) fn fresh_session() -> (Arc<InMemorySessionStore>, FormSession<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let session = FormSession::open(store.clone(), &session_config());
    (store, session)
}

pub(super) fn session_from_payload(
    payload: &str,
) -> (Arc<InMemorySessionStore>, FormSession<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    store.save(STORAGE_KEY, payload).expect("seed store");
    let session = FormSession::open(store.clone(), &session_config());
    (store, session)
}

/// Consent given and advanced until `step` is showing.
pub(super) fn session_at_step(
    step: usize,
) -> (Arc<InMemorySessionStore>, FormSession<InMemorySessionStore>) {
    assert!(step <= TOTAL_STEPS);
    let (store, mut session) = fresh_session();
    session
        .record_choices(Field::Consent, [CONSENT_ACKNOWLEDGED])
        .expect("consent recorded");
    while session.current_step() < step {
        match session.advance_on(as_of()).expect("advance") {
            AdvanceOutcome::Moved(_) => {}
            other => panic!("expected to move, got {other:?}"),
        }
    }
    (store, session)
}

pub(super) fn persisted(store: &InMemorySessionStore) -> serde_json::Value {
    let payload = store.peek(STORAGE_KEY).expect("snapshot persisted");
    serde_json::from_str(&payload).expect("snapshot is json")
}

/// Store whose reads and writes always fail.
#[derive(Default)]
pub(super) struct FailingStore;

impl SessionStore for FailingStore {
    fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("disk detached".to_string()))
    }

    fn save(&self, _key: &str, _payload: &str) -> Result<(), StorageError> {
        Err(StorageError::QuotaExceeded)
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk detached".to_string()))
    }
}

/// In-memory store whose writes can be switched off mid-session.
#[derive(Default)]
pub(super) struct FlakyStore {
    inner: InMemorySessionStore,
    reject_writes: AtomicBool,
}

impl FlakyStore {
    pub(super) fn reject_writes(&self) {
        self.reject_writes.store(true, Ordering::SeqCst);
    }

    pub(super) fn peek(&self, key: &str) -> Option<String> {
        self.inner.peek(key)
    }
}

impl SessionStore for FlakyStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::QuotaExceeded);
        }
        self.inner.save(key, payload)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}
