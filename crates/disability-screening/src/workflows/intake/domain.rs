use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::fields::{FieldKey, JobField};

/// Value captured for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text, number, date, select, and radio answers.
    Text(String),
    /// Checked members of a checkbox group.
    Choices(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn choices<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::Choices(values.into_iter().map(Into::into).collect())
    }

    /// Empty text and empty checkbox groups carry no answer.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Choices(values) => values.is_empty(),
        }
    }
}

/// Every answered field of one intake session.
///
/// Blank values are never stored, so "absent" and "empty" read the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSnapshot {
    values: BTreeMap<FieldKey, FieldValue>,
}

impl FieldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by hosts and fixtures to assemble a snapshot directly.
    pub fn with(mut self, key: impl Into<FieldKey>, value: FieldValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<FieldKey>, value: FieldValue) {
        let key = key.into();
        if value.is_blank() {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    pub fn remove(&mut self, key: impl Into<FieldKey>) -> Option<FieldValue> {
        self.values.remove(&key.into())
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn get(&self, key: impl Into<FieldKey>) -> Option<&FieldValue> {
        self.values.get(&key.into())
    }

    /// Scalar answer, if one was given.
    pub fn text(&self, key: impl Into<FieldKey>) -> Option<&str> {
        match self.get(key) {
            Some(FieldValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Checked members of a checkbox group; empty when unanswered.
    pub fn choices(&self, key: impl Into<FieldKey>) -> &[String] {
        match self.get(key) {
            Some(FieldValue::Choices(values)) => values.as_slice(),
            _ => &[],
        }
    }

    pub fn has_choice(&self, key: impl Into<FieldKey>, option: &str) -> bool {
        self.choices(key).iter().any(|value| value == option)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &FieldValue)> {
        self.values.iter()
    }

    /// Job suffixes with at least one answered part.
    pub fn job_indices(&self) -> BTreeSet<u32> {
        self.values
            .keys()
            .filter_map(|key| match key {
                FieldKey::Job { index, .. } => Some(*index),
                FieldKey::Question(_) => None,
            })
            .collect()
    }

    /// `jobTo{n}` answers in suffix order.
    pub fn job_end_dates(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter_map(|(key, value)| match (key, value) {
            (
                FieldKey::Job {
                    part: JobField::To,
                    ..
                },
                FieldValue::Text(text),
            ) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a persisted snapshot against the field registry.
    ///
    /// Keys the registry does not know, and values no control would accept, are
    /// skipped and counted rather than failing the whole restore.
    pub fn from_persisted(payload: &str) -> Result<RestoredSnapshot, serde_json::Error> {
        let raw: BTreeMap<String, FieldValue> = serde_json::from_str(payload)?;
        let mut snapshot = Self::new();
        let mut skipped = Vec::new();

        for (raw_key, value) in raw {
            if value.is_blank() {
                continue;
            }
            let Ok(key) = raw_key.parse::<FieldKey>() else {
                skipped.push(raw_key);
                continue;
            };
            match key.kind().restore(value) {
                Some(value) => snapshot.insert(key, value),
                None => skipped.push(raw_key),
            }
        }

        Ok(RestoredSnapshot { snapshot, skipped })
    }
}

/// Result of decoding a persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredSnapshot {
    pub snapshot: FieldSnapshot,
    pub skipped: Vec<String>,
}
