//! Declared question registry.
//!
//! Every question the intake collects is listed here with its persisted key, the
//! step it belongs to, and the shape of value it accepts. The session validates
//! writes against this registry instead of trusting whatever key a host sends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::dates::mask_month_year;
use super::domain::FieldValue;

/// Final data-entry step; step 0 is the consent page.
pub const TOTAL_STEPS: usize = 8;

pub const CONSENT_ACKNOWLEDGED: &str = "acknowledged";

const CONSENT_OPTIONS: &[&str] = &[CONSENT_ACKNOWLEDGED];
const LIFTING_OPTIONS: &[&str] = &["none", "sedentary", "light", "medium", "heavy"];
const DURATION_OPTIONS: &[&str] = &[
    "none",
    "less15",
    "15to30",
    "30to60",
    "1to2hours",
    "more2hours",
];
const DEVICE_OPTIONS: &[&str] = &["cane", "walker", "crutches", "wheelchair", "other"];
const HYGIENE_OPTIONS: &[&str] = &["independent", "assistance", "unable"];
const CHORE_OPTIONS: &[&str] = &["independent", "difficulty", "unable"];
const GRADE_OPTIONS: &[&str] = &[
    "0-8",
    "9",
    "10",
    "11",
    "12",
    "ged",
    "some-college",
    "associate",
    "bachelor",
    "graduate",
];
const YES_NO_OPTIONS: &[&str] = &["yes", "no"];

/// Fixed (non-repeated) questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Consent,
    PhysicalConditions,
    PsychologicalConditions,
    Lifting,
    Standing,
    Sitting,
    Walking,
    Device,
    Hygiene,
    Shopping,
    Cooking,
    Cleaning,
    IqScore,
    LastGrade,
    CurrentlyWorking,
    LastEmployed,
    CurrentAge,
}

impl Field {
    pub const fn ordered() -> [Self; 17] {
        [
            Self::Consent,
            Self::PhysicalConditions,
            Self::PsychologicalConditions,
            Self::Lifting,
            Self::Standing,
            Self::Sitting,
            Self::Walking,
            Self::Device,
            Self::Hygiene,
            Self::Shopping,
            Self::Cooking,
            Self::Cleaning,
            Self::IqScore,
            Self::LastGrade,
            Self::CurrentlyWorking,
            Self::LastEmployed,
            Self::CurrentAge,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Consent => "consentCheckbox",
            Self::PhysicalConditions => "physicalConditions",
            Self::PsychologicalConditions => "psychologicalConditions",
            Self::Lifting => "lifting",
            Self::Standing => "standing",
            Self::Sitting => "sitting",
            Self::Walking => "walking",
            Self::Device => "device",
            Self::Hygiene => "hygiene",
            Self::Shopping => "shopping",
            Self::Cooking => "cooking",
            Self::Cleaning => "cleaning",
            Self::IqScore => "iqScore",
            Self::LastGrade => "lastGrade",
            Self::CurrentlyWorking => "currentlyWorking",
            Self::LastEmployed => "lastEmployed",
            Self::CurrentAge => "currentAge",
        }
    }

    pub const fn descriptor(self) -> FieldDescriptor {
        let (step, kind) = match self {
            Self::Consent => (0, FieldKind::Checkboxes(CONSENT_OPTIONS)),
            Self::PhysicalConditions | Self::PsychologicalConditions => (1, FieldKind::Text),
            Self::Lifting => (2, FieldKind::Select(LIFTING_OPTIONS)),
            Self::Standing | Self::Sitting | Self::Walking => {
                (2, FieldKind::Select(DURATION_OPTIONS))
            }
            Self::Device => (3, FieldKind::Checkboxes(DEVICE_OPTIONS)),
            Self::Hygiene => (4, FieldKind::Radio(HYGIENE_OPTIONS)),
            Self::Shopping | Self::Cooking | Self::Cleaning => (4, FieldKind::Radio(CHORE_OPTIONS)),
            Self::IqScore => (5, FieldKind::Number),
            Self::LastGrade => (5, FieldKind::Select(GRADE_OPTIONS)),
            Self::CurrentlyWorking => (7, FieldKind::Radio(YES_NO_OPTIONS)),
            Self::LastEmployed => (7, FieldKind::MonthYear),
            Self::CurrentAge => (TOTAL_STEPS, FieldKind::Number),
        };

        FieldDescriptor {
            key: FieldKey::Question(self),
            step,
            kind,
        }
    }

    fn from_key(raw: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|field| field.key() == raw)
    }
}

/// Parts of one repeated job-history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobField {
    Title,
    From,
    To,
}

impl JobField {
    pub const fn ordered() -> [Self; 3] {
        [Self::Title, Self::From, Self::To]
    }

    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Title => "jobTitle",
            Self::From => "jobFrom",
            Self::To => "jobTo",
        }
    }
}

/// Step holding the repeated job-history group.
pub const JOB_HISTORY_STEP: usize = 6;

/// Upper bound on job-history entries; larger suffixes are not valid keys.
pub const MAX_JOB_ENTRIES: u32 = 20;

/// Typed identifier for a persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Question(Field),
    /// `index` starts at 1, matching the `jobTitle1` suffix convention.
    Job { index: u32, part: JobField },
}

impl FieldKey {
    pub const fn job(index: u32, part: JobField) -> Self {
        Self::Job { index, part }
    }

    pub fn descriptor(self) -> FieldDescriptor {
        match self {
            Self::Question(field) => field.descriptor(),
            Self::Job { part, .. } => FieldDescriptor {
                key: self,
                step: JOB_HISTORY_STEP,
                kind: match part {
                    JobField::Title => FieldKind::Text,
                    JobField::From | JobField::To => FieldKind::MonthYear,
                },
            },
        }
    }

    pub fn kind(self) -> FieldKind {
        self.descriptor().kind
    }
}

impl From<Field> for FieldKey {
    fn from(value: Field) -> Self {
        Self::Question(value)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Question(field) => f.write_str(field.key()),
            FieldKey::Job { index, part } => write!(f, "{}{}", part.prefix(), index),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field key '{0}'")]
pub struct FieldKeyError(pub String);

impl FromStr for FieldKey {
    type Err = FieldKeyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if let Some(field) = Field::from_key(raw) {
            return Ok(Self::Question(field));
        }

        for part in JobField::ordered() {
            let Some(suffix) = raw.strip_prefix(part.prefix()) else {
                continue;
            };
            if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            match suffix.parse::<u32>() {
                Ok(index) if (1..=MAX_JOB_ENTRIES).contains(&index) => {
                    return Ok(Self::Job { index, part })
                }
                _ => continue,
            }
        }

        Err(FieldKeyError(raw.to_string()))
    }
}

impl Serialize for FieldKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Declared placement and shape of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub step: usize,
    pub kind: FieldKind,
}

/// Value shape accepted by a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// Free digits masked into `mm/yyyy`.
    MonthYear,
    Select(&'static [&'static str]),
    Radio(&'static [&'static str]),
    Checkboxes(&'static [&'static str]),
}

/// Why a value does not fit its declared kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldValueError {
    #[error("expected a single value")]
    ExpectedScalar,
    #[error("expected a set of checkbox values")]
    ExpectedChoices,
    #[error("'{0}' is not one of the declared options")]
    InvalidOption(String),
}

impl FieldKind {
    pub const fn options(self) -> &'static [&'static str] {
        match self {
            Self::Select(options) | Self::Radio(options) | Self::Checkboxes(options) => options,
            Self::Text | Self::Number | Self::MonthYear => &[],
        }
    }

    /// Check a live edit against the declared shape and apply input masking.
    pub fn normalize(self, value: FieldValue) -> Result<FieldValue, FieldValueError> {
        match (self, value) {
            (Self::Text | Self::Number, FieldValue::Text(text)) => Ok(FieldValue::Text(text)),
            (Self::MonthYear, FieldValue::Text(text)) => {
                Ok(FieldValue::Text(mask_month_year(&text)))
            }
            (Self::Select(options) | Self::Radio(options), FieldValue::Text(text)) => {
                if text.is_empty() || options.contains(&text.as_str()) {
                    Ok(FieldValue::Text(text))
                } else {
                    Err(FieldValueError::InvalidOption(text))
                }
            }
            (Self::Checkboxes(options), FieldValue::Choices(values)) => {
                if let Some(unknown) = values
                    .iter()
                    .find(|value| !options.contains(&value.as_str()))
                {
                    return Err(FieldValueError::InvalidOption(unknown.clone()));
                }
                Ok(FieldValue::Choices(in_declared_order(options, &values)))
            }
            (Self::Checkboxes(_), FieldValue::Text(_)) => Err(FieldValueError::ExpectedChoices),
            (_, FieldValue::Choices(_)) => Err(FieldValueError::ExpectedScalar),
        }
    }

    /// Rehydrate a persisted value, dropping anything no control would match.
    pub fn restore(self, value: FieldValue) -> Option<FieldValue> {
        match (self, value) {
            (Self::Text | Self::Number | Self::MonthYear, FieldValue::Text(text)) => {
                Some(FieldValue::Text(text))
            }
            (Self::Select(options) | Self::Radio(options), FieldValue::Text(text)) => options
                .contains(&text.as_str())
                .then_some(FieldValue::Text(text)),
            (Self::Checkboxes(options), FieldValue::Choices(values)) => {
                Some(FieldValue::Choices(in_declared_order(options, &values)))
            }
            _ => None,
        }
    }
}

fn in_declared_order(options: &[&str], values: &[String]) -> Vec<String> {
    options
        .iter()
        .filter(|option| values.iter().any(|value| value == *option))
        .map(|option| option.to_string())
        .collect()
}

/// Questions rendered on `step`, in declaration order, with `job_count` job entries.
pub fn fields_for_step(step: usize, job_count: u32) -> Vec<FieldDescriptor> {
    let mut fields: Vec<FieldDescriptor> = Field::ordered()
        .into_iter()
        .map(Field::descriptor)
        .filter(|descriptor| descriptor.step == step)
        .collect();

    if step == JOB_HISTORY_STEP {
        for index in 1..=job_count.min(MAX_JOB_ENTRIES) {
            fields.extend(
                JobField::ordered()
                    .into_iter()
                    .map(|part| FieldKey::job(index, part).descriptor()),
            );
        }
    }

    fields
}
