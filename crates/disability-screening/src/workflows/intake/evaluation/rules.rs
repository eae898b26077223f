use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::super::dates::MonthYear;
use super::super::domain::FieldSnapshot;
use super::super::fields::Field;
use super::config::EvaluationConfig;

/// Fragments that flag a condition likely to meet a listing on its own.
pub(crate) const SEVERE_CONDITIONS: &[&str] = &[
    "cancer",
    "als",
    "alzheimer",
    "parkinson",
    "multiple sclerosis",
    "heart failure",
    "kidney failure",
    "liver failure",
    "copd",
    "emphysema",
    "stroke",
    "paralysis",
    "amputation",
    "blindness",
    "deaf",
];

pub(crate) const SEVERE_MENTAL_CONDITIONS: &[&str] =
    &["schizophrenia", "bipolar", "psychosis", "severe depression"];

/// Scoring rules in the order they contribute factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    Age,
    SevereCondition,
    MentalHealth,
    Cognitive,
    LiftingCapacity,
    PosturalTolerance,
    AssistiveDevice,
    DailyLiving,
    Education,
    WorkRecency,
}

/// Discrete contribution to an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreComponent {
    pub rule: ScoringRule,
    pub points: u32,
    pub note: String,
}

pub(crate) struct ScoreSignals {
    pub severe_condition: bool,
}

#[derive(Default)]
struct Tally {
    components: Vec<ScoreComponent>,
    total: u32,
}

impl Tally {
    fn add(&mut self, rule: ScoringRule, points: u32, note: impl Into<String>) {
        self.total += points;
        self.components.push(ScoreComponent {
            rule,
            points,
            note: note.into(),
        });
    }
}

/// Integer prefix of a free-text number; leading whitespace and a sign are allowed.
pub(crate) fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|value| sign * value)
}

fn number(snapshot: &FieldSnapshot, field: Field) -> i64 {
    snapshot
        .text(field)
        .and_then(leading_integer)
        .unwrap_or(0)
}

fn answer(snapshot: &FieldSnapshot, field: Field) -> &str {
    snapshot.text(field).unwrap_or("")
}

pub(crate) fn score_snapshot(
    snapshot: &FieldSnapshot,
    config: &EvaluationConfig,
    as_of: NaiveDate,
) -> (Vec<ScoreComponent>, u32, ScoreSignals) {
    let mut tally = Tally::default();

    let age = number(snapshot, Field::CurrentAge);
    if age >= 55 {
        tally.add(
            ScoringRule::Age,
            3,
            format!("Age {age} - Closely approaching advanced age, favorable under Grid Rules"),
        );
    } else if age >= 50 {
        tally.add(
            ScoringRule::Age,
            2,
            format!("Age {age} - Approaching advanced age, considered in Grid Rules"),
        );
    } else if age < 18 {
        tally.add(
            ScoringRule::Age,
            0,
            format!("Age {age} - Childhood disability criteria apply"),
        );
    } else {
        tally.add(
            ScoringRule::Age,
            0,
            format!("Age {age} - Younger individual, higher functional capacity expected"),
        );
    }

    let conditions = format!(
        "{} {}",
        answer(snapshot, Field::PhysicalConditions),
        answer(snapshot, Field::PsychologicalConditions)
    )
    .to_lowercase();

    let mut severe_condition = false;
    for condition in SEVERE_CONDITIONS {
        if conditions.contains(condition) {
            severe_condition = true;
            tally.add(
                ScoringRule::SevereCondition,
                4,
                "Severe medical condition identified: May qualify under Compassionate Allowances or Blue Book listing",
            );
        }
    }

    for condition in SEVERE_MENTAL_CONDITIONS {
        if conditions.contains(condition) {
            tally.add(
                ScoringRule::MentalHealth,
                3,
                format!(
                    "Severe mental health condition: {condition} - May meet Blue Book 12.00 criteria"
                ),
            );
        }
    }

    let iq = number(snapshot, Field::IqScore);
    if iq > 0 && iq < 70 {
        tally.add(
            ScoringRule::Cognitive,
            4,
            format!("IQ Score {iq} - Intellectual disability, likely meets Blue Book 12.05 criteria"),
        );
    } else if (70..80).contains(&iq) {
        tally.add(
            ScoringRule::Cognitive,
            2,
            format!(
                "IQ Score {iq} - Borderline intellectual functioning, considered with other limitations"
            ),
        );
    }

    match answer(snapshot, Field::Lifting) {
        "none" | "sedentary" => tally.add(
            ScoringRule::LiftingCapacity,
            3,
            "Residual Functional Capacity: Sedentary work level - Significantly limited",
        ),
        "light" => tally.add(
            ScoringRule::LiftingCapacity,
            2,
            "Residual Functional Capacity: Light work level - Moderately limited",
        ),
        "medium" => tally.add(
            ScoringRule::LiftingCapacity,
            1,
            "Residual Functional Capacity: Medium work level - Some limitations",
        ),
        _ => {}
    }

    let postural_limit = [Field::Standing, Field::Sitting, Field::Walking]
        .into_iter()
        .any(|field| matches!(answer(snapshot, field), "none" | "less15"));
    if postural_limit {
        tally.add(
            ScoringRule::PosturalTolerance,
            2,
            "Severe postural limitations: Cannot stand, sit, or walk for extended periods",
        );
    }

    let uses = |device: &str| snapshot.has_choice(Field::Device, device);
    if uses("wheelchair") {
        tally.add(
            ScoringRule::AssistiveDevice,
            3,
            "Requires wheelchair for mobility - Meets Grid Rule criteria for inability to ambulate effectively",
        );
    } else if uses("walker") || uses("crutches") {
        tally.add(
            ScoringRule::AssistiveDevice,
            2,
            "Requires assistive device for ambulation - Significant mobility limitation",
        );
    } else if uses("cane") {
        tally.add(
            ScoringRule::AssistiveDevice,
            1,
            "Requires cane for mobility - Moderate limitation",
        );
    }

    let daily_limits = [
        matches!(answer(snapshot, Field::Hygiene), "unable" | "assistance"),
        answer(snapshot, Field::Shopping) == "unable",
        answer(snapshot, Field::Cooking) == "unable",
        answer(snapshot, Field::Cleaning) == "unable",
    ]
    .into_iter()
    .filter(|limited| *limited)
    .count();
    if daily_limits >= 3 {
        tally.add(
            ScoringRule::DailyLiving,
            3,
            format!(
                "Severe limitations in Activities of Daily Living ({daily_limits} activities affected) - Indicates marked functional limitation"
            ),
        );
    } else if daily_limits == 2 {
        tally.add(
            ScoringRule::DailyLiving,
            2,
            format!(
                "Moderate limitations in Activities of Daily Living ({daily_limits} activities affected)"
            ),
        );
    }

    match answer(snapshot, Field::LastGrade) {
        "0-8" | "9" | "10" => tally.add(
            ScoringRule::Education,
            1,
            "Limited education - Favorable factor under Grid Rules for older individuals",
        ),
        "bachelor" | "graduate" => tally.add(
            ScoringRule::Education,
            0,
            "Higher education - May indicate ability to perform sedentary skilled work",
        ),
        _ => {}
    }

    let last_worked = snapshot
        .text(Field::LastEmployed)
        .and_then(MonthYear::parse)
        .and_then(MonthYear::first_day);
    if let Some(last_worked) = last_worked {
        let gap_days = (as_of - last_worked).num_days();
        let window_days = i64::from(config.work_gap_months) * i64::from(config.days_per_month);
        if gap_days > window_days {
            tally.add(
                ScoringRule::WorkRecency,
                1,
                format!(
                    "No work activity for over {} years - Skills may be outdated",
                    config.work_gap_months / 12
                ),
            );
        }
    }

    let Tally { components, total } = tally;
    (components, total, ScoreSignals { severe_condition })
}
