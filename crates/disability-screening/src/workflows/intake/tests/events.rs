use super::common::*;
use crate::workflows::intake::domain::FieldValue;
use crate::workflows::intake::events::SessionEvent;
use crate::workflows::intake::fields::{Field, FieldKey, JobField, TOTAL_STEPS};
use crate::workflows::intake::session::ResetConfirmation;
use crate::workflows::intake::views::{StepChange, ValidationIssue, RESULTS_POSITION};

#[test]
fn events_deserialize_from_host_payloads() {
    let field: SessionEvent = serde_json::from_str(
        r#"{"type": "field_changed", "key": "jobTo2", "value": "032020"}"#,
    )
    .expect("field event parses");
    assert_eq!(
        field,
        SessionEvent::FieldChanged {
            key: FieldKey::job(2, JobField::To),
            value: FieldValue::text("032020"),
        }
    );

    let devices: SessionEvent = serde_json::from_str(
        r#"{"type": "field_changed", "key": "device", "value": ["cane"]}"#,
    )
    .expect("checkbox event parses");
    assert!(matches!(
        devices,
        SessionEvent::FieldChanged {
            value: FieldValue::Choices(_),
            ..
        }
    ));

    let reset: SessionEvent =
        serde_json::from_str(r#"{"type": "reset", "confirmation": "confirmed"}"#)
            .expect("reset parses");
    assert_eq!(
        reset,
        SessionEvent::Reset {
            confirmation: ResetConfirmation::Confirmed
        }
    );

    assert!(serde_json::from_str::<SessionEvent>(
        r#"{"type": "field_changed", "key": "favoriteColor", "value": "blue"}"#
    )
    .is_err());
}

#[test]
fn blocked_advance_reports_errors_without_moving() {
    let (_store, mut session) = fresh_session();

    let update = session
        .handle_on(SessionEvent::Advance, as_of())
        .expect("handled");

    assert_eq!(update.errors.len(), 1);
    assert_eq!(update.errors[0].issue, ValidationIssue::ConsentRequired);
    assert!(update.step_change.is_none());
    assert_eq!(update.progress.label, "Welcome");
}

#[test]
fn event_stream_walks_to_a_result_and_back() {
    let (_store, mut session) = fresh_session();

    session
        .handle_on(
            SessionEvent::FieldChanged {
                key: Field::Consent.into(),
                value: FieldValue::choices(["acknowledged"]),
            },
            as_of(),
        )
        .expect("consent");

    for _ in 0..TOTAL_STEPS {
        let update = session
            .handle_on(SessionEvent::Advance, as_of())
            .expect("advance");
        assert!(update.step_change.is_some());
    }

    let update = session
        .handle_on(SessionEvent::AddJobEntry, as_of())
        .expect("job added");
    assert_eq!(update.job_entry, Some(2));

    session
        .handle_on(
            SessionEvent::FieldChanged {
                key: Field::CurrentAge.into(),
                value: FieldValue::text("57"),
            },
            as_of(),
        )
        .expect("age");

    let finished = session
        .handle_on(SessionEvent::Advance, as_of())
        .expect("finish");
    assert_eq!(
        finished.step_change,
        Some(StepChange {
            from: TOTAL_STEPS,
            to: RESULTS_POSITION
        })
    );
    assert_eq!(finished.progress.label, "Evaluation Complete");
    let result = finished.result.expect("result returned");
    assert_eq!(result.score, 3);

    let repeat = session
        .handle_on(SessionEvent::Advance, as_of())
        .expect("repeat");
    assert!(repeat.step_change.is_none());
    assert_eq!(repeat.result, Some(result));

    let edited = session
        .handle_on(
            SessionEvent::FieldChanged {
                key: Field::CurrentAge.into(),
                value: FieldValue::text("58"),
            },
            as_of(),
        )
        .expect("edit");
    assert_eq!(
        edited.step_change,
        Some(StepChange {
            from: RESULTS_POSITION,
            to: TOTAL_STEPS
        })
    );

    let reset = session
        .handle_on(
            SessionEvent::Reset {
                confirmation: ResetConfirmation::Confirmed,
            },
            as_of(),
        )
        .expect("reset");
    assert_eq!(
        reset.step_change,
        Some(StepChange {
            from: TOTAL_STEPS,
            to: 0
        })
    );
    assert_eq!(reset.progress.percentage, 0.0);
}

#[test]
fn update_serializes_for_the_host() {
    let (_store, mut session) = session_at_step(2);

    let update = session
        .handle_on(SessionEvent::Retreat, as_of())
        .expect("retreat");

    let json = serde_json::to_value(&update).expect("serializes");
    assert_eq!(json["progress"]["label"], "Step 1 of 8");
    assert_eq!(json["step_change"]["to"], 1);
    assert!(json.get("result").is_none());
}
