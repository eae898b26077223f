use std::sync::Arc;

use chrono::NaiveDate;
use disability_screening::config::SessionConfig;
use disability_screening::workflows::intake::{
    evaluate, AdvanceOutcome, Determination, Field, FieldKey, FieldSnapshot, FieldValue,
    FormSession, InMemorySessionStore, IndicatorStrength, JobField, ResetConfirmation,
    SessionEvent, TOTAL_STEPS,
};

fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 24).expect("valid evaluation date")
}

fn open_session(store: &Arc<InMemorySessionStore>) -> FormSession<InMemorySessionStore> {
    FormSession::open(store.clone(), &SessionConfig::default())
}

fn advance(session: &mut FormSession<InMemorySessionStore>) {
    match session.advance_on(evaluation_date()).expect("advance") {
        AdvanceOutcome::Moved(_) => {}
        other => panic!("expected to move forward, got {other:?}"),
    }
}

#[test]
fn full_questionnaire_produces_a_strong_allowance() {
    let store = Arc::new(InMemorySessionStore::new());
    let mut session = open_session(&store);

    session
        .record_choices(Field::Consent, ["acknowledged"])
        .expect("consent");
    advance(&mut session);

    session
        .record_text(Field::PhysicalConditions, "Degenerative disc disease")
        .expect("physical");
    session
        .record_text(Field::PsychologicalConditions, "Major depressive disorder")
        .expect("psychological");
    advance(&mut session);

    session.record_text(Field::Lifting, "sedentary").expect("lifting");
    session.record_text(Field::Standing, "less15").expect("standing");
    session.record_text(Field::Sitting, "30to60").expect("sitting");
    advance(&mut session);

    session
        .record_choices(Field::Device, ["cane", "walker"])
        .expect("devices");
    advance(&mut session);

    session.record_text(Field::Hygiene, "independent").expect("hygiene");
    session.record_text(Field::Cleaning, "unable").expect("cleaning");
    session.record_text(Field::Cooking, "unable").expect("cooking");
    advance(&mut session);

    session.record_text(Field::LastGrade, "10").expect("grade");
    advance(&mut session);

    session
        .record_text(FieldKey::job(1, JobField::Title), "Warehouse associate")
        .expect("title");
    session
        .record_text(FieldKey::job(1, JobField::From), "062008")
        .expect("from");
    session
        .record_text(FieldKey::job(1, JobField::To), "082016")
        .expect("to");
    let second = session.add_job_entry().expect("room for a second job");
    session
        .record_text(FieldKey::job(second, JobField::To), "02/2019")
        .expect("to");
    advance(&mut session);

    session
        .record_text(Field::CurrentlyWorking, "no")
        .expect("working");
    assert_eq!(session.snapshot().text(Field::LastEmployed), Some("02/2019"));
    advance(&mut session);

    assert_eq!(session.current_step(), TOTAL_STEPS);
    session.record_text(Field::CurrentAge, "56").expect("age");

    let result = match session.advance_on(evaluation_date()).expect("finish") {
        AdvanceOutcome::Completed(result) => result,
        other => panic!("expected completion, got {other:?}"),
    };

    // age 3, lifting 3, postural 2, walker 2, ADL 2, education 1, work gap 1
    assert_eq!(result.score, 14);
    assert_eq!(result.determination, Determination::Allowance);
    assert_eq!(result.strength, IndicatorStrength::Strong);
    assert_eq!(result.factors.len(), 7);
    assert_eq!(result, evaluate(session.snapshot(), evaluation_date()));
}

#[test]
fn session_resumes_from_the_store_and_resets_cleanly() {
    let store = Arc::new(InMemorySessionStore::new());
    {
        let mut session = open_session(&store);
        session.add_job_entry();
        session
            .record_text(FieldKey::job(2, JobField::To), "11/2021")
            .expect("job end");
        session
            .record_choices(Field::Device, ["wheelchair"])
            .expect("device");
    }

    let mut resumed = open_session(&store);
    assert_eq!(resumed.job_count(), 2);
    assert!(resumed.snapshot().has_choice(Field::Device, "wheelchair"));

    let update = resumed
        .handle_on(
            SessionEvent::Reset {
                confirmation: ResetConfirmation::Confirmed,
            },
            evaluation_date(),
        )
        .expect("reset");
    assert_eq!(update.progress.label, "Welcome");

    let after_reset = open_session(&store);
    assert!(after_reset.snapshot().is_empty());
    assert_eq!(after_reset.job_count(), 1);
}

#[test]
fn scorer_works_on_snapshots_built_by_hand() {
    let snapshot = FieldSnapshot::new()
        .with(Field::CurrentAge, FieldValue::text("35"))
        .with(
            Field::PhysicalConditions,
            FieldValue::text("Parkinson's disease"),
        );

    let result = evaluate(&snapshot, evaluation_date());

    assert_eq!(result.determination, Determination::Allowance);
    assert_eq!(result.score, 4);
    assert_eq!(Determination::Allowance.label(), "Likely Allowance");
}
