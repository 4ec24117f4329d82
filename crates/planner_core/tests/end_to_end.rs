use std::{sync::Arc, time::Duration};

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use planner_core::{
    ChangeSubmitter, ChangeWizard, EligibilityWindow, FixedClock, InMemoryRepository,
    PlanHistory, PublicationGate, PublishGateError, ScheduleRepository, SimulatedBackend,
    SystemClock, VersionOrigin, WizardConfig, WizardError, WizardStep,
};
use shared::{
    domain::{ChangeKind, Field, Modality, SessionId, Severity, Urgency},
    error::CollaboratorError,
    protocol::{Session, ValidationItem},
};
use tokio::sync::Mutex;

fn session(id: i64) -> Session {
    Session {
        id: SessionId(id),
        course_code: "MAT-201".to_string(),
        title: "Linear Algebra".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
        start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
        room: "B-104".to_string(),
        modality: Modality::InPerson,
        instructor: None,
    }
}

#[tokio::test]
async fn suggestion_flow_submits_through_backend() {
    let now = Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap();
    let window = EligibilityWindow::new(
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 2, 15, 0, 0, 0).unwrap(),
    );
    let repo = InMemoryRepository::with_data(vec![session(12)], Vec::new());
    let backend = SimulatedBackend::new(Duration::ZERO);

    let mut wizard = ChangeWizard::open(SessionId(12), WizardConfig::suggestion(window));
    wizard.select_kind(ChangeKind::Reschedule).expect("select");
    wizard.update_field_named("date", "2026-03-06").expect("date");
    wizard.update_field_named("reason", "Midterm overlap").expect("reason");
    wizard.set_urgency(Urgency::Urgent).expect("urgency");
    wizard.review(now).expect("review");

    let preview = wizard.preview(&repo).await.expect("preview");
    assert_eq!(preview.rows.len(), 1);
    assert_eq!(preview.rows[0].before.as_deref(), Some("2026-03-04"));

    let ack = wizard
        .confirm(&backend, &FixedClock(now))
        .await
        .expect("confirm");
    assert_eq!(ack.reference, "CR-0001");
    assert_eq!(wizard.step(), WizardStep::Submitted);

    let submissions = backend.submissions().await;
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].field(Field::Date), Some("2026-03-06"));
    assert!(submissions[0].requires_immediate_notice());
}

#[tokio::test]
async fn backend_failure_is_surfaced_and_retry_succeeds() {
    let backend = SimulatedBackend::new(Duration::ZERO);
    backend
        .fail_next(CollaboratorError::unavailable("gateway timeout"))
        .await;

    let mut wizard = ChangeWizard::open(SessionId(3), WizardConfig::session_change());
    wizard.select_kind(ChangeKind::Cancellation).expect("select");
    wizard.update_field(Field::Reason, "Strike").expect("reason");

    let err = wizard
        .confirm(&backend, &SystemClock)
        .await
        .expect_err("first attempt fails");
    assert!(matches!(err, WizardError::SubmissionFailed(_)));
    assert_eq!(wizard.step(), WizardStep::Detailing);

    wizard.confirm(&backend, &SystemClock).await.expect("retry");
    assert_eq!(backend.attempts().await, 2);
    assert_eq!(backend.submissions().await.len(), 1);
}

/// Host-side pattern: the UI thread holds the wizard behind a lock only while
/// transitioning, so a second click can arrive while the backend call is slow.
#[tokio::test(start_paused = true)]
async fn second_click_during_slow_submission_is_refused() {
    let backend = Arc::new(SimulatedBackend::new(Duration::from_secs(2)));
    let wizard = Arc::new(Mutex::new(ChangeWizard::open(
        SessionId(5),
        WizardConfig::session_change(),
    )));
    {
        let mut w = wizard.lock().await;
        w.select_kind(ChangeKind::RoomChange).expect("select");
        w.update_field(Field::Room, "Aula Magna").expect("room");
        w.update_field(Field::Reason, "Guest lecture").expect("reason");
    }

    let first = {
        let wizard = wizard.clone();
        let backend = backend.clone();
        tokio::spawn(async move {
            let request = wizard.lock().await.begin_submit(Utc::now())?;
            let outcome = backend.submit(&request).await;
            wizard.lock().await.finish_submit(outcome)
        })
    };
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    {
        let mut w = wizard.lock().await;
        assert!(w.is_pending());
        assert_eq!(w.begin_submit(Utc::now()), Err(WizardError::SubmissionPending));
        assert_eq!(w.cancel(), Err(WizardError::SubmissionPending));
    }

    first.await.expect("join").expect("submitted");
    assert_eq!(backend.submissions().await.len(), 1);
    let w = wizard.lock().await;
    assert_eq!(w.step(), WizardStep::Submitted);
    assert!(!w.is_pending());
}

#[tokio::test]
async fn publication_records_history_and_supports_revert() {
    let repo = InMemoryRepository::new();
    repo.set_checks(vec![
        ValidationItem::new("Every session has a room", Severity::Ok),
        ValidationItem::new("Room double-booked", Severity::Blocking)
            .with_details(["B-104 Mon 09:00"]),
    ])
    .await;
    let backend = SimulatedBackend::new(Duration::ZERO);
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 1, 20, 8, 0, 0).unwrap());
    let mut history = PlanHistory::new();

    let mut gate = PublicationGate::new();
    let report = repo.validation_report().await;
    let err = gate
        .publish(&report, "Spring v1", &backend, &clock)
        .await
        .expect_err("blocked");
    match err {
        PublishGateError::PublicationBlocked { items } => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].title, "Room double-booked");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(backend.attempts().await, 0);

    repo.set_checks(vec![
        ValidationItem::new("Every session has a room", Severity::Ok),
        ValidationItem::new("Instructor over 18h", Severity::Warning),
    ])
    .await;
    let report = repo.validation_report().await;
    let (record, _) = gate
        .publish(&report, "Spring v1", &backend, &clock)
        .await
        .expect("published");
    history.record_publication(&record, "registrar");

    let mut second = PublicationGate::new();
    let (record, _) = second
        .publish(&report, "Spring v2", &backend, &clock)
        .await
        .expect("published");
    history.record_publication(&record, "registrar");

    let reverted = history
        .revert_to(1, "dean", clock.0)
        .expect("revert")
        .clone();
    assert_eq!(reverted.number, 3);
    assert_eq!(reverted.notes, "Spring v1");
    assert_eq!(reverted.origin, VersionOrigin::Reverted { from: 1 });
    assert_eq!(backend.publications().await.len(), 2);
}
