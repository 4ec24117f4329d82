use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeZone;
use shared::error::{ApiError, CollaboratorError, ErrorCode};
use tokio::sync::Mutex;

use super::*;
use crate::FixedClock;

#[derive(Default)]
struct RecordingPublisher {
    received: Arc<Mutex<Vec<PublicationRecord>>>,
    fail_with: Option<CollaboratorError>,
}

#[async_trait]
impl PlanPublisher for RecordingPublisher {
    async fn publish(&self, record: &PublicationRecord) -> Result<Ack, PublishError> {
        self.received.lock().await.push(record.clone());
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(Ack {
            reference: "PUB-1".to_string(),
            received_at: record.published_at,
        })
    }
}

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 1, 20, 17, 30, 0).unwrap())
}

fn item(title: &str, severity: Severity) -> ValidationItem {
    ValidationItem::new(title, severity)
}

#[test]
fn warnings_never_block_publication() {
    let report = ValidationReport::new(vec![
        item("All sessions have rooms", Severity::Ok),
        item("Instructor over 18h", Severity::Warning),
        item("Back-to-back rooms far apart", Severity::Warning),
    ]);
    assert_eq!(
        evaluate(&report),
        Evaluation {
            can_publish: true,
            blocking_count: 0,
            warning_count: 2,
        }
    );
}

#[test]
fn empty_report_is_publishable() {
    let evaluation = evaluate(&ValidationReport::default());
    assert!(evaluation.can_publish);
    assert_eq!(evaluation.blocking_count, 0);
}

#[tokio::test]
async fn blocking_item_fails_with_exactly_that_item() {
    let blocking = item("Room double-booked", Severity::Blocking)
        .with_details(["B-104 on Mon 09:00: MAT-201, PHY-110"]);
    let report = ValidationReport::new(vec![
        item("Calendar complete", Severity::Ok),
        blocking.clone(),
        item("Instructor over 18h", Severity::Warning),
    ]);
    let publisher = RecordingPublisher::default();
    let mut gate = PublicationGate::new();

    let err = gate
        .publish(&report, "Spring plan", &publisher, &clock())
        .await
        .expect_err("should be blocked");
    assert_eq!(
        err,
        PublishGateError::PublicationBlocked {
            items: vec![blocking]
        }
    );
    assert_eq!(ApiError::from(&err).code, ErrorCode::Blocked);
    assert!(publisher.received.lock().await.is_empty());
    assert!(!gate.is_pending());
    assert!(gate.published().is_none());
}

#[tokio::test]
async fn successful_publish_is_one_shot() {
    let report = ValidationReport::new(vec![item("Calendar complete", Severity::Ok)]);
    let publisher = RecordingPublisher::default();
    let mut gate = PublicationGate::new();

    let (record, ack) = gate
        .publish(&report, "  Spring plan v1  ", &publisher, &clock())
        .await
        .expect("published");
    assert_eq!(record.notes, "Spring plan v1");
    assert_eq!(record.published_at, clock().0);
    assert_eq!(ack.reference, "PUB-1");
    assert_eq!(gate.published(), Some(&record));

    let err = gate
        .publish(&report, "again", &publisher, &clock())
        .await
        .expect_err("already published");
    assert_eq!(err, PublishGateError::AlreadyPublished);
    assert_eq!(publisher.received.lock().await.len(), 1);
}

#[tokio::test]
async fn failed_publish_can_be_retried() {
    let report = ValidationReport::new(vec![item("Calendar complete", Severity::Ok)]);
    let failing = RecordingPublisher {
        fail_with: Some(CollaboratorError::unavailable("timeout")),
        ..Default::default()
    };
    let mut gate = PublicationGate::new();

    let err = gate
        .publish(&report, "Spring plan", &failing, &clock())
        .await
        .expect_err("should fail");
    assert!(matches!(err, PublishGateError::PublishFailed(_)));
    assert!(!gate.is_pending());

    let ok = RecordingPublisher::default();
    gate.publish(&report, "Spring plan", &ok, &clock())
        .await
        .expect("retry");
    assert_eq!(ok.received.lock().await.len(), 1);
}

#[test]
fn second_publish_while_pending_is_refused() {
    let report = ValidationReport::default();
    let mut gate = PublicationGate::new();
    gate.begin_publish(&report, "v1", clock().0).expect("begin");
    assert_eq!(
        gate.begin_publish(&report, "v1", clock().0),
        Err(PublishGateError::PublishPending)
    );
    assert_eq!(
        gate.finish_publish(Err(CollaboratorError::unavailable("down"))),
        Err(PublishGateError::PublishFailed(CollaboratorError::unavailable("down")))
    );
    assert_eq!(
        gate.finish_publish(Err(CollaboratorError::unavailable("down"))),
        Err(PublishGateError::NotInFlight)
    );
}
