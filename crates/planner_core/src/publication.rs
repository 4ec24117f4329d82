//! Publication gate: blocking checks stop a publish, warnings never do.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{
    domain::Severity,
    error::PublishError,
    protocol::{Ack, PublicationRecord, ValidationItem, ValidationReport},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{error::PublishGateError, Clock, PlanPublisher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub can_publish: bool,
    pub blocking_count: usize,
    pub warning_count: usize,
}

pub fn evaluate(report: &ValidationReport) -> Evaluation {
    let (blocking_count, warning_count) =
        report
            .items
            .iter()
            .fold((0, 0), |(blocking, warning), item| match item.severity {
                Severity::Blocking => (blocking + 1, warning),
                Severity::Warning => (blocking, warning + 1),
                Severity::Ok => (blocking, warning),
            });
    Evaluation {
        can_publish: blocking_count == 0,
        blocking_count,
        warning_count,
    }
}

/// One-shot publish action for a plan. Failures may be retried; success closes the gate.
#[derive(Debug, Default)]
pub struct PublicationGate {
    in_flight: Option<PublicationRecord>,
    published: Option<PublicationRecord>,
}

impl PublicationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn published(&self) -> Option<&PublicationRecord> {
        self.published.as_ref()
    }

    pub fn begin_publish(
        &mut self,
        report: &ValidationReport,
        notes: &str,
        now: DateTime<Utc>,
    ) -> Result<PublicationRecord, PublishGateError> {
        if self.published.is_some() {
            return Err(PublishGateError::AlreadyPublished);
        }
        if self.in_flight.is_some() {
            return Err(PublishGateError::PublishPending);
        }
        let evaluation = evaluate(report);
        if !evaluation.can_publish {
            let items: Vec<ValidationItem> = report.blocking_items().cloned().collect();
            warn!(blocking = evaluation.blocking_count, "publication blocked");
            return Err(PublishGateError::PublicationBlocked { items });
        }

        let record = PublicationRecord {
            id: Uuid::new_v4(),
            notes: notes.trim().to_string(),
            published_at: now,
        };
        self.in_flight = Some(record.clone());
        info!(
            publication_id = %record.id,
            warnings = evaluation.warning_count,
            "publishing plan"
        );
        Ok(record)
    }

    pub fn finish_publish(
        &mut self,
        outcome: Result<Ack, PublishError>,
    ) -> Result<(PublicationRecord, Ack), PublishGateError> {
        let Some(record) = self.in_flight.take() else {
            return Err(PublishGateError::NotInFlight);
        };
        match outcome {
            Ok(ack) => {
                info!(publication_id = %record.id, reference = %ack.reference, "plan published");
                self.published = Some(record.clone());
                Ok((record, ack))
            }
            Err(err) => {
                warn!(publication_id = %record.id, error = %err, "plan publication failed");
                Err(PublishGateError::PublishFailed(err))
            }
        }
    }

    pub async fn publish(
        &mut self,
        report: &ValidationReport,
        notes: &str,
        publisher: &dyn PlanPublisher,
        clock: &dyn Clock,
    ) -> Result<(PublicationRecord, Ack), PublishGateError> {
        let record = self.begin_publish(report, notes, clock.now())?;
        let outcome = publisher.publish(&record).await;
        self.finish_publish(outcome)
    }
}

#[cfg(test)]
#[path = "tests/publication_tests.rs"]
mod tests;
