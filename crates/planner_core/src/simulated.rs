//! Fixed-delay stand-in for the scheduling backend.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use shared::{
    error::{CollaboratorError, PublishError, SubmissionError},
    protocol::{Ack, PublicationRecord},
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{request::ChangeRequest, ChangeSubmitter, PlanPublisher};

#[derive(Default)]
struct Calls {
    submissions: Vec<ChangeRequest>,
    publications: Vec<PublicationRecord>,
    attempts: usize,
    fail_next: Option<CollaboratorError>,
}

/// Accepts every call after `delay`, unless a failure was queued with [`Self::fail_next`].
#[derive(Clone, Default)]
pub struct SimulatedBackend {
    delay: Duration,
    calls: Arc<Mutex<Calls>>,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: Arc::default(),
        }
    }

    pub async fn fail_next(&self, error: CollaboratorError) {
        self.calls.lock().await.fail_next = Some(error);
    }

    /// Every call that reached the backend, failed or not.
    pub async fn attempts(&self) -> usize {
        self.calls.lock().await.attempts
    }

    pub async fn submissions(&self) -> Vec<ChangeRequest> {
        self.calls.lock().await.submissions.clone()
    }

    pub async fn publications(&self) -> Vec<PublicationRecord> {
        self.calls.lock().await.publications.clone()
    }

    async fn settle(&self) -> Option<CollaboratorError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mut calls = self.calls.lock().await;
        calls.attempts += 1;
        calls.fail_next.take()
    }
}

#[async_trait]
impl ChangeSubmitter for SimulatedBackend {
    async fn submit(&self, request: &ChangeRequest) -> Result<Ack, SubmissionError> {
        if let Some(err) = self.settle().await {
            return Err(err);
        }
        let mut calls = self.calls.lock().await;
        calls.submissions.push(request.clone());
        let reference = format!("CR-{:04}", calls.submissions.len());
        debug!(request_id = %request.id(), %reference, "simulated backend accepted change request");
        Ok(Ack {
            reference,
            received_at: Utc::now(),
        })
    }
}

#[async_trait]
impl PlanPublisher for SimulatedBackend {
    async fn publish(&self, record: &PublicationRecord) -> Result<Ack, PublishError> {
        if let Some(err) = self.settle().await {
            return Err(err);
        }
        let mut calls = self.calls.lock().await;
        calls.publications.push(record.clone());
        let reference = format!("PUB-{:04}", calls.publications.len());
        debug!(publication_id = %record.id, %reference, "simulated backend accepted publication");
        Ok(Ack {
            reference,
            received_at: Utc::now(),
        })
    }
}
