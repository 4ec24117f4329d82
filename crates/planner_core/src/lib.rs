//! Change-request wizards, plan publication gate, version history, and the
//! first-login password policy for the academic scheduling console.
//!
//! Every controller here is a plain owned state machine. The only suspension
//! points are the outbound collaborator calls, and each controller refuses a
//! second confirm/publish (and a close) while one of those calls is pending.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    error::{PublishError, SubmissionError},
    protocol::{Ack, PublicationRecord},
};

pub mod eligibility;
pub mod error;
pub mod history;
pub mod password;
pub mod publication;
pub mod repository;
mod request;
pub mod simulated;
pub mod wizard;

pub use eligibility::{ClosedReason, EligibilityWindow, WindowStatus};
pub use error::{HistoryError, PasswordError, PublishGateError, WizardError};
pub use history::{PlanHistory, PlanVersion, VersionOrigin};
pub use password::{PasswordPolicy, PolicyRule, Strength};
pub use publication::{evaluate, Evaluation, PublicationGate};
pub use repository::{InMemoryRepository, ScheduleRepository};
pub use request::ChangeRequest;
pub use simulated::SimulatedBackend;
pub use wizard::{
    ChangeWizard, Draft, GatePoint, GatingMode, PreviewRow, ReviewPreview, WizardConfig,
    WizardStep,
};

/// Receives finished change requests. Only success or failure is interpreted.
#[async_trait]
pub trait ChangeSubmitter: Send + Sync {
    async fn submit(&self, request: &ChangeRequest) -> Result<Ack, SubmissionError>;
}

#[async_trait]
pub trait PlanPublisher: Send + Sync {
    async fn publish(&self, record: &PublicationRecord) -> Result<Ack, PublishError>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
