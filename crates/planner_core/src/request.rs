use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::{ChangeKind, Field, SessionId, Urgency};
use uuid::Uuid;

/// Immutable record produced by a completed change wizard.
///
/// Only the wizard builds these, after its pre-submit gate has passed. There is
/// no mutable access; a correction means discarding the wizard and starting over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRequest {
    id: Uuid,
    subject_id: SessionId,
    kind: ChangeKind,
    fields: BTreeMap<Field, String>,
    reason: String,
    urgency: Urgency,
    created_at: DateTime<Utc>,
}

impl ChangeRequest {
    pub(crate) fn new(
        subject_id: SessionId,
        kind: ChangeKind,
        fields: BTreeMap<Field, String>,
        reason: String,
        urgency: Urgency,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject_id,
            kind,
            fields,
            reason,
            urgency,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subject_id(&self) -> SessionId {
        self.subject_id
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn fields(&self) -> &BTreeMap<Field, String> {
        &self.fields
    }

    pub fn field(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    /// Notification delivery should treat this request as time-sensitive.
    pub fn requires_immediate_notice(&self) -> bool {
        self.urgency == Urgency::Urgent
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
