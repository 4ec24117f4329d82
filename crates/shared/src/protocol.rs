use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Field, Modality, SessionId, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub id: Uuid,
    pub notes: String,
    pub published_at: DateTime<Utc>,
}

/// Acknowledgement returned by a collaborator on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub reference: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationItem {
    pub title: String,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ValidationItem {
    pub fn new(title: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            severity,
            details: Vec::new(),
        }
    }

    pub fn with_details<I, S>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details = details.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub items: Vec<ValidationItem>,
}

impl ValidationReport {
    pub fn new(items: Vec<ValidationItem>) -> Self {
        Self { items }
    }

    pub fn has_blocking(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.severity == Severity::Blocking)
    }

    pub fn blocking_items(&self) -> impl Iterator<Item = &ValidationItem> {
        self.items
            .iter()
            .filter(|item| item.severity == Severity::Blocking)
    }
}

/// A scheduled class session as the read-only repository reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub course_code: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: String,
    pub modality: Modality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
}

impl Session {
    /// Current value of a draft field, used as the "before" column of a review.
    pub fn field_value(&self, field: Field) -> Option<String> {
        match field {
            Field::Date => Some(self.date.format("%Y-%m-%d").to_string()),
            Field::StartTime => Some(self.start_time.format("%H:%M").to_string()),
            Field::EndTime => Some(self.end_time.format("%H:%M").to_string()),
            Field::Room => Some(self.room.clone()),
            Field::Modality => Some(self.modality.as_str().to_string()),
            Field::Title => Some(self.title.clone()),
            Field::Description | Field::Reason => None,
        }
    }
}
