use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(SessionId);
id_newtype!(PlanId);

/// Closed set of change categories a wizard can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Reschedule,
    RoomChange,
    ModalityChange,
    Cancellation,
    Addition,
    Other,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 6] = [
        ChangeKind::Reschedule,
        ChangeKind::RoomChange,
        ChangeKind::ModalityChange,
        ChangeKind::Cancellation,
        ChangeKind::Addition,
        ChangeKind::Other,
    ];

    /// Fields the draft keeps for this kind. `Field::Reason` is implied for every kind.
    pub fn relevant_fields(self) -> &'static [Field] {
        match self {
            ChangeKind::Reschedule => &[Field::Date, Field::StartTime, Field::EndTime],
            ChangeKind::RoomChange => &[Field::Room],
            ChangeKind::ModalityChange => &[Field::Modality, Field::Room],
            ChangeKind::Cancellation => &[],
            ChangeKind::Addition => &[
                Field::Title,
                Field::Date,
                Field::StartTime,
                Field::EndTime,
                Field::Room,
                Field::Modality,
            ],
            ChangeKind::Other => &[Field::Description],
        }
    }

    /// Required groups: each group is satisfied when at least one of its fields is non-empty.
    pub fn required_groups(self) -> &'static [&'static [Field]] {
        match self {
            ChangeKind::Reschedule => &[&[Field::Date, Field::StartTime]],
            ChangeKind::RoomChange => &[&[Field::Room]],
            ChangeKind::ModalityChange => &[&[Field::Modality]],
            ChangeKind::Cancellation => &[],
            ChangeKind::Addition => &[&[Field::Title], &[Field::Date], &[Field::StartTime]],
            ChangeKind::Other => &[&[Field::Description]],
        }
    }

    pub fn is_relevant(self, field: Field) -> bool {
        field == Field::Reason || self.relevant_fields().contains(&field)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Reschedule => "reschedule",
            ChangeKind::RoomChange => "room_change",
            ChangeKind::ModalityChange => "modality_change",
            ChangeKind::Cancellation => "cancellation",
            ChangeKind::Addition => "addition",
            ChangeKind::Other => "other",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        ChangeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseNameError::new("change kind", s))
    }
}

/// Draft field names. `Reason` is stored on the record itself, never in `fields`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    StartTime,
    EndTime,
    Room,
    Modality,
    Title,
    Description,
    Reason,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Date,
        Field::StartTime,
        Field::EndTime,
        Field::Room,
        Field::Modality,
        Field::Title,
        Field::Description,
        Field::Reason,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::StartTime => "start_time",
            Field::EndTime => "end_time",
            Field::Room => "room",
            Field::Modality => "modality",
            Field::Title => "title",
            Field::Description => "description",
            Field::Reason => "reason",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Field::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| ParseNameError::new("field", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    #[default]
    Normal,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    InPerson,
    Online,
    Hybrid,
}

impl Modality {
    pub fn as_str(self) -> &'static str {
        match self {
            Modality::InPerson => "in_person",
            Modality::Online => "online",
            Modality::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Ok,
    Warning,
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what}: {value:?}")]
pub struct ParseNameError {
    pub what: &'static str,
    pub value: String,
}

impl ParseNameError {
    fn new(what: &'static str, value: &str) -> Self {
        Self {
            what,
            value: value.to_string(),
        }
    }
}
