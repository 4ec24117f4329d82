//! Append-only plan version history. Reverting adds a version; nothing is rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::protocol::PublicationRecord;
use tracing::info;

use crate::error::HistoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VersionOrigin {
    Published,
    Reverted { from: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanVersion {
    pub number: u32,
    pub notes: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub origin: VersionOrigin,
}

#[derive(Debug, Clone, Default)]
pub struct PlanHistory {
    versions: Vec<PlanVersion>,
}

impl PlanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_publication(
        &mut self,
        record: &PublicationRecord,
        author: impl Into<String>,
    ) -> &PlanVersion {
        self.push(
            record.notes.clone(),
            author.into(),
            record.published_at,
            VersionOrigin::Published,
        )
    }

    pub fn current(&self) -> Option<&PlanVersion> {
        self.versions.last()
    }

    /// Newest first, as the history panel lists them.
    pub fn versions(&self) -> impl Iterator<Item = &PlanVersion> {
        self.versions.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn get(&self, number: u32) -> Option<&PlanVersion> {
        // numbers are dense from 1
        number
            .checked_sub(1)
            .and_then(|idx| self.versions.get(idx as usize))
    }

    pub fn revert_to(
        &mut self,
        number: u32,
        author: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&PlanVersion, HistoryError> {
        let target = self
            .get(number)
            .ok_or(HistoryError::UnknownVersion(number))?;
        if self.current().map(|v| v.number) == Some(number) {
            return Err(HistoryError::AlreadyCurrent(number));
        }
        let notes = target.notes.clone();
        let author = author.into();
        info!(from = number, %author, "reverting plan version");
        Ok(self.push(notes, author, now, VersionOrigin::Reverted { from: number }))
    }

    fn push(
        &mut self,
        notes: String,
        author: String,
        created_at: DateTime<Utc>,
        origin: VersionOrigin,
    ) -> &PlanVersion {
        let number = self.versions.len() as u32 + 1;
        self.versions.push(PlanVersion {
            number,
            notes,
            author,
            created_at,
            origin,
        });
        &self.versions[self.versions.len() - 1]
    }
}

#[cfg(test)]
#[path = "tests/history_tests.rs"]
mod tests;
