//! Submission phase windows with manual lock and force-open overrides.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive `[opens_at, closes_at]` window. Precedence: lock > window > force-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityWindow {
    pub opens_at: DateTime<Utc>,
    pub closes_at: DateTime<Utc>,
    #[serde(default)]
    pub manually_locked: bool,
    #[serde(default)]
    pub force_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    Open,
    /// Outside the window but kept open by the force-open override.
    ForcedOpen,
    ManuallyLocked,
    NotYetOpen,
    PastDeadline,
}

/// Why a window rejected a submission; hosts word the message differently per reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedReason {
    ManuallyLocked,
    NotYetOpen,
    PastDeadline,
}

impl fmt::Display for ClosedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClosedReason::ManuallyLocked => "submissions are locked by an administrator",
            ClosedReason::NotYetOpen => "the submission window has not opened yet",
            ClosedReason::PastDeadline => "the submission deadline has passed",
        })
    }
}

impl EligibilityWindow {
    pub fn new(opens_at: DateTime<Utc>, closes_at: DateTime<Utc>) -> Self {
        Self {
            opens_at,
            closes_at,
            manually_locked: false,
            force_open: false,
        }
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.manually_locked = locked;
        self
    }

    pub fn forced_open(mut self, force_open: bool) -> Self {
        self.force_open = force_open;
        self
    }

    pub fn status(&self, now: DateTime<Utc>) -> WindowStatus {
        if self.manually_locked {
            WindowStatus::ManuallyLocked
        } else if self.opens_at <= now && now <= self.closes_at {
            WindowStatus::Open
        } else if self.force_open {
            WindowStatus::ForcedOpen
        } else if now < self.opens_at {
            WindowStatus::NotYetOpen
        } else {
            WindowStatus::PastDeadline
        }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.check(now).is_ok()
    }

    pub fn check(&self, now: DateTime<Utc>) -> Result<(), ClosedReason> {
        match self.status(now) {
            WindowStatus::Open | WindowStatus::ForcedOpen => Ok(()),
            WindowStatus::ManuallyLocked => Err(ClosedReason::ManuallyLocked),
            WindowStatus::NotYetOpen => Err(ClosedReason::NotYetOpen),
            WindowStatus::PastDeadline => Err(ClosedReason::PastDeadline),
        }
    }
}

#[cfg(test)]
#[path = "tests/eligibility_tests.rs"]
mod tests;
