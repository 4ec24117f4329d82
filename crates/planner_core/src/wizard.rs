//! Gated change wizard: kind selection, detail entry, review, and one-shot submission.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    domain::{ChangeKind, Field, ParseNameError, SessionId, Urgency},
    error::SubmissionError,
    protocol::{Ack, Session},
};
use tracing::{debug, info, warn};

use crate::{
    eligibility::EligibilityWindow, error::WizardError, repository::ScheduleRepository,
    request::ChangeRequest, ChangeSubmitter, Clock,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Selecting,
    Detailing,
    Reviewing,
    Submitted,
    Closed,
}

impl WizardStep {
    pub fn is_terminal(self) -> bool {
        matches!(self, WizardStep::Submitted | WizardStep::Closed)
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WizardStep::Selecting => "selecting a change kind",
            WizardStep::Detailing => "entering details",
            WizardStep::Reviewing => "reviewing",
            WizardStep::Submitted => "submitted",
            WizardStep::Closed => "closed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePoint {
    PreReview,
    PreSubmit,
}

/// Where field completeness is enforced. Confirmation is always fully gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatingMode {
    /// Review cannot be entered until every required field is filled.
    BeforeReview,
    /// Review only needs a kind; completeness is checked at confirmation.
    #[default]
    BeforeSubmit,
}

impl FromStr for GatingMode {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "before_review" => Ok(GatingMode::BeforeReview),
            "before_submit" => Ok(GatingMode::BeforeSubmit),
            _ => Err(ParseNameError {
                what: "gating mode",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WizardConfig {
    #[serde(default)]
    pub gating: GatingMode,
    #[serde(default)]
    pub window: Option<EligibilityWindow>,
}

impl WizardConfig {
    /// Session-change modal: no phase window, review reachable once a kind is picked.
    pub fn session_change() -> Self {
        Self::default()
    }

    /// Suggestion modal: submissions accepted only while the phase window is open.
    pub fn suggestion(window: EligibilityWindow) -> Self {
        Self {
            gating: GatingMode::BeforeSubmit,
            window: Some(window),
        }
    }

    pub fn with_gating(mut self, gating: GatingMode) -> Self {
        self.gating = gating;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    fields: BTreeMap<Field, String>,
    reason: String,
    urgency: Urgency,
}

impl Draft {
    pub fn fields(&self) -> &BTreeMap<Field, String> {
        &self.fields
    }

    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Reason => Some(self.reason.as_str()),
            other => self.fields.get(&other).map(String::as_str),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.reason.is_empty() && self.urgency == Urgency::Normal
    }

    fn is_filled(&self, field: Field) -> bool {
        self.value(field).is_some_and(|v| !v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub field: Field,
    pub before: Option<String>,
    pub after: String,
}

/// Read-only before/after view shown on the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewPreview {
    pub session: Session,
    pub kind: ChangeKind,
    pub rows: Vec<PreviewRow>,
    pub reason: String,
    pub urgency: Urgency,
}

pub struct ChangeWizard {
    subject: SessionId,
    config: WizardConfig,
    step: WizardStep,
    kind: Option<ChangeKind>,
    draft: Draft,
    /// Record handed to the submitter and not yet resolved. Blocks confirm and cancel.
    in_flight: Option<ChangeRequest>,
    last_submitted: Option<ChangeRequest>,
}

impl ChangeWizard {
    pub fn open(subject: SessionId, config: WizardConfig) -> Self {
        info!(subject = %subject, gating = ?config.gating, "change wizard opened");
        Self {
            subject,
            config,
            step: WizardStep::Selecting,
            kind: None,
            draft: Draft::default(),
            in_flight: None,
            last_submitted: None,
        }
    }

    /// Host re-open signal: start a fresh draft for the same subject.
    pub fn restart(&mut self) -> Result<(), WizardError> {
        if self.in_flight.is_some() {
            return Err(WizardError::SubmissionPending);
        }
        self.step = WizardStep::Selecting;
        self.kind = None;
        self.draft = Draft::default();
        debug!(subject = %self.subject, "change wizard restarted");
        Ok(())
    }

    pub fn subject(&self) -> SessionId {
        self.subject
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn selected_kind(&self) -> Option<ChangeKind> {
        self.kind
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_submitted(&self) -> Option<&ChangeRequest> {
        self.last_submitted.as_ref()
    }

    pub fn select_kind(&mut self, kind: ChangeKind) -> Result<(), WizardError> {
        self.ensure_active("select a change kind")?;
        self.kind = Some(kind);
        self.draft.fields.retain(|field, _| kind.is_relevant(*field));
        self.step = WizardStep::Detailing;
        debug!(subject = %self.subject, %kind, "change kind selected");
        Ok(())
    }

    /// Fields outside the selected kind are kept but never validated or submitted.
    pub fn update_field(
        &mut self,
        field: Field,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.ensure_active("edit fields")?;
        if self.step != WizardStep::Detailing {
            return Err(WizardError::InvalidTransition {
                action: "edit fields",
                step: self.step,
            });
        }
        let value = value.into();
        match field {
            Field::Reason => self.draft.reason = value,
            other => {
                self.draft.fields.insert(other, value);
            }
        }
        debug!(subject = %self.subject, %field, "draft field updated");
        Ok(())
    }

    pub fn update_field_named(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        let field = name
            .parse::<Field>()
            .map_err(|err| WizardError::UnknownField(err.value))?;
        self.update_field(field, value)
    }

    pub fn set_urgency(&mut self, urgency: Urgency) -> Result<(), WizardError> {
        self.ensure_active("change urgency")?;
        if self.step == WizardStep::Reviewing {
            return Err(WizardError::InvalidTransition {
                action: "change urgency",
                step: self.step,
            });
        }
        self.draft.urgency = urgency;
        Ok(())
    }

    /// Required fields still empty for the selected kind, reason last.
    pub fn missing_fields(&self) -> Vec<Field> {
        let Some(kind) = self.kind else {
            return Vec::new();
        };
        let mut missing: Vec<Field> = kind
            .required_groups()
            .iter()
            .filter(|group| !group.iter().any(|field| self.draft.is_filled(*field)))
            .flat_map(|group| group.iter().copied())
            .collect();
        if !self.draft.is_filled(Field::Reason) {
            missing.push(Field::Reason);
        }
        missing
    }

    pub fn can_advance(&self, gate: GatePoint, now: DateTime<Utc>) -> bool {
        self.check(gate, now).is_ok()
    }

    /// Same predicate as [`Self::can_advance`], naming the first unmet requirement.
    pub fn check(&self, gate: GatePoint, now: DateTime<Utc>) -> Result<(), WizardError> {
        match gate {
            GatePoint::PreReview => self.kind.map(|_| ()).ok_or(WizardError::KindNotSelected),
            GatePoint::PreSubmit => {
                self.check_fields()?;
                if let Some(window) = &self.config.window {
                    window.check(now).map_err(WizardError::WindowClosed)?;
                }
                Ok(())
            }
        }
    }

    fn check_fields(&self) -> Result<(), WizardError> {
        if self.kind.is_none() {
            return Err(WizardError::KindNotSelected);
        }
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WizardError::IncompleteFields { missing })
        }
    }

    pub fn review(&mut self, now: DateTime<Utc>) -> Result<(), WizardError> {
        self.ensure_active("review")?;
        if self.step != WizardStep::Detailing {
            return Err(WizardError::InvalidTransition {
                action: "review",
                step: self.step,
            });
        }
        match self.config.gating {
            GatingMode::BeforeReview => self.check_fields()?,
            GatingMode::BeforeSubmit => self.check(GatePoint::PreReview, now)?,
        }
        self.step = WizardStep::Reviewing;
        debug!(subject = %self.subject, "entered review");
        Ok(())
    }

    pub fn back(&mut self) -> Result<(), WizardError> {
        self.ensure_active("go back")?;
        self.step = match self.step {
            WizardStep::Reviewing => WizardStep::Detailing,
            WizardStep::Detailing => WizardStep::Selecting,
            step => {
                return Err(WizardError::InvalidTransition {
                    action: "go back",
                    step,
                })
            }
        };
        Ok(())
    }

    pub async fn preview(
        &self,
        repository: &dyn ScheduleRepository,
    ) -> Result<ReviewPreview, WizardError> {
        let kind = self.kind.ok_or(WizardError::KindNotSelected)?;
        let session = repository
            .get_session(self.subject)
            .await
            .ok_or(WizardError::SessionNotFound(self.subject))?;
        let rows = kind
            .relevant_fields()
            .iter()
            .filter(|field| self.draft.is_filled(**field))
            .map(|field| PreviewRow {
                field: *field,
                before: session.field_value(*field),
                after: self.draft.fields[field].trim().to_string(),
            })
            .collect();
        Ok(ReviewPreview {
            session,
            kind,
            rows,
            reason: self.draft.reason.trim().to_string(),
            urgency: self.draft.urgency,
        })
    }

    /// Passes the pre-submit gate and freezes the draft into a record.
    ///
    /// The wizard stays pending until [`Self::finish_submit`] resolves it.
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Result<ChangeRequest, WizardError> {
        if self.in_flight.is_some() {
            return Err(WizardError::SubmissionPending);
        }
        if !matches!(self.step, WizardStep::Detailing | WizardStep::Reviewing) {
            return Err(WizardError::InvalidTransition {
                action: "confirm",
                step: self.step,
            });
        }
        if let Err(err) = self.check(GatePoint::PreSubmit, now) {
            warn!(subject = %self.subject, error = %err, "confirmation rejected");
            return Err(err);
        }
        let kind = self.kind.ok_or(WizardError::KindNotSelected)?;

        let fields = self
            .draft
            .fields
            .iter()
            .filter(|(field, value)| kind.is_relevant(**field) && !value.trim().is_empty())
            .map(|(field, value)| (*field, value.trim().to_string()))
            .collect();
        let request = ChangeRequest::new(
            self.subject,
            kind,
            fields,
            self.draft.reason.trim().to_string(),
            self.draft.urgency,
            now,
        );
        self.in_flight = Some(request.clone());
        info!(subject = %self.subject, request_id = %request.id(), %kind, "submitting change request");
        Ok(request)
    }

    pub fn finish_submit(
        &mut self,
        outcome: Result<Ack, SubmissionError>,
    ) -> Result<Ack, WizardError> {
        let Some(request) = self.in_flight.take() else {
            return Err(WizardError::InvalidTransition {
                action: "finish a submission",
                step: self.step,
            });
        };
        match outcome {
            Ok(ack) => {
                info!(request_id = %request.id(), reference = %ack.reference, "change request accepted");
                self.step = WizardStep::Submitted;
                self.kind = None;
                self.draft = Draft::default();
                self.last_submitted = Some(request);
                Ok(ack)
            }
            Err(err) => {
                warn!(request_id = %request.id(), error = %err, "change request submission failed");
                Err(WizardError::SubmissionFailed(err))
            }
        }
    }

    /// Gate, submit once, and resolve. A failed call leaves the draft for a retry.
    pub async fn confirm(
        &mut self,
        submitter: &dyn ChangeSubmitter,
        clock: &dyn Clock,
    ) -> Result<Ack, WizardError> {
        let request = self.begin_submit(clock.now())?;
        let outcome = submitter.submit(&request).await;
        self.finish_submit(outcome)
    }

    /// Discards the draft. Idempotent; refused only while a submission is pending.
    pub fn cancel(&mut self) -> Result<(), WizardError> {
        if self.in_flight.is_some() {
            return Err(WizardError::SubmissionPending);
        }
        if self.step != WizardStep::Closed {
            debug!(subject = %self.subject, from = %self.step, "change wizard closed");
        }
        self.step = WizardStep::Closed;
        self.kind = None;
        self.draft = Draft::default();
        Ok(())
    }

    fn ensure_active(&self, action: &'static str) -> Result<(), WizardError> {
        if self.in_flight.is_some() {
            return Err(WizardError::SubmissionPending);
        }
        if self.step.is_terminal() {
            return Err(WizardError::InvalidTransition {
                action,
                step: self.step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/wizard_tests.rs"]
mod tests;
