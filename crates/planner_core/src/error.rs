//! Error kinds surfaced to hosts; none of them leave a controller in a changed state.

use shared::{
    domain::{Field, SessionId},
    error::{ApiError, CollaboratorError, ErrorCode},
    protocol::ValidationItem,
};
use thiserror::Error;

use crate::{eligibility::ClosedReason, password::PolicyRule, wizard::WizardStep};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("no change kind selected")]
    KindNotSelected,
    #[error("required fields are incomplete: {}", join_fields(.missing))]
    IncompleteFields { missing: Vec<Field> },
    #[error("submission window closed: {0}")]
    WindowClosed(ClosedReason),
    #[error("a submission is already in flight")]
    SubmissionPending,
    #[error("cannot {action} while {step}")]
    InvalidTransition {
        action: &'static str,
        step: WizardStep,
    },
    #[error("unknown field {0:?}")]
    UnknownField(String),
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error("submission failed: {0}")]
    SubmissionFailed(#[source] CollaboratorError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishGateError {
    #[error("publication blocked by {} check(s): {}", .items.len(), join_titles(.items))]
    PublicationBlocked { items: Vec<ValidationItem> },
    #[error("a publication is already in flight")]
    PublishPending,
    #[error("plan already published")]
    AlreadyPublished,
    #[error("no publication is in flight")]
    NotInFlight,
    #[error("publish failed: {0}")]
    PublishFailed(#[source] CollaboratorError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("version {0} does not exist")]
    UnknownVersion(u32),
    #[error("version {0} is already the current version")]
    AlreadyCurrent(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("current password is required")]
    MissingCurrent,
    #[error("password does not meet policy: {}", join_rules(.0))]
    PolicyViolation(Vec<PolicyRule>),
    #[error("password confirmation does not match")]
    Mismatch,
    #[error("new password must differ from the current one")]
    ReusesCurrent,
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|field| field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_titles(items: &[ValidationItem]) -> String {
    items
        .iter()
        .map(|item| item.title.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_rules(rules: &[PolicyRule]) -> String {
    rules
        .iter()
        .map(|rule| rule.describe())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&WizardError> for ApiError {
    fn from(value: &WizardError) -> Self {
        let code = match value {
            WizardError::KindNotSelected | WizardError::IncompleteFields { .. } => {
                ErrorCode::Validation
            }
            WizardError::WindowClosed(_) => ErrorCode::WindowClosed,
            WizardError::SubmissionPending => ErrorCode::Busy,
            WizardError::InvalidTransition { .. } | WizardError::UnknownField(_) => {
                ErrorCode::Validation
            }
            WizardError::SessionNotFound(_) => ErrorCode::NotFound,
            WizardError::SubmissionFailed(err) => err.code,
        };
        ApiError::new(code, value.to_string())
    }
}

impl From<&PublishGateError> for ApiError {
    fn from(value: &PublishGateError) -> Self {
        let code = match value {
            PublishGateError::PublicationBlocked { .. } => ErrorCode::Blocked,
            PublishGateError::PublishPending => ErrorCode::Busy,
            PublishGateError::AlreadyPublished | PublishGateError::NotInFlight => {
                ErrorCode::Validation
            }
            PublishGateError::PublishFailed(err) => err.code,
        };
        ApiError::new(code, value.to_string())
    }
}

impl From<&HistoryError> for ApiError {
    fn from(value: &HistoryError) -> Self {
        let code = match value {
            HistoryError::UnknownVersion(_) => ErrorCode::NotFound,
            HistoryError::AlreadyCurrent(_) => ErrorCode::Validation,
        };
        ApiError::new(code, value.to_string())
    }
}

impl From<&PasswordError> for ApiError {
    fn from(value: &PasswordError) -> Self {
        ApiError::new(ErrorCode::Validation, value.to_string())
    }
}
