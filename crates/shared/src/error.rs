use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    WindowClosed,
    Blocked,
    Busy,
    NotFound,
    Unavailable,
    Internal,
}

/// Serializable error shape handed to hosts for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failure reported by an outbound collaborator (submission or publishing backend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CollaboratorError {
    pub code: ErrorCode,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unavailable, message)
    }
}

pub type SubmissionError = CollaboratorError;
pub type PublishError = CollaboratorError;

impl From<CollaboratorError> for ApiError {
    fn from(value: CollaboratorError) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}
