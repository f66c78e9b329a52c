use thiserror::Error;

use crate::domain::user::Role;
use crate::lifecycle::Status;

/// Failures the lifecycle model distinguishes. `Unauthorized` and
/// `InvalidTransition` are usage errors and must never result in local state
/// mutation; `RemoteFailure` is retryable by the caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("unauthorized: {detail}")]
    Unauthorized { detail: String },
    #[error("no transition is defined from status {from:?}")]
    InvalidTransition { from: Status },
    #[error("validation failed: {field}")]
    ValidationFailed { field: String },
    #[error("promotion request `{id}` was not found")]
    NotFound { id: String },
    #[error("remote collaborator failed: {message}")]
    RemoteFailure { message: String, retryable: bool },
}

impl WorkflowError {
    pub fn validation(field: impl Into<String>) -> Self {
        Self::ValidationFailed { field: field.into() }
    }

    pub fn unauthorized_role(role: Role, status: Status) -> Self {
        Self::Unauthorized {
            detail: format!("role {role:?} may not act on a request in status {status}"),
        }
    }

    pub fn remote(message: impl Into<String>, retryable: bool) -> Self {
        Self::RemoteFailure { message: message.into(), retryable }
    }

    /// True when retrying the same call may succeed without any other change.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RemoteFailure { retryable: true, .. })
    }
}
