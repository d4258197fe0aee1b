//! Engine error types.

use thiserror::Error;
use vigil_audit::AuditError;
use vigil_store::StoreError;

/// Engine operation result.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors returned by lifecycle operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The finding or request was malformed.
    #[error("{0}")]
    Validation(String),

    /// No alert with the given id.
    #[error("Alert not found: {0}")]
    NotFound(String),

    /// The requested status is not a legal successor of the current one.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// The underlying store failed.
    #[error("Persistence failure: {0}")]
    Persistence(#[source] StoreError),
}

/// Coarse classification of an [`EngineError`].
///
/// Business failures are expected outcomes a caller can act on; `Fault`
/// means the operation could not be carried out at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidTransition,
    Fault,
}

impl ErrorKind {
    /// Check if this is an expected business failure.
    pub fn is_business(&self) -> bool {
        !matches!(self, Self::Fault)
    }
}

impl EngineError {
    /// Get the error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Persistence(_) => ErrorKind::Fault,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Persistence(other),
        }
    }
}

impl From<AuditError> for EngineError {
    fn from(err: AuditError) -> Self {
        Self::Persistence(StoreError::Unavailable(format!("audit sink: {}", err)))
    }
}
