//! Store error types.

use thiserror::Error;

/// Store operation result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by alert repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Alert not found: {0}")]
    NotFound(String),

    #[error("Duplicate alert id: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn corrupt(id: impl Into<String>, reason: impl ToString) -> Self {
        Self::Corrupt {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}
