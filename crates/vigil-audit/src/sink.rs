//! Audit sink trait definition.

use async_trait::async_trait;
use vigil_alert_types::{AuditEntry, AuditQuery};

/// Audit operation result.
pub type AuditResult<T> = Result<T, AuditError>;

/// Audit sink errors.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Append-only store of audit entries.
///
/// There is deliberately no update or delete.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append an entry.
    async fn append(&self, entry: AuditEntry) -> AuditResult<()>;

    /// Read entries matching the query, newest first.
    async fn query(&self, query: &AuditQuery) -> AuditResult<Vec<AuditEntry>>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}
