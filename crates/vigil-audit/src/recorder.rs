//! Engine-facing audit recording.

use crate::sink::{AuditResult, AuditSink};
use std::sync::Arc;
use tracing::{debug, warn};
use vigil_alert_types::{AuditEntry, AuditQuery};

/// Handle for recording audit entries.
///
/// Append failures are logged and dropped: recording never fails the
/// caller, and never replaces an error the caller is about to return.
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Create a recorder over a sink.
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Append an entry, logging any failure.
    pub async fn record(&self, entry: AuditEntry) {
        let action = entry.action;
        let alert_id = entry.alert_id.clone();

        match self.sink.append(entry).await {
            Ok(()) => debug!(action = %action, sink = self.sink.name(), "Audit entry recorded"),
            Err(e) => warn!(
                action = %action,
                alert_id = alert_id.as_ref().map(|id| id.as_str()).unwrap_or(""),
                sink = self.sink.name(),
                error = %e,
                "Failed to record audit entry"
            ),
        }
    }

    /// Read the audit log, newest first.
    pub async fn query(&self, query: &AuditQuery) -> AuditResult<Vec<AuditEntry>> {
        self.sink.query(query).await
    }
}
