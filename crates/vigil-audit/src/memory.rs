//! In-memory audit sink.

use crate::sink::{AuditResult, AuditSink};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::VecDeque;
use tracing::debug;
use vigil_alert_types::{AuditEntry, AuditQuery};

/// Audit sink holding entries in process memory.
///
/// With a capacity set, the oldest entries are dropped once it is exceeded.
pub struct MemoryAuditSink {
    entries: RwLock<VecDeque<AuditEntry>>,
    capacity: Option<usize>,
}

impl MemoryAuditSink {
    /// Create an unbounded sink.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            capacity: None,
        }
    }

    /// Create a sink that keeps at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity: Some(capacity),
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if no entries are held.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for MemoryAuditSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, entry: AuditEntry) -> AuditResult<()> {
        let mut entries = self.entries.write();
        debug!(action = %entry.action, "Audit entry appended");
        entries.push_back(entry);

        if let Some(capacity) = self.capacity {
            while entries.len() > capacity {
                entries.pop_front();
            }
        }
        Ok(())
    }

    async fn query(&self, query: &AuditQuery) -> AuditResult<Vec<AuditEntry>> {
        let entries = self.entries.read();
        let limit = query.limit.unwrap_or(usize::MAX);

        // Appends arrive in time order, so reverse iteration is newest-first.
        Ok(entries
            .iter()
            .rev()
            .filter(|e| query.matches(e))
            .take(limit)
            .cloned()
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
