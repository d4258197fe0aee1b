//! Audit log contract and recorder for Vigil.
//!
//! This crate provides:
//!
//! - The [`AuditSink`] contract (append + newest-first query)
//! - An in-memory sink for tests and single-process deployments
//! - [`AuditRecorder`], which appends on behalf of the lifecycle engine and
//!   logs, rather than propagates, append failures

mod memory;
mod recorder;
mod sink;

pub use memory::MemoryAuditSink;
pub use recorder::AuditRecorder;
pub use sink::{AuditError, AuditResult, AuditSink};

// Re-export types for convenience
pub use vigil_alert_types::{AuditAction, AuditEntry, AuditEntryBuilder, AuditQuery};
