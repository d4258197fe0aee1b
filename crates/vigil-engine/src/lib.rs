//! Alert lifecycle engine for Vigil.
//!
//! [`LifecycleEngine`] turns findings into alerts, walks them through the
//! status transition table and records every action to the audit log.
//! It depends only on the [`vigil_store::AlertRepository`] and
//! [`vigil_audit::AuditSink`] contracts.

pub mod classify;
mod engine;
mod error;
mod id;

pub use classify::classify;
pub use engine::LifecycleEngine;
pub use error::{EngineError, EngineResult, ErrorKind};
pub use id::IdGenerator;
