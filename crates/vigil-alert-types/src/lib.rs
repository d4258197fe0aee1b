//! Alert lifecycle types for Vigil.
//!
//! Everything the engine, the stores and the HTTP layer exchange lives here:
//! the transient [`Finding`], the persisted [`Alert`] with its enumerated
//! [`Severity`], [`Category`] and [`AlertStatus`], the append-only
//! [`AuditEntry`], and the aggregate [`Statistics`].

mod alert;
mod audit;
mod category;
mod finding;
mod id;
mod severity;
mod stats;
mod status;

pub use alert::{Alert, AlertFilter};
pub use audit::{AuditAction, AuditEntry, AuditEntryBuilder, AuditQuery};
pub use category::Category;
pub use finding::{Finding, FindingField};
pub use id::{AlertId, AuditEntryId};
pub use severity::Severity;
pub use stats::{CategoryCounts, SeverityCounts, Statistics, StatusCounts};
pub use status::AlertStatus;
