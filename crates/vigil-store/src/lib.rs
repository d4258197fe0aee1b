//! Alert persistence for Vigil.
//!
//! Provides the [`AlertRepository`] contract consumed by the lifecycle
//! engine, with in-memory and SQLite implementations, plus a SQLite
//! implementation of the audit sink contract.

mod error;
mod memory;
mod repository;
pub mod sqlite;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryAlertRepository;
pub use repository::AlertRepository;
pub use sqlite::{DatabasePool, PoolConfig, SqliteAlertRepository, SqliteAuditSink};
