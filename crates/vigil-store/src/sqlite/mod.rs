//! SQLite storage backend.

mod alerts;
mod audit;
pub mod pool;
pub mod schema;

pub use alerts::SqliteAlertRepository;
pub use audit::SqliteAuditSink;
pub use pool::{DatabasePool, PoolConfig, PoolConfigBuilder, PoolError, SynchronousMode};
