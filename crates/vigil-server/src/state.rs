//! Shared application state.

use crate::config::{ServerConfig, StorageBackend};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use vigil_audit::{AuditRecorder, AuditSink, MemoryAuditSink};
use vigil_engine::LifecycleEngine;
use vigil_store::{
    AlertRepository, DatabasePool, MemoryAlertRepository, PoolConfig, SqliteAlertRepository,
    SqliteAuditSink,
};

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// The lifecycle engine.
    pub engine: LifecycleEngine,
    /// Name of the active storage backend.
    pub backend: &'static str,
    pool: Option<Arc<DatabasePool>>,
}

impl AppState {
    /// Build state for the configured storage backend.
    pub async fn new(config: &ServerConfig) -> Result<Self> {
        let storage = &config.storage;

        match storage.backend {
            StorageBackend::Memory => {
                let sink = match storage.audit_capacity {
                    Some(capacity) => MemoryAuditSink::with_capacity(capacity),
                    None => MemoryAuditSink::new(),
                };
                info!(audit_capacity = ?storage.audit_capacity, "Using in-memory storage");
                Ok(Self::from_parts(
                    Arc::new(MemoryAlertRepository::new()),
                    Arc::new(sink),
                    None,
                ))
            }
            StorageBackend::Sqlite => {
                let pool_config = PoolConfig::builder()
                    .database_path(storage.sqlite_path.clone())
                    .max_connections(storage.max_connections)
                    .busy_timeout(Duration::from_secs(storage.busy_timeout_secs))
                    .build()
                    .context("Invalid SQLite pool configuration")?;
                let pool = DatabasePool::new(pool_config)
                    .await
                    .with_context(|| format!("Failed to open {}", storage.sqlite_path))?;
                info!(path = %storage.sqlite_path, "Using SQLite storage");

                Ok(Self::from_parts(
                    Arc::new(SqliteAlertRepository::new(&pool)),
                    Arc::new(SqliteAuditSink::new(&pool)),
                    Some(Arc::new(pool)),
                ))
            }
        }
    }

    /// Fresh in-memory state.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryAlertRepository::new()),
            Arc::new(MemoryAuditSink::new()),
            None,
        )
    }

    /// Build state from explicit collaborators.
    pub fn from_parts(
        repo: Arc<dyn AlertRepository>,
        sink: Arc<dyn AuditSink>,
        pool: Option<Arc<DatabasePool>>,
    ) -> Self {
        let backend = repo.name();
        Self {
            engine: LifecycleEngine::new(repo, AuditRecorder::new(sink)),
            backend,
            pool,
        }
    }

    /// Check that storage is reachable.
    pub async fn storage_healthy(&self) -> bool {
        match &self.pool {
            Some(pool) => pool.health_check().await.is_ok(),
            None => true,
        }
    }

    /// Release storage resources.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
