//! SQLite audit sink.

use super::pool::DatabasePool;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;
use vigil_alert_types::{AlertId, AlertStatus, AuditAction, AuditEntry, AuditEntryId, AuditQuery};
use vigil_audit::{AuditError, AuditResult, AuditSink};

/// Append-only audit log in the `audit_log` table.
///
/// Insertion order (`seq`) defines newest-first.
#[derive(Clone)]
pub struct SqliteAuditSink {
    pool: SqlitePool,
}

impl SqliteAuditSink {
    /// Create a sink sharing the given pool.
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }
}

fn backend(e: impl std::fmt::Display) -> AuditError {
    AuditError::Backend(e.to_string())
}

fn parse_status(raw: Option<String>) -> AuditResult<Option<AlertStatus>> {
    raw.map(|s| AlertStatus::from_str(&s).map_err(backend))
        .transpose()
}

fn row_to_entry(row: &SqliteRow) -> AuditResult<AuditEntry> {
    let id: String = row.try_get("id").map_err(backend)?;
    let action: String = row.try_get("action").map_err(backend)?;
    let alert_id: Option<String> = row.try_get("alert_id").map_err(backend)?;
    let details: String = row.try_get("details").map_err(backend)?;

    Ok(AuditEntry {
        id: AuditEntryId::from_uuid(Uuid::parse_str(&id).map_err(backend)?),
        action: AuditAction::from_str(&action).map_err(backend)?,
        alert_id: alert_id.map(AlertId::from),
        previous_status: parse_status(row.try_get("previous_status").map_err(backend)?)?,
        new_status: parse_status(row.try_get("new_status").map_err(backend)?)?,
        details: serde_json::from_str::<HashMap<String, serde_json::Value>>(&details)?,
        timestamp: row.try_get("timestamp").map_err(backend)?,
    })
}

#[async_trait]
impl AuditSink for SqliteAuditSink {
    async fn append(&self, entry: AuditEntry) -> AuditResult<()> {
        let details = serde_json::to_string(&entry.details)?;

        sqlx::query(
            "INSERT INTO audit_log (id, action, alert_id, previous_status, new_status, details, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(entry.id.as_uuid().to_string())
        .bind(entry.action.as_ref())
        .bind(entry.alert_id.as_ref().map(|id| id.as_str()))
        .bind(entry.previous_status.map(|s| s.as_ref().to_string()))
        .bind(entry.new_status.map(|s| s.as_ref().to_string()))
        .bind(details)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    async fn query(&self, query: &AuditQuery) -> AuditResult<Vec<AuditEntry>> {
        let mut sql = QueryBuilder::<Sqlite>::new(
            "SELECT id, action, alert_id, previous_status, new_status, details, timestamp
             FROM audit_log WHERE 1 = 1",
        );

        if let Some(action) = query.action {
            sql.push(" AND action = ").push_bind(action.as_ref().to_string());
        }
        if let Some(alert_id) = &query.alert_id {
            sql.push(" AND alert_id = ").push_bind(alert_id.as_str().to_string());
        }
        sql.push(" ORDER BY seq DESC");
        // SQLite treats a negative LIMIT as unbounded.
        let limit = query.limit.map(|l| l as i64).unwrap_or(-1);
        sql.push(" LIMIT ").push_bind(limit);

        let rows = sql.build().fetch_all(&self.pool).await.map_err(backend)?;
        rows.iter().map(row_to_entry).collect()
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
