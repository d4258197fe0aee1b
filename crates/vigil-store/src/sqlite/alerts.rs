//! SQLite alert repository.

use super::pool::DatabasePool;
use crate::error::{StoreError, StoreResult};
use crate::repository::AlertRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::str::FromStr;
use tracing::{debug, instrument};
use vigil_alert_types::{Alert, AlertFilter, AlertId, AlertStatus, Category, Severity};

const SELECT_ALERT: &str =
    "SELECT id, severity, category, status, description, created_at, updated_at FROM alerts";

/// Alert repository over the `alerts` table.
///
/// Every method issues single-row statements, which SQLite applies atomically.
#[derive(Clone)]
pub struct SqliteAlertRepository {
    pool: SqlitePool,
}

impl SqliteAlertRepository {
    /// Create a repository sharing the given pool.
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }
}

fn parse_column<T: FromStr>(row: &SqliteRow, id: &str, column: &str) -> StoreResult<T>
where
    T::Err: std::fmt::Display,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>()
        .map_err(|e| StoreError::corrupt(id, format!("{}: {} ({})", column, raw, e)))
}

fn row_to_alert(row: &SqliteRow) -> StoreResult<Alert> {
    let id: String = row.try_get("id")?;

    Ok(Alert {
        severity: parse_column::<Severity>(row, &id, "severity")?,
        category: parse_column::<Category>(row, &id, "category")?,
        status: parse_column::<AlertStatus>(row, &id, "status")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        id: AlertId::from(id),
    })
}

#[async_trait]
impl AlertRepository for SqliteAlertRepository {
    #[instrument(skip(self, alert), fields(id = %alert.id))]
    async fn save(&self, alert: Alert) -> StoreResult<Alert> {
        let result = sqlx::query(
            "INSERT INTO alerts (id, severity, category, status, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(alert.id.as_str())
        .bind(alert.severity.as_ref())
        .bind(alert.category.as_ref())
        .bind(alert.status.as_ref())
        .bind(&alert.description)
        .bind(alert.created_at)
        .bind(alert.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!("Alert inserted");
                Ok(alert)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Duplicate(alert.id.into_inner()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &AlertId) -> StoreResult<Option<Alert>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_ALERT))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_alert).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self, filter: &AlertFilter) -> StoreResult<Vec<Alert>> {
        let mut query = QueryBuilder::<Sqlite>::new(SELECT_ALERT);
        query.push(" WHERE 1 = 1");

        if let Some(severity) = filter.severity {
            query.push(" AND severity = ").push_bind(severity.as_ref().to_string());
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_ref().to_string());
        }
        if let Some(category) = filter.category {
            query.push(" AND category = ").push_bind(category.as_ref().to_string());
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let rows = query.build().fetch_all(&self.pool).await?;
        debug!(count = rows.len(), "Alerts scanned");
        rows.iter().map(row_to_alert).collect()
    }

    #[instrument(skip(self), fields(id = %id, status = %status))]
    async fn update_status(
        &self,
        id: &AlertId,
        status: AlertStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Alert> {
        let result = sqlx::query("UPDATE alerts SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_ref())
            .bind(updated_at)
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        // A concurrent delete can land between the two statements.
        self.find_by_id(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &AlertId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
