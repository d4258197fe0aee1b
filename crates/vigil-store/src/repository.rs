//! Alert repository trait definition.

use crate::error::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vigil_alert_types::{Alert, AlertFilter, AlertId, AlertStatus};

/// Durable store for alert records, keyed by alert id.
///
/// Each call is atomic for the single record it touches. There are no
/// cross-record transactions and no conflict detection between writers.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Insert a new alert. Fails with `StoreError::Duplicate` if the id exists.
    async fn save(&self, alert: Alert) -> StoreResult<Alert>;

    /// Look up an alert by id.
    async fn find_by_id(&self, id: &AlertId) -> StoreResult<Option<Alert>>;

    /// All alerts matching the filter, newest first.
    async fn find_all(&self, filter: &AlertFilter) -> StoreResult<Vec<Alert>>;

    /// Set the status and update timestamp of an existing alert.
    async fn update_status(
        &self,
        id: &AlertId,
        status: AlertStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Alert>;

    /// Remove an alert. Fails with `StoreError::NotFound` if absent.
    async fn delete(&self, id: &AlertId) -> StoreResult<()>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}
