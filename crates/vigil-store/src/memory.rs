//! In-memory alert repository.

use crate::error::{StoreError, StoreResult};
use crate::repository::AlertRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use tracing::debug;
use vigil_alert_types::{Alert, AlertFilter, AlertId, AlertStatus};

/// Alert repository backed by a concurrent hash map.
///
/// Per-record atomicity comes from the map's shard locks.
#[derive(Default)]
pub struct MemoryAlertRepository {
    alerts: DashMap<AlertId, Alert>,
}

impl MemoryAlertRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored alerts.
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Check if the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}

/// Newest first; id breaks ties so the order is stable.
pub(crate) fn sort_newest_first(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl AlertRepository for MemoryAlertRepository {
    async fn save(&self, alert: Alert) -> StoreResult<Alert> {
        match self.alerts.entry(alert.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(alert.id.into_inner())),
            Entry::Vacant(slot) => {
                debug!(id = %alert.id, "Alert stored");
                slot.insert(alert.clone());
                Ok(alert)
            }
        }
    }

    async fn find_by_id(&self, id: &AlertId) -> StoreResult<Option<Alert>> {
        Ok(self.alerts.get(id).map(|entry| entry.value().clone()))
    }

    async fn find_all(&self, filter: &AlertFilter) -> StoreResult<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self
            .alerts
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        sort_newest_first(&mut alerts);
        Ok(alerts)
    }

    async fn update_status(
        &self,
        id: &AlertId,
        status: AlertStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Alert> {
        let mut entry = self
            .alerts
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        entry.status = status;
        entry.updated_at = updated_at;
        debug!(id = %id, status = %status, "Alert status stored");
        Ok(entry.clone())
    }

    async fn delete(&self, id: &AlertId) -> StoreResult<()> {
        self.alerts
            .remove(id)
            .map(|_| debug!(id = %id, "Alert removed"))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
