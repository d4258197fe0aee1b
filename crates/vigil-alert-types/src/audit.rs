//! Append-only audit entries for alert lifecycle actions.

use crate::{AlertId, AlertStatus, AuditEntryId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Lifecycle actions that produce an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    AlertCreated,
    AlertCreationFailed,
    StatusUpdated,
    StatusUpdateFailed,
    AlertDeleted,
    AlertDeletionFailed,
}

/// A write-once record of a lifecycle action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique entry identifier.
    pub id: AuditEntryId,
    /// What happened.
    pub action: AuditAction,
    /// Affected alert, when one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_id: Option<AlertId>,
    /// Status before a transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<AlertStatus>,
    /// Status after (or requested by) a transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<AlertStatus>,
    /// Free-form context such as error messages.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, serde_json::Value>,
    /// When the entry was written.
    pub timestamp: DateTime<Utc>,
}

impl AuditEntry {
    /// Create a new entry builder.
    pub fn builder(action: AuditAction) -> AuditEntryBuilder {
        AuditEntryBuilder::new(action)
    }

    /// Get a string detail by key.
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(|v| v.as_str())
    }
}

/// Builder for constructing audit entries.
#[derive(Debug)]
pub struct AuditEntryBuilder {
    action: AuditAction,
    alert_id: Option<AlertId>,
    previous_status: Option<AlertStatus>,
    new_status: Option<AlertStatus>,
    details: HashMap<String, serde_json::Value>,
}

impl AuditEntryBuilder {
    /// Create a new builder.
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            alert_id: None,
            previous_status: None,
            new_status: None,
            details: HashMap::new(),
        }
    }

    /// Set the affected alert.
    pub fn alert_id(mut self, id: AlertId) -> Self {
        self.alert_id = Some(id);
        self
    }

    /// Set the status before the transition.
    pub fn previous_status(mut self, status: AlertStatus) -> Self {
        self.previous_status = Some(status);
        self
    }

    /// Set the status after the transition.
    pub fn new_status(mut self, status: AlertStatus) -> Self {
        self.new_status = Some(status);
        self
    }

    /// Add a detail value.
    pub fn detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json) = serde_json::to_value(value) {
            self.details.insert(key.into(), json);
        }
        self
    }

    /// Attach an error message under the `error` key.
    pub fn error(self, error: &impl std::fmt::Display) -> Self {
        self.detail("error", error.to_string())
    }

    /// Build the entry.
    pub fn build(self) -> AuditEntry {
        AuditEntry {
            id: AuditEntryId::new(),
            action: self.action,
            alert_id: self.alert_id,
            previous_status: self.previous_status,
            new_status: self.new_status,
            details: self.details,
            timestamp: Utc::now(),
        }
    }
}

/// Filter for reading the audit log. Results are ordered newest-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    /// Only entries with this action.
    #[serde(default)]
    pub action: Option<AuditAction>,
    /// Only entries about this alert.
    #[serde(default)]
    pub alert_id: Option<AlertId>,
    /// Maximum number of entries to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl AuditQuery {
    /// Query matching every entry.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to an action.
    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Restrict to an alert.
    pub fn with_alert_id(mut self, id: impl Into<AlertId>) -> Self {
        self.alert_id = Some(id.into());
        self
    }

    /// Cap the number of results.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check whether an entry satisfies the action and alert constraints.
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.action.map_or(true, |a| entry.action == a)
            && self
                .alert_id
                .as_ref()
                .map_or(true, |id| entry.alert_id.as_ref() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        let cases = vec![
            (AuditAction::AlertCreated, "ALERT_CREATED"),
            (AuditAction::AlertCreationFailed, "ALERT_CREATION_FAILED"),
            (AuditAction::StatusUpdated, "STATUS_UPDATED"),
            (AuditAction::StatusUpdateFailed, "STATUS_UPDATE_FAILED"),
            (AuditAction::AlertDeleted, "ALERT_DELETED"),
            (AuditAction::AlertDeletionFailed, "ALERT_DELETION_FAILED"),
        ];

        for (action, name) in cases {
            assert_eq!(action.to_string(), name);
            assert_eq!(name.parse::<AuditAction>().unwrap(), action);
            assert_eq!(serde_json::to_value(action).unwrap(), serde_json::json!(name));
        }
    }

    #[test]
    fn test_builder() {
        let entry = AuditEntry::builder(AuditAction::StatusUpdated)
            .alert_id(AlertId::from("ALT-1-1"))
            .previous_status(AlertStatus::New)
            .new_status(AlertStatus::Acknowledged)
            .detail("source", "api")
            .build();

        assert_eq!(entry.action, AuditAction::StatusUpdated);
        assert_eq!(entry.previous_status, Some(AlertStatus::New));
        assert_eq!(entry.new_status, Some(AlertStatus::Acknowledged));
        assert_eq!(entry.detail_str("source"), Some("api"));
    }

    #[test]
    fn test_query_matches() {
        let entry = AuditEntry::builder(AuditAction::AlertDeleted)
            .alert_id(AlertId::from("ALT-1-1"))
            .build();

        assert!(AuditQuery::all().matches(&entry));
        assert!(AuditQuery::all().with_alert_id("ALT-1-1").matches(&entry));
        assert!(!AuditQuery::all().with_alert_id("ALT-2-2").matches(&entry));
        assert!(!AuditQuery::all()
            .with_action(AuditAction::AlertCreated)
            .matches(&entry));

        let anonymous = AuditEntry::builder(AuditAction::AlertCreationFailed).build();
        assert!(!AuditQuery::all().with_alert_id("ALT-1-1").matches(&anonymous));
    }
}
