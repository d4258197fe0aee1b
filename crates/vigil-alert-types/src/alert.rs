//! The persisted alert record.

use crate::{AlertId, AlertStatus, Category, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A lifecycle-tracked alert derived from a finding.
///
/// Only `status` and `updated_at` ever change after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "AlertDocument", from = "AlertDocument")]
pub struct Alert {
    /// Unique alert identifier.
    pub id: AlertId,
    /// Severity assigned at creation.
    pub severity: Severity,
    /// Category of the originating finding.
    pub category: Category,
    /// Current lifecycle status.
    pub status: AlertStatus,
    /// Trimmed finding description.
    pub description: String,
    /// When the alert was created.
    pub created_at: DateTime<Utc>,
    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    /// Create a new alert in the `New` status.
    pub fn new(
        id: AlertId,
        severity: Severity,
        category: Category,
        description: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            severity,
            category,
            status: AlertStatus::New,
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Wire and document layout of an alert.
///
/// `timestamp` duplicates `createdAt` for dashboard clients that sort on it.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertDocument {
    id: AlertId,
    severity: Severity,
    category: Category,
    status: AlertStatus,
    description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Alert> for AlertDocument {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            severity: alert.severity,
            category: alert.category,
            status: alert.status,
            description: alert.description,
            timestamp: Some(alert.created_at),
            created_at: alert.created_at,
            updated_at: alert.updated_at,
        }
    }
}

impl From<AlertDocument> for Alert {
    fn from(doc: AlertDocument) -> Self {
        Self {
            id: doc.id,
            severity: doc.severity,
            category: doc.category,
            status: doc.status,
            description: doc.description,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Partial match on alert fields. Present fields combine with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFilter {
    /// Match this severity only.
    #[serde(default)]
    pub severity: Option<Severity>,
    /// Match this status only.
    #[serde(default)]
    pub status: Option<AlertStatus>,
    /// Match this category only.
    #[serde(default)]
    pub category: Option<Category>,
}

impl AlertFilter {
    /// A filter that matches every alert.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Restrict to a status.
    pub fn with_status(mut self, status: AlertStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to a category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Check whether an alert satisfies every present field.
    pub fn matches(&self, alert: &Alert) -> bool {
        self.severity.map_or(true, |s| alert.severity == s)
            && self.status.map_or(true, |s| alert.status == s)
            && self.category.map_or(true, |c| alert.category == c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Alert {
        let created = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        Alert::new(
            AlertId::from("ALT-1705314600000-7"),
            Severity::High,
            Category::Cve,
            "Critical remote exploit found",
            created,
        )
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();

        for key in [
            "id",
            "severity",
            "category",
            "status",
            "description",
            "timestamp",
            "createdAt",
            "updatedAt",
        ] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert_eq!(json["status"], "New");
        assert_eq!(json["category"], "CVE");
        assert_eq!(json["timestamp"], json["createdAt"]);
    }

    #[test]
    fn test_document_without_timestamp_deserializes() {
        let mut json = serde_json::to_value(sample()).unwrap();
        json.as_object_mut().unwrap().remove("timestamp");

        let alert: Alert = serde_json::from_value(json).unwrap();
        assert_eq!(alert, sample());
    }

    #[test]
    fn test_filter_matching() {
        let alert = sample();

        assert!(AlertFilter::all().matches(&alert));
        assert!(AlertFilter::all().with_severity(Severity::High).matches(&alert));
        assert!(AlertFilter::all()
            .with_severity(Severity::High)
            .with_category(Category::Cve)
            .with_status(AlertStatus::New)
            .matches(&alert));
        assert!(!AlertFilter::all().with_severity(Severity::Low).matches(&alert));
        assert!(!AlertFilter::all()
            .with_category(Category::Cve)
            .with_status(AlertStatus::Resolved)
            .matches(&alert));
    }
}
