//! Aggregate counts over the alert set.

use crate::{Alert, AlertStatus, Category, Severity};
use serde::{Deserialize, Serialize};

/// Alert counts by status, severity and category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of alerts counted.
    pub total: u64,
    /// Counts per lifecycle status.
    pub by_status: StatusCounts,
    /// Counts per severity.
    pub by_severity: SeverityCounts,
    /// Counts per category.
    pub by_category: CategoryCounts,
}

/// Alert counts keyed by [`AlertStatus`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub new: u64,
    pub acknowledged: u64,
    /// Serialized as `inProgress`.
    pub in_progress: u64,
    pub resolved: u64,
}

/// Alert counts keyed by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

/// Alert counts keyed by category, one lower-cased field per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub cve: u64,
    pub s3: u64,
    pub iam: u64,
    pub network: u64,
    pub activity: u64,
}

impl Statistics {
    /// Count one alert into every bucket it belongs to.
    pub fn record(&mut self, alert: &Alert) {
        self.total += 1;

        match alert.status {
            AlertStatus::New => self.by_status.new += 1,
            AlertStatus::Acknowledged => self.by_status.acknowledged += 1,
            AlertStatus::InProgress => self.by_status.in_progress += 1,
            AlertStatus::Resolved => self.by_status.resolved += 1,
        }

        match alert.severity {
            Severity::High => self.by_severity.high += 1,
            Severity::Medium => self.by_severity.medium += 1,
            Severity::Low => self.by_severity.low += 1,
        }

        match alert.category {
            Category::Cve => self.by_category.cve += 1,
            Category::S3 => self.by_category.s3 += 1,
            Category::Iam => self.by_category.iam += 1,
            Category::Network => self.by_category.network += 1,
            Category::Activity => self.by_category.activity += 1,
        }
    }
}

impl<'a> FromIterator<&'a Alert> for Statistics {
    fn from_iter<I: IntoIterator<Item = &'a Alert>>(iter: I) -> Self {
        let mut stats = Self::default();
        for alert in iter {
            stats.record(alert);
        }
        stats
    }
}
