//! The alert lifecycle engine.

use crate::classify::classify;
use crate::error::{EngineError, EngineResult};
use crate::id::IdGenerator;
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn, Instrument, Span};
use vigil_alert_types::{
    Alert, AlertFilter, AlertId, AlertStatus, AuditAction, AuditEntry, AuditQuery, Category,
    Finding, FindingField, Statistics,
};
use vigil_audit::AuditRecorder;
use vigil_common_log::spans::{alert_span, record_error, store_span, Timer};
use vigil_store::AlertRepository;

/// Drives alerts from creation to resolution.
///
/// Holds only its collaborators: all alert state lives in the repository.
/// Cloning is cheap and every clone shares the same id generator.
#[derive(Clone)]
pub struct LifecycleEngine {
    repo: Arc<dyn AlertRepository>,
    audit: AuditRecorder,
    ids: Arc<IdGenerator>,
}

impl LifecycleEngine {
    /// Create an engine over a repository and an audit recorder.
    pub fn new(repo: Arc<dyn AlertRepository>, audit: AuditRecorder) -> Self {
        Self {
            repo,
            audit,
            ids: Arc::new(IdGenerator::new()),
        }
    }

    fn store(&self, operation: &'static str) -> Span {
        store_span(self.repo.name(), operation)
    }

    /// Validate a finding, classify it and persist it as a `New` alert.
    pub async fn create_alert(&self, finding: Finding) -> EngineResult<Alert> {
        async move {
            let timer = Timer::start("create_alert");
            let result = self.try_create(&finding).await;

            match &result {
                Ok(alert) => {
                    info!(
                        id = %alert.id,
                        severity = %alert.severity,
                        category = %alert.category,
                        "Alert created"
                    );
                    self.audit
                        .record(
                            AuditEntry::builder(AuditAction::AlertCreated)
                                .alert_id(alert.id.clone())
                                .new_status(alert.status)
                                .detail("category", alert.category)
                                .detail("severity", alert.severity)
                                .build(),
                        )
                        .await;
                }
                Err(e) => {
                    record_error(e);
                    warn!(error = %e, "Alert creation failed");
                    let mut entry = AuditEntry::builder(AuditAction::AlertCreationFailed).error(e);
                    if let Some(category) = &finding.category {
                        entry = entry.detail("category", category);
                    }
                    self.audit.record(entry.build()).await;
                }
            }

            timer.finish();
            result
        }
        .instrument(alert_span("create_alert", None))
        .await
    }

    async fn try_create(&self, finding: &Finding) -> EngineResult<Alert> {
        let raw_category = finding
            .category
            .as_ref()
            .ok_or_else(|| EngineError::validation("Finding category is required"))?;
        let category = raw_category
            .as_text()
            .and_then(|c| Category::from_str(c).ok())
            .ok_or_else(|| EngineError::validation(format!("Invalid category: {}", raw_category)))?;

        let description = finding
            .description
            .as_ref()
            .and_then(FindingField::as_text)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| EngineError::validation("Finding description is required"))?;

        let hint = finding.severity.as_ref().and_then(FindingField::as_text);
        let severity = classify(hint, description);
        let alert = Alert::new(
            self.ids.next_id(),
            severity,
            category,
            description,
            Utc::now(),
        );

        Ok(self.repo.save(alert).instrument(self.store("save")).await?)
    }

    /// Move an alert to `new_status` if the transition table allows it.
    ///
    /// An unrecognised status string is reported as an invalid transition.
    pub async fn update_alert_status(&self, id: &str, new_status: &str) -> EngineResult<Alert> {
        async move {
            let alert_id = AlertId::from(id);

            let lookup = self.repo.find_by_id(&alert_id);
            let current = match lookup.instrument(self.store("find_by_id")).await {
                Ok(Some(alert)) => alert,
                Ok(None) => {
                    let err = EngineError::NotFound(id.to_string());
                    return self.update_failed(alert_id, None, new_status, err).await;
                }
                Err(e) => return self.update_failed(alert_id, None, new_status, e.into()).await,
            };
            let previous = current.status;

            let target = match AlertStatus::from_str(new_status) {
                Ok(status) if previous.can_transition_to(status) => status,
                _ => {
                    let err = EngineError::transition(previous, new_status);
                    return self
                        .update_failed(alert_id, Some(previous), new_status, err)
                        .await;
                }
            };

            let update = self.repo.update_status(&alert_id, target, Utc::now());
            match update.instrument(self.store("update_status")).await {
                Ok(updated) => {
                    info!(from = %previous, to = %target, "Alert status updated");
                    self.audit
                        .record(
                            AuditEntry::builder(AuditAction::StatusUpdated)
                                .alert_id(alert_id)
                                .previous_status(previous)
                                .new_status(target)
                                .build(),
                        )
                        .await;
                    Ok(updated)
                }
                Err(e) => {
                    self.update_failed(alert_id, Some(previous), new_status, e.into())
                        .await
                }
            }
        }
        .instrument(alert_span("update_alert_status", Some(id)))
        .await
    }

    async fn update_failed<T>(
        &self,
        alert_id: AlertId,
        previous: Option<AlertStatus>,
        requested: &str,
        err: EngineError,
    ) -> EngineResult<T> {
        record_error(&err);
        warn!(error = %err, requested, "Alert status update failed");

        let mut entry = AuditEntry::builder(AuditAction::StatusUpdateFailed)
            .alert_id(alert_id)
            .detail("requestedStatus", requested)
            .error(&err);
        if let Some(status) = previous {
            entry = entry.previous_status(status);
        }
        if let Ok(status) = AlertStatus::from_str(requested) {
            entry = entry.new_status(status);
        }
        self.audit.record(entry.build()).await;

        Err(err)
    }

    /// List alerts matching every constraint in `filter`, newest first.
    pub async fn get_alerts(&self, filter: &AlertFilter) -> EngineResult<Vec<Alert>> {
        async move {
            let alerts = self
                .repo
                .find_all(filter)
                .instrument(self.store("find_all"))
                .await?;
            info!(count = alerts.len(), "Alerts listed");
            Ok(alerts)
        }
        .instrument(alert_span("get_alerts", None))
        .await
    }

    /// Fetch one alert.
    pub async fn get_alert_by_id(&self, id: &str) -> EngineResult<Alert> {
        async move {
            self.repo
                .find_by_id(&AlertId::from(id))
                .instrument(self.store("find_by_id"))
                .await?
                .ok_or_else(|| EngineError::NotFound(id.to_string()))
        }
        .instrument(alert_span("get_alert_by_id", Some(id)))
        .await
    }

    /// Delete an alert.
    pub async fn delete_alert(&self, id: &str) -> EngineResult<bool> {
        async move {
            let alert_id = AlertId::from(id);

            let delete = self.repo.delete(&alert_id);
            match delete.instrument(self.store("delete")).await {
                Ok(()) => {
                    info!("Alert deleted");
                    self.audit
                        .record(
                            AuditEntry::builder(AuditAction::AlertDeleted)
                                .alert_id(alert_id)
                                .build(),
                        )
                        .await;
                    Ok(true)
                }
                Err(e) => {
                    let err = EngineError::from(e);
                    record_error(&err);
                    warn!(error = %err, "Alert deletion failed");
                    self.audit
                        .record(
                            AuditEntry::builder(AuditAction::AlertDeletionFailed)
                                .alert_id(alert_id)
                                .error(&err)
                                .build(),
                        )
                        .await;
                    Err(err)
                }
            }
        }
        .instrument(alert_span("delete_alert", Some(id)))
        .await
    }

    /// Count alerts by status, severity and category.
    pub async fn get_statistics(&self) -> EngineResult<Statistics> {
        async move {
            let alerts = self
                .repo
                .find_all(&AlertFilter::all())
                .instrument(self.store("find_all"))
                .await?;
            Ok(alerts.iter().collect())
        }
        .instrument(alert_span("get_statistics", None))
        .await
    }

    /// Read the audit log, newest first.
    pub async fn audit_trail(&self, query: &AuditQuery) -> EngineResult<Vec<AuditEntry>> {
        async move { Ok(self.audit.query(query).await?) }
            .instrument(alert_span("audit_trail", None))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_audit::{AuditSink, MemoryAuditSink};
    use vigil_store::MemoryAlertRepository;

    fn engine() -> (LifecycleEngine, Arc<MemoryAuditSink>) {
        let sink = Arc::new(MemoryAuditSink::new());
        let engine = LifecycleEngine::new(
            Arc::new(MemoryAlertRepository::new()),
            AuditRecorder::new(sink.clone()),
        );
        (engine, sink)
    }

    #[tokio::test]
    async fn test_create_alert_trims_and_classifies() {
        let (engine, _) = engine();

        let alert = engine
            .create_alert(Finding::new("CVE", "  Critical remote exploit found  "))
            .await
            .unwrap();

        assert_eq!(alert.description, "Critical remote exploit found");
        assert_eq!(alert.severity, vigil_alert_types::Severity::High);
        assert_eq!(alert.category, Category::Cve);
        assert_eq!(alert.status, AlertStatus::New);
        assert_eq!(alert.created_at, alert.updated_at);
        assert!(alert.id.as_str().starts_with("ALT-"));
    }

    #[tokio::test]
    async fn test_non_string_severity_hint_is_ignored() {
        let (engine, _) = engine();

        let alert = engine
            .create_alert(Finding {
                severity: Some(FindingField::Other(3.into())),
                ..Finding::new("IAM", "Minor policy recommendation")
            })
            .await
            .unwrap();

        assert_eq!(alert.severity, vigil_alert_types::Severity::Low);
    }

    #[tokio::test]
    async fn test_create_alert_validation() {
        let (engine, sink) = engine();

        let cases = vec![
            (Finding::default(), "Finding category is required"),
            (Finding::new("Cloud", "something"), "Invalid category: Cloud"),
            (Finding::new("cve", "something"), "Invalid category: cve"),
            (Finding::new("IAM", "   "), "Finding description is required"),
            (
                Finding {
                    category: Some(FindingField::Other(7.into())),
                    description: Some("something".into()),
                    ..Default::default()
                },
                "Invalid category: 7",
            ),
            (
                Finding {
                    category: Some("S3".into()),
                    description: Some(FindingField::Other(true.into())),
                    ..Default::default()
                },
                "Finding description is required",
            ),
            (
                Finding {
                    category: Some("IAM".into()),
                    ..Default::default()
                },
                "Finding description is required",
            ),
        ];

        for (finding, message) in cases {
            let err = engine.create_alert(finding).await.unwrap_err();
            assert!(matches!(&err, EngineError::Validation(m) if m == message), "{}", err);
        }

        let failures = sink
            .query(&AuditQuery::all().with_action(AuditAction::AlertCreationFailed))
            .await
            .unwrap();
        assert_eq!(failures.len(), 7);
        assert_eq!(failures[0].detail_str("error"), Some("Finding description is required"));
        assert_eq!(failures[0].detail_str("category"), Some("IAM"));
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let (engine, sink) = engine();
        let alert = engine
            .create_alert(Finding::new("Network", "Open port"))
            .await
            .unwrap();
        let id = alert.id.as_str();

        for status in ["Acknowledged", "In-Progress", "Resolved"] {
            let updated = engine.update_alert_status(id, status).await.unwrap();
            assert_eq!(updated.status.as_ref(), status);
        }

        for status in AlertStatus::all() {
            let err = engine
                .update_alert_status(id, status.as_ref())
                .await
                .unwrap_err();
            assert!(matches!(err, EngineError::InvalidTransition { .. }));
        }

        let updates = sink
            .query(&AuditQuery::all().with_action(AuditAction::StatusUpdated))
            .await
            .unwrap();
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].previous_status, Some(AlertStatus::InProgress));
        assert_eq!(updates[0].new_status, Some(AlertStatus::Resolved));
    }

    #[tokio::test]
    async fn test_unknown_status_is_invalid_transition() {
        let (engine, sink) = engine();
        let alert = engine
            .create_alert(Finding::new("S3", "Bucket policy"))
            .await
            .unwrap();

        let err = engine
            .update_alert_status(alert.id.as_str(), "Closed")
            .await
            .unwrap_err();
        match err {
            EngineError::InvalidTransition { from, to } => {
                assert_eq!(from, "New");
                assert_eq!(to, "Closed");
            }
            other => panic!("unexpected error: {}", other),
        }

        let failed = sink
            .query(&AuditQuery::all().with_action(AuditAction::StatusUpdateFailed))
            .await
            .unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].previous_status, Some(AlertStatus::New));
        assert_eq!(failed[0].new_status, None);
        assert_eq!(failed[0].detail_str("requestedStatus"), Some("Closed"));
    }

    #[tokio::test]
    async fn test_update_missing_alert() {
        let (engine, _) = engine();
        let err = engine
            .update_alert_status("ALT-0-0", "Acknowledged")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(id) if id == "ALT-0-0"));
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let (engine, sink) = engine();
        let alert = engine
            .create_alert(Finding::new("Activity", "Login from new country"))
            .await
            .unwrap();
        let id = alert.id.as_str();

        assert_eq!(engine.get_alert_by_id(id).await.unwrap(), alert);
        assert!(engine.delete_alert(id).await.unwrap());
        assert!(matches!(
            engine.get_alert_by_id(id).await.unwrap_err(),
            EngineError::NotFound(_)
        ));
        assert!(matches!(
            engine.delete_alert(id).await.unwrap_err(),
            EngineError::NotFound(_)
        ));

        let trail = engine
            .audit_trail(&AuditQuery::all().with_alert_id(id))
            .await
            .unwrap();
        let actions: Vec<AuditAction> = trail.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![
                AuditAction::AlertDeletionFailed,
                AuditAction::AlertDeleted,
                AuditAction::AlertCreated
            ]
        );
        assert_eq!(sink.len(), 3);
    }
}
