//! Integration tests for the SQLite backend against a real database file.

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;
use vigil_alert_types::{
    Alert, AlertFilter, AlertId, AlertStatus, AuditAction, AuditEntry, AuditQuery, Category,
    Severity,
};
use vigil_audit::AuditSink;
use vigil_store::{
    AlertRepository, DatabasePool, PoolConfig, SqliteAlertRepository, SqliteAuditSink, StoreError,
};

async fn file_pool(dir: &TempDir) -> DatabasePool {
    let path = dir.path().join("vigil.db");
    let config = PoolConfig::builder()
        .database_path(path.to_string_lossy())
        .max_connections(4)
        .build()
        .unwrap();
    DatabasePool::new(config).await.unwrap()
}

fn alert(id: &str, severity: Severity, category: Category, minutes: i64) -> Alert {
    let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    Alert::new(
        AlertId::from(id),
        severity,
        category,
        format!("finding {}", id),
        base + Duration::minutes(minutes),
    )
}

#[tokio::test]
async fn test_alerts_survive_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let pool = file_pool(&dir).await;
        let repo = SqliteAlertRepository::new(&pool);
        repo.save(alert("ALT-1-0", Severity::High, Category::Cve, 0))
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = file_pool(&dir).await;
    let repo = SqliteAlertRepository::new(&pool);
    let found = repo.find_by_id(&AlertId::from("ALT-1-0")).await.unwrap();

    let found = found.expect("alert persisted across pools");
    assert_eq!(found.severity, Severity::High);
    assert_eq!(found.category, Category::Cve);
    assert_eq!(found.status, AlertStatus::New);
    assert_eq!(found.description, "finding ALT-1-0");
}

#[tokio::test]
async fn test_duplicate_id_rejected() {
    let dir = TempDir::new().unwrap();
    let pool = file_pool(&dir).await;
    let repo = SqliteAlertRepository::new(&pool);

    repo.save(alert("ALT-1-0", Severity::Low, Category::S3, 0))
        .await
        .unwrap();
    let err = repo
        .save(alert("ALT-1-0", Severity::High, Category::Iam, 1))
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::Duplicate(id) if id == "ALT-1-0"));
}

#[tokio::test]
async fn test_find_all_filters_and_orders_newest_first() {
    let dir = TempDir::new().unwrap();
    let pool = file_pool(&dir).await;
    let repo = SqliteAlertRepository::new(&pool);

    repo.save(alert("ALT-1-0", Severity::High, Category::Cve, 0)).await.unwrap();
    repo.save(alert("ALT-2-0", Severity::Low, Category::Cve, 5)).await.unwrap();
    repo.save(alert("ALT-3-0", Severity::High, Category::Network, 10)).await.unwrap();

    let all = repo.find_all(&AlertFilter::all()).await.unwrap();
    let ids: Vec<&str> = all.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["ALT-3-0", "ALT-2-0", "ALT-1-0"]);

    let cases = vec![
        (AlertFilter::all().with_severity(Severity::High), vec!["ALT-3-0", "ALT-1-0"]),
        (AlertFilter::all().with_category(Category::Cve), vec!["ALT-2-0", "ALT-1-0"]),
        (
            AlertFilter::all()
                .with_severity(Severity::High)
                .with_category(Category::Cve),
            vec!["ALT-1-0"],
        ),
        (AlertFilter::all().with_status(AlertStatus::Resolved), vec![]),
    ];

    for (filter, expected) in cases {
        let found = repo.find_all(&filter).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, expected, "filter {:?}", filter);
    }
}

#[tokio::test]
async fn test_update_status_and_delete() {
    let dir = TempDir::new().unwrap();
    let pool = file_pool(&dir).await;
    let repo = SqliteAlertRepository::new(&pool);
    let id = AlertId::from("ALT-1-0");

    let created = repo
        .save(alert("ALT-1-0", Severity::Medium, Category::Activity, 0))
        .await
        .unwrap();
    let later = created.created_at + Duration::seconds(30);

    let updated = repo
        .update_status(&id, AlertStatus::Acknowledged, later)
        .await
        .unwrap();
    assert_eq!(updated.status, AlertStatus::Acknowledged);
    assert_eq!(updated.updated_at, later);
    assert_eq!(updated.created_at, created.created_at);

    repo.delete(&id).await.unwrap();
    assert!(repo.find_by_id(&id).await.unwrap().is_none());

    let err = repo.delete(&id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    let err = repo
        .update_status(&id, AlertStatus::Resolved, later)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_audit_sink_round_trip_and_query() {
    let dir = TempDir::new().unwrap();
    let pool = file_pool(&dir).await;
    let sink = SqliteAuditSink::new(&pool);

    let created = AuditEntry::builder(AuditAction::AlertCreated)
        .alert_id(AlertId::from("ALT-1-0"))
        .new_status(AlertStatus::New)
        .detail("severity", "High")
        .build();
    let updated = AuditEntry::builder(AuditAction::StatusUpdated)
        .alert_id(AlertId::from("ALT-1-0"))
        .previous_status(AlertStatus::New)
        .new_status(AlertStatus::Acknowledged)
        .build();
    let failed = AuditEntry::builder(AuditAction::AlertCreationFailed)
        .error(&"Finding description is required")
        .build();

    sink.append(created.clone()).await.unwrap();
    sink.append(updated.clone()).await.unwrap();
    sink.append(failed.clone()).await.unwrap();

    let all = sink.query(&AuditQuery::all()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, failed.id);
    assert_eq!(all[2], created);
    assert_eq!(all[0].detail_str("error"), Some("Finding description is required"));

    let for_alert = sink
        .query(&AuditQuery::all().with_alert_id("ALT-1-0"))
        .await
        .unwrap();
    assert_eq!(for_alert.len(), 2);
    assert_eq!(for_alert[0].previous_status, Some(AlertStatus::New));

    let limited = sink
        .query(&AuditQuery::all().with_action(AuditAction::AlertCreated).with_limit(1))
        .await
        .unwrap();
    assert_eq!(limited, vec![created]);
}
