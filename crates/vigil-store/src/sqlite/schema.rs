//! Versioned schema for the SQLite backend.

use sqlx::{Row, SqlitePool};
use tracing::debug;

/// One schema step, applied at most once.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub statements: &'static [&'static str],
}

/// All migrations in version order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_alerts",
        statements: &[
            r#"
            CREATE TABLE IF NOT EXISTS alerts (
                id TEXT PRIMARY KEY NOT NULL,
                severity TEXT NOT NULL,
                category TEXT NOT NULL,
                status TEXT NOT NULL,
                description TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_alerts_severity ON alerts (severity)",
            "CREATE INDEX IF NOT EXISTS idx_alerts_status ON alerts (status)",
            "CREATE INDEX IF NOT EXISTS idx_alerts_category ON alerts (category)",
            "CREATE INDEX IF NOT EXISTS idx_alerts_created_at ON alerts (created_at)",
        ],
    },
    Migration {
        version: 2,
        name: "create_audit_log",
        statements: &[
            r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                action TEXT NOT NULL,
                alert_id TEXT,
                previous_status TEXT,
                new_status TEXT,
                details TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_audit_log_alert_id ON audit_log (alert_id)",
            "CREATE INDEX IF NOT EXISTS idx_audit_log_action ON audit_log (action)",
        ],
    },
];

/// Apply pending migrations, returning the versions applied.
pub async fn migrate(pool: &SqlitePool) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _vigil_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    let row = sqlx::query("SELECT MAX(version) AS version FROM _vigil_migrations")
        .fetch_one(pool)
        .await?;
    let current: i64 = row.try_get::<Option<i64>, _>("version")?.unwrap_or(0);

    let mut applied = Vec::new();
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let mut tx = pool.begin().await?;
        for statement in migration.statements {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO _vigil_migrations (version, name, applied_at) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(chrono::Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        debug!(version = migration.version, name = migration.name, "Migration applied");
        applied.push(migration.version);
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_strictly_increase() {
        for pair in MIGRATIONS.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let first = migrate(&pool).await.unwrap();
        assert_eq!(first, vec![1, 2]);

        let second = migrate(&pool).await.unwrap();
        assert!(second.is_empty());
    }
}
