//! SQLite connection pool and migration runner for estante.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

const MAX_CONNECTIONS: u32 = 5;

const MIGRATIONS_TABLE_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// A single SQL migration contributed by a module.
///
/// Migrations are applied exactly once, in the order the registry collects
/// them, and recorded in the `_migrations` table keyed by (module, id).
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// SQLite connection pool for the record store.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    async fn new(options: SqliteConnectOptions, max: Option<u32>) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max.unwrap_or(MAX_CONNECTIONS))
            .connect_with(options)
            .await
            .context("failed to open SQLite database")?;
        Ok(Self { pool })
    }

    /// Open the database file at the given path, creating it if missing.
    pub async fn connect(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let options = Self::base_options()
            .filename(path.as_ref())
            .create_if_missing(true);
        Self::new(options, None).await
    }

    /// Open an in-memory database.
    ///
    /// Note:
    /// - In-memory databases are destroyed when the connection closes.
    /// - Not gated behind `#[cfg(test)]` so downstream crates can use it in
    ///   their own tests.
    pub async fn connect_in_memory() -> anyhow::Result<Self> {
        let options = Self::base_options().filename(":memory:");
        // An in-memory database must be limited to a single connection,
        // otherwise each pooled connection sees its own empty database.
        Self::new(options, Some(1)).await
    }

    fn base_options() -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            // WAL mode for better concurrent read performance
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            // Waiting writers back off instead of failing immediately
            .busy_timeout(Duration::from_millis(1500))
    }

    /// Apply every not-yet-applied migration, each in its own transaction.
    ///
    /// Idempotent: already-recorded (module, id) pairs are skipped, so calling
    /// this on every startup is safe.
    pub async fn run_migrations(
        &self,
        migrations: &[(String, Migration)],
    ) -> anyhow::Result<()> {
        sqlx::query(MIGRATIONS_TABLE_DDL)
            .execute(&self.pool)
            .await
            .context("failed to create migration tracking table")?;

        for (module, migration) in migrations {
            let applied: Option<(i64,)> =
                sqlx::query_as("SELECT 1 FROM _migrations WHERE module = ? AND id = ?")
                    .bind(module)
                    .bind(migration.id)
                    .fetch_optional(&self.pool)
                    .await
                    .context("failed to query migration tracking table")?;
            if applied.is_some() {
                continue;
            }

            let mut tx = self
                .pool
                .begin()
                .await
                .context("failed to begin migration transaction")?;
            sqlx::raw_sql(migration.up)
                .execute(&mut *tx)
                .await
                .with_context(|| {
                    format!("failed to apply migration '{}/{}'", module, migration.id)
                })?;
            sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
                .bind(module)
                .bind(migration.id)
                .execute(&mut *tx)
                .await
                .context("failed to record applied migration")?;
            tx.commit()
                .await
                .context("failed to commit migration transaction")?;

            tracing::info!(module = module.as_str(), id = migration.id, "applied migration");
        }

        Ok(())
    }

    /// Reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Drain and close the connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_migrations() -> Vec<(String, Migration)> {
        vec![(
            "test".to_string(),
            Migration {
                id: "001_init",
                up: "CREATE TABLE widget (id INTEGER PRIMARY KEY, label TEXT NOT NULL)",
            },
        )]
    }

    #[tokio::test]
    async fn connect_in_memory_opens_pool() {
        let db = Database::connect_in_memory().await.unwrap();
        assert!(!db.pool().is_closed());
        db.close().await;
    }

    #[tokio::test]
    async fn migrations_apply_and_are_idempotent() {
        let db = Database::connect_in_memory().await.unwrap();
        let migrations = test_migrations();
        db.run_migrations(&migrations).await.unwrap();
        // Second run skips the already-recorded migration instead of failing
        // on the duplicate CREATE TABLE.
        db.run_migrations(&migrations).await.unwrap();

        sqlx::query("INSERT INTO widget (label) VALUES ('ok')")
            .execute(db.pool())
            .await
            .unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM widget")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await;
    }

    #[tokio::test]
    async fn applied_migrations_are_recorded() {
        let db = Database::connect_in_memory().await.unwrap();
        db.run_migrations(&test_migrations()).await.unwrap();

        let row: Option<(String, String)> =
            sqlx::query_as("SELECT module, id FROM _migrations")
                .fetch_optional(db.pool())
                .await
                .unwrap();
        assert_eq!(row, Some(("test".to_string(), "001_init".to_string())));
        db.close().await;
    }
}
