//! Migration runner with a per-module history table.
//!
//! Each module gets its own history table named `blog_migrations__<prefix>__<hash8>`,
//! where `<hash8>` is derived from the module name via `xxh3_64`, so two modules
//! can ship migrations with the same name without clashing.
//!
//! Pending migrations are applied in name order. Each `up()` and its history
//! record run inside one transaction.

use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, ExecResult, FromQueryResult,
    Statement, TransactionTrait,
};
use sea_orm_migration::MigrationTrait;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to create migration table for module '{module}': {source}")]
    CreateTable { module: String, source: DbErr },

    #[error("failed to query migration history for module '{module}': {source}")]
    QueryHistory { module: String, source: DbErr },

    #[error("migration '{migration}' failed for module '{module}': {source}")]
    MigrationFailed {
        module: String,
        migration: String,
        source: DbErr,
    },

    #[error("failed to record migration '{migration}' for module '{module}': {source}")]
    RecordFailed {
        module: String,
        migration: String,
        source: DbErr,
    },

    #[error("duplicate migration name '{name}' for module '{module}'")]
    DuplicateMigrationName { module: String, name: String },
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Default)]
pub struct MigrationResult {
    pub applied: usize,
    pub skipped: usize,
    pub applied_names: Vec<String>,
}

#[derive(Debug, FromQueryResult)]
struct MigrationRecord {
    version: String,
}

/// Anything outside `[a-zA-Z0-9_]` becomes `_`.
fn sanitize_module_name(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() { "_".to_owned() } else { out }
}

/// Capped to the 63-byte Postgres identifier limit.
fn migration_table_name(module_name: &str) -> String {
    const PREFIX: &str = "blog_migrations__";
    const SEP: &str = "__";
    const HASH_LEN: usize = 8;
    const PG_IDENT_MAX: usize = 63;

    let sanitized = sanitize_module_name(module_name);
    let hash = xxh3_64(module_name.as_bytes());
    let hash8 = format!("{hash:016x}")[..HASH_LEN].to_owned();

    let max_prefix_len = PG_IDENT_MAX.saturating_sub(PREFIX.len() + SEP.len() + HASH_LEN);
    let prefix_part = if sanitized.len() > max_prefix_len {
        sanitized[..max_prefix_len].to_owned()
    } else {
        sanitized
    };

    format!("{PREFIX}{prefix_part}{SEP}{hash8}")
}

fn quote_ident(backend: DatabaseBackend, ident: &str) -> String {
    match backend {
        DatabaseBackend::MySql => format!("`{ident}`"),
        DatabaseBackend::Postgres | DatabaseBackend::Sqlite => format!("\"{ident}\""),
    }
}

async fn ensure_migration_table(
    conn: &impl ConnectionTrait,
    table_name: &str,
    module_name: &str,
) -> Result<(), MigrationError> {
    let backend = conn.get_database_backend();
    let table = quote_ident(backend, table_name);

    let sql = match backend {
        DatabaseBackend::Postgres => format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                version VARCHAR(255) PRIMARY KEY,
                applied_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
            )"
        ),
        DatabaseBackend::MySql => format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                version VARCHAR(255) PRIMARY KEY,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )"
        ),
        DatabaseBackend::Sqlite => format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                version TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )"
        ),
    };

    conn.execute(Statement::from_string(backend, sql))
        .await
        .map_err(|e| MigrationError::CreateTable {
            module: module_name.to_owned(),
            source: e,
        })?;

    Ok(())
}

async fn get_applied_migrations(
    conn: &impl ConnectionTrait,
    table_name: &str,
    module_name: &str,
) -> Result<HashSet<String>, MigrationError> {
    let backend = conn.get_database_backend();
    let sql = format!(
        "SELECT version FROM {}",
        quote_ident(backend, table_name)
    );

    let records: Vec<MigrationRecord> =
        MigrationRecord::find_by_statement(Statement::from_string(backend, sql))
            .all(conn)
            .await
            .map_err(|e| MigrationError::QueryHistory {
                module: module_name.to_owned(),
                source: e,
            })?;

    Ok(records.into_iter().map(|r| r.version).collect())
}

async fn record_migration(
    conn: &impl ConnectionTrait,
    table_name: &str,
    module_name: &str,
    migration_name: &str,
) -> Result<ExecResult, MigrationError> {
    let backend = conn.get_database_backend();
    let table = quote_ident(backend, table_name);

    let sql = match backend {
        DatabaseBackend::Postgres | DatabaseBackend::Sqlite => {
            format!("INSERT INTO {table} (version) VALUES ($1)")
        }
        DatabaseBackend::MySql => format!("INSERT INTO {table} (version) VALUES (?)"),
    };

    conn.execute(Statement::from_sql_and_values(
        backend,
        &sql,
        [migration_name.into()],
    ))
    .await
    .map_err(|e| MigrationError::RecordFailed {
        module: module_name.to_owned(),
        migration: migration_name.to_owned(),
        source: e,
    })
}

/// Apply the pending migrations of `module_name`.
///
/// # Errors
/// Returns `MigrationError` if the history table cannot be created or read,
/// a name is duplicated, or any migration fails (that migration is rolled back).
pub async fn run_migrations_for_module(
    conn: &DatabaseConnection,
    module_name: &str,
    migrations: Vec<Box<dyn MigrationTrait>>,
) -> Result<MigrationResult, MigrationError> {
    run_module_migrations(conn, module_name, migrations).await
}

/// Same as [`run_migrations_for_module`] with a fixed `_test` history table.
///
/// # Errors
/// See [`run_migrations_for_module`].
pub async fn run_migrations_for_testing(
    conn: &DatabaseConnection,
    migrations: Vec<Box<dyn MigrationTrait>>,
) -> Result<MigrationResult, MigrationError> {
    run_module_migrations(conn, "_test", migrations).await
}

async fn run_module_migrations<C>(
    conn: &C,
    module_name: &str,
    migrations: Vec<Box<dyn MigrationTrait>>,
) -> Result<MigrationResult, MigrationError>
where
    C: ConnectionTrait + TransactionTrait,
{
    if migrations.is_empty() {
        debug!(module = module_name, "No migrations to run");
        return Ok(MigrationResult::default());
    }

    let mut seen = HashSet::new();
    for m in &migrations {
        if !seen.insert(m.name().to_owned()) {
            return Err(MigrationError::DuplicateMigrationName {
                module: module_name.to_owned(),
                name: m.name().to_owned(),
            });
        }
    }

    let table_name = migration_table_name(module_name);
    ensure_migration_table(conn, &table_name, module_name).await?;
    let applied = get_applied_migrations(conn, &table_name, module_name).await?;

    let mut sorted = migrations;
    sorted.sort_by(|a, b| a.name().cmp(b.name()));

    let mut result = MigrationResult::default();

    for migration in sorted {
        let name = migration.name().to_owned();

        if applied.contains(&name) {
            debug!(module = module_name, migration = %name, "Migration already applied, skipping");
            result.skipped += 1;
            continue;
        }

        info!(module = module_name, migration = %name, "Applying migration");

        let failed = |e: DbErr| MigrationError::MigrationFailed {
            module: module_name.to_owned(),
            migration: name.clone(),
            source: e,
        };

        let txn = conn.begin().await.map_err(failed)?;

        let manager = sea_orm_migration::SchemaManager::new(&txn);
        let res: Result<(), MigrationError> = async {
            migration.up(&manager).await.map_err(failed)?;
            record_migration(&txn, &table_name, module_name, &name).await?;
            Ok(())
        }
        .await;

        match res {
            Ok(()) => txn.commit().await.map_err(failed)?,
            Err(err) => {
                _ = txn.rollback().await;
                return Err(err);
            }
        }

        result.applied += 1;
        result.applied_names.push(name);
    }

    info!(
        module = module_name,
        applied = result.applied,
        skipped = result.skipped,
        "Migration run complete"
    );

    Ok(result)
}

/// Names of migrations not yet applied for `module_name`, without applying them.
///
/// # Errors
/// Returns `MigrationError::QueryHistory` if the history cannot be read.
pub async fn get_pending_migrations(
    conn: &DatabaseConnection,
    module_name: &str,
    migrations: &[Box<dyn MigrationTrait>],
) -> Result<Vec<String>, MigrationError> {
    if migrations.is_empty() {
        return Ok(vec![]);
    }

    let table_name = migration_table_name(module_name);
    let backend = conn.get_database_backend();
    let history_err = |e: DbErr| MigrationError::QueryHistory {
        module: module_name.to_owned(),
        source: e,
    };

    let table_exists = match backend {
        DatabaseBackend::Postgres | DatabaseBackend::MySql => {
            let sql = format!(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = '{table_name}'"
            );
            let row = conn
                .query_one(Statement::from_string(backend, sql))
                .await
                .map_err(history_err)?;
            row.and_then(|r| r.try_get_by_index::<i64>(0).ok())
                .is_some_and(|c| c > 0)
        }
        DatabaseBackend::Sqlite => {
            let sql = format!(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='{table_name}'"
            );
            let row = conn
                .query_one(Statement::from_string(backend, sql))
                .await
                .map_err(history_err)?;
            row.and_then(|r| r.try_get_by_index::<i32>(0).ok())
                .is_some_and(|c| c > 0)
        }
    };

    if !table_exists {
        return Ok(migrations.iter().map(|m| m.name().to_owned()).collect());
    }

    let applied = get_applied_migrations(conn, &table_name, module_name).await?;

    Ok(migrations
        .iter()
        .filter(|m| !applied.contains(m.name()))
        .map(|m| m.name().to_owned())
        .collect())
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use sea_orm_migration::prelude::*;

    #[test]
    fn test_sanitize_replaces_non_identifier_chars() {
        assert_eq!(sanitize_module_name("blog"), "blog");
        assert_eq!(sanitize_module_name("blog-posts"), "blog_posts");
        assert_eq!(sanitize_module_name("blog.posts/v2"), "blog_posts_v2");
        assert_eq!(sanitize_module_name(""), "_");
    }

    #[test]
    fn test_table_name_is_deterministic_and_bounded() {
        let a = migration_table_name("blog");
        assert_eq!(a, migration_table_name("blog"));
        assert!(a.starts_with("blog_migrations__blog__"));

        let long = "a-very-long-module-name/with.weird.chars/and-more-and-more-and-more";
        assert!(migration_table_name(long).len() <= 63);
    }

    struct TestMigration {
        name: String,
    }

    impl MigrationName for TestMigration {
        fn name(&self) -> &str {
            &self.name
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for TestMigration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            let backend = manager.get_database_backend();
            let table_name = format!("test_{}", self.name);
            let sql = format!("CREATE TABLE IF NOT EXISTS \"{table_name}\" (id INTEGER PRIMARY KEY)");
            manager
                .get_connection()
                .execute(Statement::from_string(backend, sql))
                .await?;
            Ok(())
        }

        async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
            Ok(())
        }
    }

    fn boxed(names: &[&str]) -> Vec<Box<dyn MigrationTrait>> {
        names
            .iter()
            .map(|n| {
                Box::new(TestMigration {
                    name: (*n).to_owned(),
                }) as Box<dyn MigrationTrait>
            })
            .collect()
    }

    #[cfg(feature = "sqlite")]
    mod sqlite_tests {
        use super::*;
        use crate::{ConnectOpts, connect_db};

        async fn setup_test_db() -> DatabaseConnection {
            connect_db("sqlite::memory:", ConnectOpts::default())
                .await
                .expect("Failed to create test database")
                .sea()
        }

        #[tokio::test]
        async fn test_empty_list_is_a_noop() {
            let db = setup_test_db().await;
            let result = run_migrations_for_module(&db, "blog", vec![])
                .await
                .expect("Migration should succeed");
            assert_eq!(result.applied, 0);
            assert_eq!(result.skipped, 0);
        }

        #[tokio::test]
        async fn test_second_run_skips_applied() {
            let db = setup_test_db().await;

            let first = run_migrations_for_module(&db, "blog", boxed(&["m001"]))
                .await
                .expect("first run");
            assert_eq!(first.applied, 1);

            let second = run_migrations_for_module(&db, "blog", boxed(&["m001"]))
                .await
                .expect("second run");
            assert_eq!(second.applied, 0);
            assert_eq!(second.skipped, 1);
        }

        #[tokio::test]
        async fn test_applies_in_name_order() {
            let db = setup_test_db().await;
            let result = run_migrations_for_module(&db, "order", boxed(&["m003", "m001", "m002"]))
                .await
                .expect("run");
            assert_eq!(result.applied_names, vec!["m001", "m002", "m003"]);
        }

        #[tokio::test]
        async fn test_duplicate_names_are_rejected() {
            let db = setup_test_db().await;
            let err = run_migrations_for_module(&db, "dup", boxed(&["m001", "m001"]))
                .await
                .expect_err("duplicates must fail");
            assert!(matches!(
                err,
                MigrationError::DuplicateMigrationName { ref name, .. } if name == "m001"
            ));
        }

        #[tokio::test]
        async fn test_pending_shrinks_as_migrations_apply() {
            let db = setup_test_db().await;
            let all = boxed(&["m001", "m002"]);

            let pending = get_pending_migrations(&db, "pending", &all)
                .await
                .expect("pending");
            assert_eq!(pending.len(), 2);

            run_migrations_for_module(&db, "pending", boxed(&["m001"]))
                .await
                .expect("run");

            let pending = get_pending_migrations(&db, "pending", &all)
                .await
                .expect("pending");
            assert_eq!(pending, vec!["m002"]);
        }

        #[tokio::test]
        async fn test_testing_entry_point_uses_own_table() {
            let db = setup_test_db().await;
            let result = run_migrations_for_testing(&db, boxed(&["m001"]))
                .await
                .expect("run");
            assert_eq!(result.applied, 1);
        }
    }
}
