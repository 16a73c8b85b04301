//! Composition root: connect, migrate, wire the service.

use std::sync::Arc;

use blog_db::DbHandle;
use blog_db::migration_runner::{MigrationResult, get_pending_migrations, run_migrations_for_module};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::BlogConfig;
use crate::domain::password::Argon2Hasher;
use crate::domain::service::BlogService;
use crate::infra::storage::OrmRepos;
use crate::infra::storage::migrations::Migrator;

/// Name under which the module's migration history is tracked.
pub const MODULE_NAME: &str = "blog";

/// Type alias for the concrete service used with the ORM repositories.
pub type ConcreteBlogService = BlogService<OrmRepos>;

/// A started blog module: an open database with the schema applied.
pub struct Blog {
    db: DbHandle,
    service: ConcreteBlogService,
}

impl Blog {
    /// Connect to the configured database and apply pending migrations.
    ///
    /// # Errors
    /// Fails if the database cannot be reached or a migration fails.
    pub async fn start(cfg: &BlogConfig) -> anyhow::Result<Self> {
        info!("Initializing blog module");

        let db = DbHandle::from_config(&cfg.database).await?;
        debug!(engine = ?db.engine(), "Database connected");

        let result = migrate(&db).await?;
        info!(
            applied = result.applied,
            skipped = result.skipped,
            "Blog schema ready"
        );

        let service = BlogService::new(
            db.sea(),
            OrmRepos::default(),
            Arc::new(Argon2Hasher),
            cfg.service.clone(),
        );
        Ok(Self { db, service })
    }

    #[must_use]
    pub fn service(&self) -> &ConcreteBlogService {
        &self.service
    }

    #[must_use]
    pub fn db(&self) -> &DbHandle {
        &self.db
    }
}

/// Apply the blog migrations through the per-module runner.
///
/// # Errors
/// Returns the runner's error if any migration fails.
pub async fn migrate(db: &DbHandle) -> anyhow::Result<MigrationResult> {
    let result = run_migrations_for_module(&db.sea(), MODULE_NAME, Migrator::migrations()).await?;
    Ok(result)
}

/// Names of migrations not yet applied.
///
/// # Errors
/// Returns the runner's error if the history table cannot be read.
pub async fn pending_migrations(db: &DbHandle) -> anyhow::Result<Vec<String>> {
    let pending = get_pending_migrations(&db.sea(), MODULE_NAME, &Migrator::migrations()).await?;
    Ok(pending)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use tracing_test::traced_test;

    #[tokio::test]
    #[traced_test]
    async fn test_start_applies_every_migration_once() {
        let blog = Blog::start(&BlogConfig::default()).await.unwrap();
        assert!(logs_contain("Blog schema ready"));
        assert!(pending_migrations(blog.db()).await.unwrap().is_empty());

        let again = migrate(blog.db()).await.unwrap();
        assert_eq!(again.applied, 0);
        assert_eq!(again.skipped, Migrator::migrations().len());
    }
}
