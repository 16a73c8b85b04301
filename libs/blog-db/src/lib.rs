//! Database abstraction for the blog modules.
//!
//! Wraps a `SQLx` pool in a `SeaORM` [`DatabaseConnection`] for `SQLite` and
//! `PostgreSQL`, configured through typed options rather than DSN string
//! manipulation. `SQLite` connections always run with foreign keys enforced,
//! since the blog schema relies on `ON DELETE CASCADE` for junction tables.
//!
//! # Features
//! - `sqlite` (default), `pg`: enable `SQLx` backends
//!
//! # Example
//! ```rust,no_run
//! use blog_db::{ConnectOpts, DbHandle};
//!
//! # async fn demo() -> blog_db::Result<()> {
//! let handle = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//! let conn = handle.sea();
//! # let _ = conn;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(
    not(any(feature = "pg", feature = "sqlite")),
    allow(unused_imports, unused_variables, dead_code, unreachable_code)
)]

pub use sea_orm::ConnectionTrait as DbConnTrait;

pub mod config;
pub mod migration_runner;

mod pool_opts;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use config::DbConfig;

use std::time::Duration;

#[cfg(any(feature = "pg", feature = "sqlite"))]
use pool_opts::ApplyPoolOpts;

#[cfg(feature = "pg")]
use sea_orm::SqlxPostgresConnector;
#[cfg(feature = "sqlite")]
use sea_orm::SqlxSqliteConnector;
#[cfg(feature = "pg")]
use sea_orm::sqlx::postgres::PgPoolOptions;
#[cfg(feature = "sqlite")]
use sea_orm::sqlx::sqlite::SqlitePoolOptions;

use sea_orm::DatabaseConnection;
use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Typed error for the DB handle and helpers.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(any(feature = "pg", feature = "sqlite"))]
    #[error(transparent)]
    Sqlx(#[from] sea_orm::sqlx::Error),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Migration(#[from] migration_runner::MigrationError),
}

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

/// Connection pool options; each driver applies the subset it supports.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to acquire a connection from the pool.
    pub acquire_timeout: Option<Duration>,
    /// Idle timeout before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// `SQLite` busy timeout for file databases, in milliseconds.
    pub busy_timeout_ms: Option<u32>,
    /// For `SQLite` file DSNs, create parent directories if missing.
    pub create_sqlite_dirs: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            busy_timeout_ms: None,
            create_sqlite_dirs: true,
        }
    }
}

/// Main handle.
#[derive(Debug, Clone)]
pub struct DbHandle {
    engine: DbEngine,
    dsn: String,
    sea: DatabaseConnection,
}

#[cfg(feature = "sqlite")]
const DEFAULT_SQLITE_BUSY_TIMEOUT: u32 = 5000;

impl DbHandle {
    /// Detect engine by DSN scheme.
    ///
    /// # Errors
    /// Returns `DbError::UnknownDsn` if the DSN scheme is not recognized.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let s = dsn.trim_start();

        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(dsn.to_owned()))
        }
    }

    /// Connect and build handle.
    ///
    /// # Errors
    /// Returns an error if the connection fails or the DSN is invalid.
    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        match engine {
            #[cfg(feature = "pg")]
            DbEngine::Postgres => {
                let pool = PgPoolOptions::new().apply(&opts).connect(dsn).await?;
                let sea = SqlxPostgresConnector::from_sqlx_postgres_pool(pool);
                tracing::debug!(engine = ?engine, "connected");
                Ok(Self {
                    engine,
                    dsn: dsn.to_owned(),
                    sea,
                })
            }
            #[cfg(not(feature = "pg"))]
            DbEngine::Postgres => Err(DbError::FeatureDisabled("PostgreSQL feature not enabled")),
            #[cfg(feature = "sqlite")]
            DbEngine::Sqlite => {
                let dsn = sqlite::prepare_sqlite_path(dsn, opts.create_sqlite_dirs)?;
                let is_memory = sqlite::is_memory_dsn(&dsn);

                let mut o = SqlitePoolOptions::new().apply(&opts);
                if is_memory {
                    // Every connection to `:memory:` is its own database, so the pool
                    // must hold exactly one connection for the whole process lifetime.
                    o = o
                        .max_connections(1)
                        .min_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None);
                }

                let busy_timeout = opts.busy_timeout_ms.unwrap_or(DEFAULT_SQLITE_BUSY_TIMEOUT);
                o = o.after_connect(move |conn, _meta| {
                    Box::pin(async move {
                        sea_orm::sqlx::query("PRAGMA foreign_keys = ON")
                            .execute(&mut *conn)
                            .await?;

                        let journal_mode = if is_memory { "DELETE" } else { "WAL" };
                        let stmt = format!("PRAGMA journal_mode = {journal_mode}");
                        sea_orm::sqlx::query(&stmt).execute(&mut *conn).await?;

                        if !is_memory {
                            // PRAGMA takes no bound parameters.
                            let stmt = format!("PRAGMA busy_timeout = {busy_timeout}");
                            sea_orm::sqlx::query(&stmt).execute(&mut *conn).await?;
                        }

                        Ok(())
                    })
                });

                let pool = o.connect(&dsn).await?;
                let sea = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
                tracing::debug!(engine = ?engine, memory = is_memory, "connected");

                Ok(Self { engine, dsn, sea })
            }
            #[cfg(not(feature = "sqlite"))]
            DbEngine::Sqlite => Err(DbError::FeatureDisabled("SQLite feature not enabled")),
        }
    }

    /// Connect using a [`DbConfig`].
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the connection fails.
    pub async fn from_config(cfg: &DbConfig) -> Result<Self> {
        cfg.validate()?;
        Self::connect(&cfg.dsn, cfg.connect_opts()).await
    }

    #[must_use]
    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    #[must_use]
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// The `SeaORM` connection. Cloning is cheap; it shares the pool.
    #[must_use]
    pub fn sea(&self) -> DatabaseConnection {
        self.sea.clone()
    }
}

/// Shorthand for [`DbHandle::connect`].
///
/// # Errors
/// Returns an error if the connection fails or the DSN is invalid.
pub async fn connect_db(dsn: &str, opts: ConnectOpts) -> Result<DbHandle> {
    DbHandle::connect(dsn, opts).await
}
