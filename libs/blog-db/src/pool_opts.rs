//! Pool options application trait shared by the backends.

use crate::ConnectOpts;

/// Applies [`ConnectOpts`] to a backend-specific pool builder.
pub trait ApplyPoolOpts<T> {
    fn apply(self, opts: &ConnectOpts) -> Self;
}

#[cfg(feature = "pg")]
impl ApplyPoolOpts<sea_orm::sqlx::postgres::PgPoolOptions>
    for sea_orm::sqlx::postgres::PgPoolOptions
{
    fn apply(mut self, opts: &ConnectOpts) -> Self {
        if let Some(n) = opts.max_conns {
            self = self.max_connections(n);
        }
        if let Some(n) = opts.min_conns {
            self = self.min_connections(n);
        }
        if let Some(t) = opts.acquire_timeout {
            self = self.acquire_timeout(t);
        }
        if let Some(t) = opts.idle_timeout {
            self = self.idle_timeout(t);
        }
        self
    }
}

#[cfg(feature = "sqlite")]
impl ApplyPoolOpts<sea_orm::sqlx::sqlite::SqlitePoolOptions>
    for sea_orm::sqlx::sqlite::SqlitePoolOptions
{
    fn apply(mut self, opts: &ConnectOpts) -> Self {
        if let Some(n) = opts.max_conns {
            self = self.max_connections(n);
        }
        if let Some(n) = opts.min_conns {
            self = self.min_connections(n);
        }
        if let Some(t) = opts.acquire_timeout {
            self = self.acquire_timeout(t);
        }
        if let Some(t) = opts.idle_timeout {
            self = self.idle_timeout(t);
        }
        self
    }
}
