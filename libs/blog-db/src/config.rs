//! Typed database configuration.
//!
//! The configuration is plain serde data so it can be layered with `figment`
//! (defaults, YAML file, `BLOG__*` environment) by the embedding application.

use std::time::Duration;

use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::{ConnectOpts, DbError, DbHandle, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    /// `sqlite:...` or `postgres://...`.
    pub dsn: String,
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Option<Duration>,
    pub busy_timeout_ms: Option<u32>,
    pub create_sqlite_dirs: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            dsn: "sqlite::memory:".to_owned(),
            max_conns: None,
            min_conns: None,
            acquire_timeout: None,
            idle_timeout: None,
            busy_timeout_ms: None,
            create_sqlite_dirs: true,
        }
    }
}

impl DbConfig {
    /// Extract a `DbConfig` from the given key of a figment.
    ///
    /// # Errors
    /// Returns `DbError::InvalidConfig` if the section cannot be deserialized.
    pub fn from_figment(figment: &Figment, key: &str) -> Result<Self> {
        let cfg: Self = figment
            .extract_inner(key)
            .map_err(|e| DbError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// Returns `DbError::InvalidConfig` on an empty DSN or inverted pool bounds,
    /// and `DbError::UnknownDsn` on an unsupported scheme.
    pub fn validate(&self) -> Result<()> {
        if self.dsn.trim().is_empty() {
            return Err(DbError::InvalidConfig("dsn must not be empty".to_owned()));
        }
        DbHandle::detect(&self.dsn)?;
        if let (Some(min), Some(max)) = (self.min_conns, self.max_conns)
            && min > max
        {
            return Err(DbError::InvalidConfig(format!(
                "min_conns ({min}) exceeds max_conns ({max})"
            )));
        }
        Ok(())
    }

    /// Pool options derived from this config, falling back to [`ConnectOpts::default`].
    #[must_use]
    pub fn connect_opts(&self) -> ConnectOpts {
        let defaults = ConnectOpts::default();
        ConnectOpts {
            max_conns: self.max_conns.or(defaults.max_conns),
            min_conns: self.min_conns.or(defaults.min_conns),
            acquire_timeout: self.acquire_timeout.or(defaults.acquire_timeout),
            idle_timeout: self.idle_timeout.or(defaults.idle_timeout),
            busy_timeout_ms: self.busy_timeout_ms.or(defaults.busy_timeout_ms),
            create_sqlite_dirs: self.create_sqlite_dirs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Serialized;

    #[test]
    fn test_defaults_to_in_memory_sqlite() {
        let cfg = DbConfig::default();
        assert_eq!(cfg.dsn, "sqlite::memory:");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.connect_opts().max_conns, Some(10));
    }

    #[test]
    fn test_extracts_section_with_humantime_durations() {
        let figment = Figment::new().merge(Serialized::defaults(serde_json::json!({
            "database": {
                "dsn": "sqlite://data/blog.db",
                "max_conns": 4,
                "acquire_timeout": "5s"
            }
        })));

        let cfg = DbConfig::from_figment(&figment, "database")
            .unwrap_or_else(|e| panic!("config should parse: {e}"));
        assert_eq!(cfg.max_conns, Some(4));
        assert_eq!(cfg.acquire_timeout, Some(Duration::from_secs(5)));
        assert_eq!(
            cfg.connect_opts().acquire_timeout,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_rejects_inverted_pool_bounds() {
        let cfg = DbConfig {
            max_conns: Some(1),
            min_conns: Some(5),
            ..DbConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(DbError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_unknown_scheme() {
        let cfg = DbConfig {
            dsn: "oracle://db".to_owned(),
            ..DbConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(DbError::UnknownDsn(_))));
    }
}
