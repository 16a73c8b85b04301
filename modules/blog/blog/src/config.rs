//! Module configuration.
//!
//! Layered with figment: built-in defaults, then an optional YAML file, then
//! `BLOG__`-prefixed environment variables (`BLOG__DATABASE__DSN`, ...).

use std::path::Path;

use blog_db::DbConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

pub const ENV_PREFIX: &str = "BLOG__";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    pub database: DbConfig,
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl BlogConfig {
    /// The layered figment without extracting it.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    /// Returns an error if a layer cannot be parsed or the database section is invalid.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::from_figment(&Self::figment(path))
    }

    /// # Errors
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        let cfg: Self = figment.extract()?;
        cfg.database.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_layers() {
        let cfg = BlogConfig::from_figment(&Figment::from(Serialized::defaults(
            BlogConfig::default(),
        )))
        .unwrap();
        assert_eq!(cfg.database.dsn, "sqlite::memory:");
        assert_eq!(cfg.service.password_min_length, 8);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_yaml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "database:\n  dsn: \"sqlite://blog.db\"\n  max_conns: 2\nservice:\n  max_name_length: 40\nlogging:\n  json: true"
        )
        .unwrap();

        let cfg = BlogConfig::load(Some(file.path())).unwrap();
        assert_eq!(cfg.database.dsn, "sqlite://blog.db");
        assert_eq!(cfg.database.max_conns, Some(2));
        assert_eq!(cfg.service.max_name_length, 40);
        assert_eq!(cfg.service.password_min_length, 8);
        assert!(cfg.logging.json);
    }

    #[test]
    fn test_env_overrides_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("blog.yaml", "service:\n  password_min_length: 10\n")?;
            jail.set_env("BLOG__SERVICE__PASSWORD_MIN_LENGTH", "12");
            jail.set_env("BLOG__DATABASE__DSN", "sqlite://env.db");

            let cfg = BlogConfig::load(Some(Path::new("blog.yaml")))
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(cfg.service.password_min_length, 12);
            assert_eq!(cfg.database.dsn, "sqlite://env.db");
            Ok(())
        });
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let figment = Figment::from(Serialized::defaults(BlogConfig::default()))
            .merge(Serialized::defaults(serde_json::json!({ "service": { "bogus": 1 } })));
        assert!(BlogConfig::from_figment(&figment).is_err());
    }
}
