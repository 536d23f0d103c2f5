use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::{Config, StorageBackend};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid acquire_timeout_secs: {0}. Must be at least 1")]
    InvalidAcquireTimeout(u64),
}

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "PROCMON_";

/// Project configuration file, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".process-monitor/config.yaml";

/// Optional project-local overrides, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".process-monitor/local.yaml";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .process-monitor/config.yaml
    /// 3. .process-monitor/local.yaml (optional)
    /// 4. Environment variables (PROCMON_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        Self::load_with(None)
    }

    /// Same as [`ConfigLoader::load`], with an explicit file merged after the
    /// project files and before the environment.
    pub fn load_with(extra: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(PROJECT_CONFIG_PATH))
            .merge(Yaml::file(LOCAL_CONFIG_PATH));

        if let Some(path) = extra {
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        // The database section only matters when sqlite is selected
        if config.storage.backend == StorageBackend::Sqlite {
            if config.database.path.is_empty() {
                return Err(ConfigError::EmptyDatabasePath);
            }

            if config.database.max_connections == 0 {
                return Err(ConfigError::InvalidMaxConnections(
                    config.database.max_connections,
                ));
            }

            if config.database.acquire_timeout_secs == 0 {
                return Err(ConfigError::InvalidAcquireTimeout(
                    config.database.acquire_timeout_secs,
                ));
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.database.path, ".process-monitor/processes.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
storage:
  backend: memory
database:
  path: /custom/path.db
  max_connections: 2
logging:
  level: debug
  format: json
  log_dir: /var/log/process-monitor
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.database.busy_timeout_secs, 30);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(
            config.logging.log_dir.as_deref(),
            Some("/var/log/process-monitor")
        );

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            std::fs::create_dir_all(jail.directory().join(".process-monitor")).unwrap();
            jail.create_file(PROJECT_CONFIG_PATH, "logging:\n  level: debug\n")?;
            jail.create_file("custom.yaml", "logging:\n  level: warn\n")?;

            let config = ConfigLoader::load_with(Some(Path::new("custom.yaml")))
                .expect("config should load");
            assert_eq!(config.logging.level, "warn");
            assert_eq!(config.logging.format, "pretty");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_with_invalid_values_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.yaml", "logging:\n  level: loud\n")?;

            let err = ConfigLoader::load_with(Some(Path::new("custom.yaml"))).unwrap_err();
            assert!(err.to_string().contains("Invalid log level: loud"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_project_file() {
        Jail::expect_with(|jail| {
            std::fs::create_dir_all(jail.directory().join(".process-monitor")).unwrap();
            jail.create_file(
                PROJECT_CONFIG_PATH,
                "database:\n  path: from-file.db\nlogging:\n  level: debug\n",
            )?;
            jail.set_env("PROCMON_LOGGING__LEVEL", "error");
            jail.set_env("PROCMON_STORAGE__BACKEND", "memory");

            let config = ConfigLoader::load().expect("config should load");
            assert_eq!(config.database.path, "from-file.db");
            assert_eq!(config.logging.level, "error");
            assert_eq!(config.storage.backend, StorageBackend::Memory);
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        Jail::expect_with(|_jail| {
            let err = ConfigLoader::load_with(Some(Path::new("nope.yaml"))).unwrap_err();
            assert!(err.to_string().contains("nope.yaml"));
            Ok(())
        });
    }

    #[test]
    fn test_validate_empty_database_path() {
        let mut config = Config::default();
        config.database.path = String::new();

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));

        // Irrelevant for the memory backend
        config.storage.backend = StorageBackend::Memory;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_max_connections() {
        let mut config = Config::default();
        config.database.max_connections = 0;

        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogFormat(format)) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }
}
