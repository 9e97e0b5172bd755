//! Runtime configuration for hosts embedding the core.
//!
//! Values come from `ROOMING_*` environment variables. Unset or blank
//! variables fall back to defaults; malformed values are errors.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use crate::model::transaction::{normalize_currency, DEFAULT_CURRENCY};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ROOMING_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "ROOMING_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ROOMING_LOG_DIR";
pub const ENV_DEFAULT_CURRENCY: &str = "ROOMING_DEFAULT_CURRENCY";

/// Configuration rejection for one variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub message: String,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.key, self.message)
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// `None` logs to stderr.
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// `None` uses a private in-memory database.
    pub database_path: Option<PathBuf>,
    pub log: LogConfig,
    pub default_currency: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            log: LogConfig::default(),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl CoreConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads values through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = value(ENV_DB_PATH) {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some(level) = value(ENV_LOG_LEVEL) {
            config.log.level = normalize_level(&level)
                .map_err(|message| ConfigError {
                    key: ENV_LOG_LEVEL,
                    message,
                })?
                .to_string();
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            let dir = normalize_log_dir(&PathBuf::from(dir)).map_err(|message| ConfigError {
                key: ENV_LOG_DIR,
                message,
            })?;
            config.log.dir = Some(dir);
        }
        if let Some(currency) = value(ENV_DEFAULT_CURRENCY) {
            config.default_currency =
                normalize_currency(&currency).map_err(|err| ConfigError {
                    key: ENV_DEFAULT_CURRENCY,
                    message: err.to_string(),
                })?;
        }

        Ok(config)
    }

    /// Opens the configured database with migrations applied.
    pub fn open_database(&self) -> DbResult<Connection> {
        match self.database_path.as_deref() {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_DEFAULT_CURRENCY, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CoreConfig, super::ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.default_currency, "EUR");
        assert!(config.database_path.is_none());
    }

    #[test]
    fn values_are_normalized() {
        let config = config_from(&[
            (ENV_DB_PATH, " /var/lib/rooming/ledger.db "),
            (ENV_LOG_LEVEL, "WARNING"),
            (ENV_LOG_DIR, "/var/log/rooming"),
            (ENV_DEFAULT_CURRENCY, "usd"),
        ])
        .unwrap();

        assert_eq!(
            config.database_path,
            Some(PathBuf::from("/var/lib/rooming/ledger.db"))
        );
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.dir, Some(PathBuf::from("/var/log/rooming")));
        assert_eq!(config.default_currency, "USD");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[(ENV_LOG_LEVEL, "   "), (ENV_DB_PATH, "")]).unwrap();
        assert_eq!(config, CoreConfig::default());
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = config_from(&[(ENV_LOG_DIR, "relative/logs")]).unwrap_err();
        assert_eq!(err.key, ENV_LOG_DIR);

        let err = config_from(&[(ENV_DEFAULT_CURRENCY, "euro")]).unwrap_err();
        assert_eq!(err.key, ENV_DEFAULT_CURRENCY);

        let err = config_from(&[(ENV_LOG_LEVEL, "loud")]).unwrap_err();
        assert_eq!(err.key, ENV_LOG_LEVEL);
    }

    #[test]
    fn default_config_opens_in_memory_database() {
        let conn = CoreConfig::default().open_database().unwrap();
        let version: i64 = conn
            .query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap();
        assert!(version > 0);
    }
}
