//! Runtime configuration for core callers.
//!
//! # Invariants
//! - Blank environment values behave as if unset.
//! - One bad variable never discards the others; it falls back alone.

use crate::logging::{default_log_level, normalize_level};
use log::warn;
use std::path::PathBuf;

/// Canonical storage key for the persisted task list.
pub const TASKS_STORAGE_KEY: &str = "TASKS";
/// Keys written by older builds, read only when the canonical key is empty.
pub const LEGACY_STORAGE_KEYS: &[&str] = &["tasks"];

pub const ENV_DB_PATH: &str = "TASKPAD_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TASKPAD_LOG_LEVEL";
const DEFAULT_DB_FILE_NAME: &str = "taskpad.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the key-value storage.
    pub db_path: PathBuf,
    pub storage_key: String,
    pub legacy_keys: Vec<String>,
    /// Level used when a caller starts logging without naming one.
    pub log_level: &'static str,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: TASKS_STORAGE_KEY.to_string(),
            legacy_keys: LEGACY_STORAGE_KEYS.iter().map(|k| k.to_string()).collect(),
            log_level: default_log_level(),
        }
    }
}

impl CoreConfig {
    /// Builds configuration from `TASKPAD_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// An unsupported log level keeps the build default and is logged;
    /// the remaining variables still apply.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_blank = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = non_blank(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(ENV_LOG_LEVEL) {
            match normalize_level(&level) {
                Ok(level) => config.log_level = level,
                Err(err) => warn!(
                    "event=config_load module=config status=fallback var={ENV_LOG_LEVEL} \
                     fallback={} error={err}",
                    config.log_level
                ),
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::{default_log_level, CoreConfig, ENV_DB_PATH, ENV_LOG_LEVEL, TASKS_STORAGE_KEY};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_use_canonical_key_and_legacy_fallback() {
        let config = CoreConfig::default();
        assert_eq!(config.storage_key, TASKS_STORAGE_KEY);
        assert_eq!(config.legacy_keys, vec!["tasks".to_string()]);
    }

    #[test]
    fn env_overrides_path_and_level() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/data/tasks.db"),
            (ENV_LOG_LEVEL, "WARNING"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/data/tasks.db"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn blank_env_values_fall_back_to_defaults() {
        let config = CoreConfig::from_lookup(lookup(&[(ENV_DB_PATH, "  ")]));
        assert_eq!(config.db_path, CoreConfig::default().db_path);
    }

    #[test]
    fn invalid_level_keeps_configured_db_path() {
        let config = CoreConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/data/user.db"),
            (ENV_LOG_LEVEL, "verbose"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/data/user.db"));
        assert_eq!(config.log_level, default_log_level());
    }
}
