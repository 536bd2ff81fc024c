//! Runtime configuration for front ends.
//!
//! # Responsibility
//! - Resolve database path and logging settings from the environment.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - `log_level` is always one of `trace|debug|info|warn|error`.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "SAGENOTE_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "SAGENOTE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "SAGENOTE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "sagenote.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "sagenote-logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid {key}=`{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings shared by every front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the key-value store.
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        let temp_dir = std::env::temp_dir();
        Self {
            db_path: temp_dir.join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: temp_dir.join(DEFAULT_LOG_DIR_NAME),
        }
    }
}

impl CoreConfig {
    /// Reads `SAGENOTE_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level =
                normalize_level(&level).map_err(|reason| ConfigError::InvalidValue {
                    key: LOG_LEVEL_ENV,
                    value: level.clone(),
                    reason,
                })?;
        }

        if let Some(dir) = read(LOG_DIR_ENV) {
            let path = PathBuf::from(&dir);
            if !path.is_absolute() {
                return Err(ConfigError::InvalidValue {
                    key: LOG_DIR_ENV,
                    value: dir,
                    reason: "must be an absolute path".to_string(),
                });
            }
            config.log_dir = path;
        }

        Ok(config)
    }
}
