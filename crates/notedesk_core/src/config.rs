//! Store and logging configuration.
//!
//! # Invariants
//! - The notes storage key is never empty and never the theme key.
//! - Log level strings are validated lazily by `logging::init_logging`.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Storage slot holding the serialized note collection.
pub const NOTES_STORAGE_KEY: &str = "notes";
/// Storage slot reserved for the presentation theme preference.
pub const THEME_STORAGE_KEY: &str = "theme";

const DEFAULT_MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_LOG_FILES: usize = 5;

/// Configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStorageKey,
    ReservedStorageKey(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage key cannot be empty"),
            Self::ReservedStorageKey(key) => {
                write!(f, "storage key `{key}` is reserved for another slot")
            }
        }
    }
}

impl Error for ConfigError {}

/// Settings for one `NoteStore` instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    storage_key: String,
}

impl StoreConfig {
    /// Creates a config using a custom storage key.
    ///
    /// # Errors
    /// - `EmptyStorageKey` for blank keys.
    /// - `ReservedStorageKey` when the key collides with the theme slot.
    pub fn with_storage_key(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into().trim().to_string();
        if key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if key == THEME_STORAGE_KEY {
            return Err(ConfigError::ReservedStorageKey(key));
        }
        Ok(Self { storage_key: key })
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: NOTES_STORAGE_KEY.to_string(),
        }
    }
}

/// Settings for the rolling file logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory receiving log files.
    pub log_dir: PathBuf,
    /// Rotation threshold per file.
    pub max_file_size_bytes: u64,
    /// Number of rotated files kept on disk.
    pub max_files: usize,
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_dir: log_dir.into(),
            max_file_size_bytes: DEFAULT_MAX_LOG_FILE_SIZE_BYTES,
            max_files: DEFAULT_MAX_LOG_FILES,
        }
    }

    /// Uses the build-mode default level (`debug` or `info`).
    pub fn with_default_level(log_dir: impl Into<PathBuf>) -> Self {
        Self::new(default_log_level(), log_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LoggingConfig, StoreConfig, NOTES_STORAGE_KEY};

    #[test]
    fn default_store_config_uses_notes_key() {
        assert_eq!(StoreConfig::default().storage_key(), NOTES_STORAGE_KEY);
    }

    #[test]
    fn custom_storage_key_is_trimmed_and_validated() {
        let config = StoreConfig::with_storage_key("  archive ").unwrap();
        assert_eq!(config.storage_key(), "archive");

        assert_eq!(
            StoreConfig::with_storage_key("   ").unwrap_err(),
            ConfigError::EmptyStorageKey
        );
        assert_eq!(
            StoreConfig::with_storage_key("theme").unwrap_err(),
            ConfigError::ReservedStorageKey("theme".to_string())
        );
    }

    #[test]
    fn logging_config_defaults_retention() {
        let config = LoggingConfig::new("info", "/tmp/notedesk-logs");
        assert_eq!(config.max_file_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.max_files, 5);
    }
}
