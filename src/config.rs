//! Configuration management for Logkeep

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::LOG_FILE_PREFIX;
use crate::retention::{
    AppContext, DirectoryProvider, DEFAULT_LOG_EXTENSION, DEFAULT_MAX_LOG_FILES,
};

/// Application name used for the default data directory
pub const APP_NAME: &str = "logkeep";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of most recently modified log files to keep (default: 10)
    ///
    /// Signed so that a negative value in the file is reported instead of
    /// failing to parse.
    #[serde(default = "default_max_log_files")]
    pub max_log_files: i64,

    /// Extension of files treated as logs, without the dot (default: "log")
    #[serde(default = "default_log_extension")]
    pub log_extension: String,

    /// Directory holding the log files (default: <data_dir>/logs)
    #[serde(default)]
    pub logs_dir: Option<PathBuf>,

    /// Base directory for logkeep's own files (default: ~/.logkeep)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Only report what would be deleted
    #[serde(default)]
    pub dry_run: bool,
}

fn default_max_log_files() -> i64 {
    DEFAULT_MAX_LOG_FILES
}

fn default_log_extension() -> String {
    DEFAULT_LOG_EXTENSION.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_log_files: default_max_log_files(),
            log_extension: default_log_extension(),
            logs_dir: None,
            data_dir: None,
            dry_run: false,
        }
    }
}

impl Config {
    /// Load configuration from file, writing the defaults there on first run
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&config_file_path())
    }

    /// Load configuration from `path`, writing the defaults there if it is missing
    pub fn load_or_create_at(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        config.save_to(path)?;
        Ok(config)
    }

    /// Load configuration from a specific file, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Execution context rooted at `data_dir` or the config directory
    pub fn app_context(&self) -> AppContext {
        let data_dir = self.data_dir.clone().unwrap_or_else(config_dir);
        AppContext::new(APP_NAME, data_dir)
    }

    /// Directory logkeep writes its own log files to
    ///
    /// Always under `data_dir`, never the overridden `logs_dir`, so the
    /// tool's own logs do not take slots from the files it manages.
    pub fn own_logs_dir(&self) -> PathBuf {
        self.app_context().logs_dir()
    }

    /// Provider for logkeep's own log files when the main pass does not cover them
    ///
    /// Returns `None` when `logs_dir` is the own log directory and `.log`
    /// files are what it manages.
    pub fn own_logs_provider(&self) -> Option<DirectoryProvider> {
        let own_dir = self.own_logs_dir();
        let covered = self.provider().is_ok_and(|p| {
            p.path() == own_dir && p.extension().eq_ignore_ascii_case(DEFAULT_LOG_EXTENSION)
        });
        if covered {
            return None;
        }
        Some(DirectoryProvider::new(own_dir).with_prefix(LOG_FILE_PREFIX))
    }

    /// Filesystem provider for the configured log directory and extension
    ///
    /// An explicit `logs_dir` is used as-is; otherwise the directory is
    /// resolved from [`app_context`](Self::app_context).
    pub fn provider(&self) -> Result<DirectoryProvider> {
        let provider = match &self.logs_dir {
            Some(dir) => DirectoryProvider::new(dir),
            None => DirectoryProvider::from_context(&self.app_context()),
        };
        provider
            .with_extension(&self.log_extension)
            .context("Invalid log_extension in config")
    }
}

/// Get the base configuration directory (~/.logkeep)
/// Falls back to ./.logkeep if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".logkeep")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".logkeep"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
