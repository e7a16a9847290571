//! Log file location and listing
//!
//! A [`LogFileProvider`] knows where an application's log files live and which
//! files in that directory count as log files. The cleaner only talks to this
//! trait, so hosts and tests can hand it whatever directory they like.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use super::error::RetentionError;

/// Default extension for recognized log files
pub const DEFAULT_LOG_EXTENSION: &str = "log";

/// Name of the log directory under an application's data directory
pub const LOGS_DIR_NAME: &str = "logs";

/// Execution context a provider resolves its directory from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppContext {
    /// Application name, used for diagnostics only
    pub app_name: String,
    /// Base storage area owned by the application
    pub data_dir: PathBuf,
}

impl AppContext {
    /// Create a context rooted at an explicit data directory
    pub fn new(app_name: impl Into<String>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_name: app_name.into(),
            data_dir: data_dir.into(),
        }
    }

    /// Directory that holds this application's log files
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join(LOGS_DIR_NAME)
    }
}

/// An existing log file in the log directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileEntry {
    /// Full path to the file
    pub path: PathBuf,
    /// Last modification time
    pub modified: SystemTime,
    /// Size in bytes
    pub size: u64,
}

impl LogFileEntry {
    /// File name component, empty if the path has none
    pub fn file_name(&self) -> &std::ffi::OsStr {
        self.path.file_name().unwrap_or_default()
    }

    /// Modification time as a UTC timestamp, for display
    pub fn modified_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from(self.modified)
    }
}

/// Resolves and lists the log directory
pub trait LogFileProvider {
    /// Directory holding the log files
    ///
    /// Always the same path for a given provider. The directory exists when
    /// this returns `Ok`.
    fn log_directory(&self) -> Result<PathBuf, RetentionError>;

    /// Every recognized log file currently in `dir`, in no particular order
    fn list_log_files(&self, dir: &Path) -> Result<Vec<LogFileEntry>, RetentionError>;
}

impl<P: LogFileProvider + ?Sized> LogFileProvider for &P {
    fn log_directory(&self) -> Result<PathBuf, RetentionError> {
        (**self).log_directory()
    }

    fn list_log_files(&self, dir: &Path) -> Result<Vec<LogFileEntry>, RetentionError> {
        (**self).list_log_files(dir)
    }
}

impl<P: LogFileProvider + ?Sized> LogFileProvider for Box<P> {
    fn log_directory(&self) -> Result<PathBuf, RetentionError> {
        (**self).log_directory()
    }

    fn list_log_files(&self, dir: &Path) -> Result<Vec<LogFileEntry>, RetentionError> {
        (**self).list_log_files(dir)
    }
}

impl<P: LogFileProvider + ?Sized> LogFileProvider for Arc<P> {
    fn log_directory(&self) -> Result<PathBuf, RetentionError> {
        (**self).log_directory()
    }

    fn list_log_files(&self, dir: &Path) -> Result<Vec<LogFileEntry>, RetentionError> {
        (**self).list_log_files(dir)
    }
}

/// Filesystem-backed provider
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    logs_dir: PathBuf,
    extension: String,
    prefix: Option<String>,
}

impl DirectoryProvider {
    /// Provider for the log directory of the given context
    pub fn from_context(context: &AppContext) -> Self {
        Self::new(context.logs_dir())
    }

    /// Provider for an explicit directory
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            extension: DEFAULT_LOG_EXTENSION.to_string(),
            prefix: None,
        }
    }

    /// Recognize files with `extension` (without the leading dot) instead of `.log`
    pub fn with_extension(
        mut self,
        extension: impl Into<String>,
    ) -> Result<Self, RetentionError> {
        let extension: String = extension.into();
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(RetentionError::InvalidConfiguration(format!(
                "unusable log file extension {:?}",
                extension
            )));
        }
        self.extension = extension.to_string();
        Ok(self)
    }

    /// Only count files whose name starts with `prefix`
    ///
    /// Lets a tool manage its own logs in a directory it shares with others.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Directory path without touching the filesystem
    pub fn path(&self) -> &Path {
        &self.logs_dir
    }

    /// Extension recognized as a log file
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Check if `path` carries the recognized extension (case-insensitive)
    /// and, when set, the required prefix
    pub fn is_log_file_name(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension));
        if !has_extension {
            return false;
        }

        match &self.prefix {
            Some(prefix) => path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(prefix.as_str())),
            None => true,
        }
    }
}

impl LogFileProvider for DirectoryProvider {
    fn log_directory(&self) -> Result<PathBuf, RetentionError> {
        fs::create_dir_all(&self.logs_dir)
            .map_err(|e| RetentionError::directory_unavailable(&self.logs_dir, e))?;
        Ok(self.logs_dir.clone())
    }

    fn list_log_files(&self, dir: &Path) -> Result<Vec<LogFileEntry>, RetentionError> {
        let read_dir =
            fs::read_dir(dir).map_err(|e| RetentionError::directory_unavailable(dir, e))?;

        let mut files = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| RetentionError::directory_unavailable(dir, e))?;
            let path = entry.path();

            if !self.is_log_file_name(&path) {
                continue;
            }

            // Symlinks and directories are not log files, even with a .log name
            match entry.file_type() {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            }

            // Removed between read_dir and stat by someone else
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            let modified = metadata
                .modified()
                .map_err(|e| RetentionError::directory_unavailable(dir, e))?;

            files.push(LogFileEntry {
                path,
                modified,
                size: metadata.len(),
            });
        }

        Ok(files)
    }
}
