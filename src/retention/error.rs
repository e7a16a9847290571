//! Error types for the retention pass

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort construction of a cleaner or a whole cleaning pass
#[derive(Debug, Error)]
pub enum RetentionError {
    /// The cleaner was configured with values it cannot honor
    #[error("invalid retention configuration: {0}")]
    InvalidConfiguration(String),

    /// The log directory could not be created or listed
    #[error("log directory {} is unavailable: {source}", .path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RetentionError {
    pub(crate) fn directory_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RetentionError::DirectoryUnavailable {
            path: path.into(),
            source,
        }
    }
}

/// Categories of deletion failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file was removed by someone else before we got to it
    AlreadyGone,
    /// Permission denied on the file or its directory
    PermissionDenied,
    /// Other IO error
    Other,
}

impl FailureKind {
    /// Categorize an IO error returned by a delete
    pub fn from_io_error(e: &io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => FailureKind::AlreadyGone,
            io::ErrorKind::PermissionDenied => FailureKind::PermissionDenied,
            _ => {
                #[cfg(unix)]
                {
                    if let Some(os_error) = e.raw_os_error() {
                        // ENOENT = 2, EPERM = 1, EACCES = 13 on Linux and macOS
                        if os_error == 2 {
                            return FailureKind::AlreadyGone;
                        }
                        if os_error == 1 || os_error == 13 {
                            return FailureKind::PermissionDenied;
                        }
                    }
                }
                FailureKind::Other
            }
        }
    }

    /// Short label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::AlreadyGone => "already gone",
            FailureKind::PermissionDenied => "permission denied",
            FailureKind::Other => "io error",
        }
    }
}

/// A single victim that could not be deleted
///
/// Collected into the pass report; never aborts the pass.
#[derive(Debug, Error)]
#[error("failed to delete {} ({}): {source}", .path.display(), .kind.as_str())]
pub struct DeletionFailure {
    /// File that was selected for eviction
    pub path: PathBuf,
    /// Classification of `source`
    pub kind: FailureKind,
    #[source]
    pub source: io::Error,
}

impl DeletionFailure {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            kind: FailureKind::from_io_error(&source),
            source,
        }
    }

    /// The file no longer exists, so eviction reached its goal anyway
    pub fn is_already_gone(&self) -> bool {
        self.kind == FailureKind::AlreadyGone
    }
}
