//! Count-based log retention
//!
//! Keeps the most recently modified log files and deletes the rest.

use std::cmp::Ordering;
use std::fs;
use std::path::PathBuf;

use super::error::{DeletionFailure, RetentionError};
use super::provider::{LogFileEntry, LogFileProvider};

/// Default number of log files kept by a cleaning pass
pub const DEFAULT_MAX_LOG_FILES: i64 = 10;

/// Number of most recently modified log files to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RetentionLimit(usize);

impl RetentionLimit {
    /// Validate a raw limit; negative values are rejected, never clamped
    pub fn new(max_files: i64) -> Result<Self, RetentionError> {
        if max_files < 0 {
            return Err(RetentionError::InvalidConfiguration(format!(
                "retention limit must be >= 0, got {}",
                max_files
            )));
        }
        usize::try_from(max_files).map(Self).map_err(|_| {
            RetentionError::InvalidConfiguration(format!(
                "retention limit {} does not fit this platform",
                max_files
            ))
        })
    }

    /// The limit as a file count
    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for RetentionLimit {
    type Error = RetentionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<usize> for RetentionLimit {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Oldest first; identical timestamps fall back to the file name
fn eviction_order(a: &LogFileEntry, b: &LogFileEntry) -> Ordering {
    a.modified
        .cmp(&b.modified)
        .then_with(|| a.file_name().cmp(b.file_name()))
        .then_with(|| a.path.cmp(&b.path))
}

/// Pick the files a pass with `limit` would delete
///
/// Returns the `len - limit` least recently modified entries, oldest first,
/// or nothing when `entries` already fits.
pub fn select_victims(
    mut entries: Vec<LogFileEntry>,
    limit: RetentionLimit,
) -> Vec<LogFileEntry> {
    let limit = limit.get();
    if entries.len() <= limit {
        return Vec::new();
    }

    let excess = entries.len() - limit;
    entries.sort_by(eviction_order);
    entries.truncate(excess);
    entries
}

/// Outcome of a single cleaning pass
#[derive(Debug, Default)]
pub struct CleanReport {
    /// Number of log files found before anything was deleted
    pub examined: usize,
    /// Files removed, oldest first
    pub deleted: Vec<PathBuf>,
    /// Victims that could not be removed
    pub failures: Vec<DeletionFailure>,
}

impl CleanReport {
    /// Every selected victim was removed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failures other than victims that were already gone
    pub fn has_hard_failures(&self) -> bool {
        self.failures.iter().any(|f| !f.is_already_gone())
    }

    /// Number of files still present after the pass
    pub fn retained(&self) -> usize {
        let vanished = self
            .failures
            .iter()
            .filter(|f| f.is_already_gone())
            .count();
        self.examined
            .saturating_sub(self.deleted.len() + vanished)
    }
}

/// Enforces a retention limit on the log directory of a provider
///
/// Holds no state between passes; each [`clean`](Self::clean) lists the
/// directory afresh.
#[derive(Debug)]
pub struct LogFileCleaner<P> {
    provider: P,
    limit: RetentionLimit,
}

impl<P: LogFileProvider> LogFileCleaner<P> {
    /// Create a cleaner keeping at most `max_files` log files
    pub fn new(provider: P, max_files: i64) -> Result<Self, RetentionError> {
        Ok(Self::with_limit(provider, RetentionLimit::new(max_files)?))
    }

    /// Create a cleaner from an already validated limit
    pub fn with_limit(provider: P, limit: RetentionLimit) -> Self {
        Self { provider, limit }
    }

    /// Number of files a pass keeps
    pub fn limit(&self) -> RetentionLimit {
        self.limit
    }

    /// Files the next pass would delete, without deleting anything
    pub fn plan(&self) -> Result<Vec<LogFileEntry>, RetentionError> {
        let files = self.snapshot()?;
        Ok(select_victims(files, self.limit))
    }

    /// Delete the oldest log files until at most `limit` remain
    ///
    /// Listing failures abort the pass before anything is deleted. Individual
    /// deletion failures are collected in the report and the remaining victims
    /// are still processed.
    pub fn clean(&self) -> Result<CleanReport, RetentionError> {
        let files = self.snapshot()?;
        let mut report = CleanReport {
            examined: files.len(),
            ..CleanReport::default()
        };

        let victims = select_victims(files, self.limit);
        if victims.is_empty() {
            tracing::debug!(
                "{} log files within limit of {}, nothing to clean",
                report.examined,
                self.limit.get()
            );
            return Ok(report);
        }

        for victim in victims {
            match fs::remove_file(&victim.path) {
                Ok(()) => {
                    tracing::debug!("Deleted log file {}", victim.path.display());
                    report.deleted.push(victim.path);
                }
                Err(e) => {
                    let failure = DeletionFailure::new(victim.path, e);
                    tracing::warn!("{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        tracing::info!(
            "Log retention kept {} of {} files, deleted {}, {} failed",
            report.retained(),
            report.examined,
            report.deleted.len(),
            report.failures.len()
        );

        Ok(report)
    }

    fn snapshot(&self) -> Result<Vec<LogFileEntry>, RetentionError> {
        let dir = self.provider.log_directory()?;
        self.provider.list_log_files(&dir)
    }
}
