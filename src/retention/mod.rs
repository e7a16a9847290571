//! Log retention for Logkeep
//!
//! Resolves an application's log directory, lists the log files in it and
//! deletes the least recently modified ones until a configured number remain.

mod cleaner;
mod error;
mod provider;

pub use cleaner::{
    select_victims, CleanReport, LogFileCleaner, RetentionLimit, DEFAULT_MAX_LOG_FILES,
};
pub use error::{DeletionFailure, FailureKind, RetentionError};
pub use provider::{
    AppContext, DirectoryProvider, LogFileEntry, LogFileProvider, DEFAULT_LOG_EXTENSION,
    LOGS_DIR_NAME,
};
