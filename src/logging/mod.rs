//! Logging setup for Logkeep
//!
//! Writes tracing output to a timestamped `logkeep-*.log` file in logkeep's
//! own log directory, mirrored to stderr.

mod file_writer;

pub use file_writer::{
    create_log_file_path, init_file_logging, LogFileInfo, LoggingGuard, LOG_FILE_PREFIX,
    LOG_FILTER_ENV,
};
