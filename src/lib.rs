//! Logkeep - keep the newest log files, delete the rest
//!
//! This library provides the retention pass and the ambient logging and
//! configuration used by the `logkeep` binary.

pub mod config;
pub mod logging;
pub mod retention;
