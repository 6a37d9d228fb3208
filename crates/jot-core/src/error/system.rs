//! System error types for IO and filesystem watching.
//!
//! These errors represent failures in system operations that are typically
//! out of the caller's direct control.

use thiserror::Error;

/// System errors represent failures in IO or the notification source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
    /// A watch session could not be started
    #[error("Failed to watch {path}: {reason}")]
    WatcherSetup { path: String, reason: String },
    /// The watch session is no longer running
    #[error("Watcher stopped: {0}")]
    WatcherStopped(String),
}

impl SystemError {
    /// Get exit code for system errors (always 2).
    pub const fn exit_code(&self) -> i32 {
        2
    }
}
