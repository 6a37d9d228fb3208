//! Error types for jot with categorization:
//!
//! - **Validation errors**: input validation and configuration (exit code 1)
//! - **System errors**: IO and filesystem watching (exit code 2)
//! - **Execution errors**: persistence and lookups (exit code 3 or 4)
//!
//! The cache rejects bad input with a validation error before touching any
//! state. Store and watcher failures travel up as values and are shown to the
//! user as status text; nothing in this crate panics on malformed input.

pub mod execution;
pub mod system;
pub mod validation;

pub use execution::ExecutionError;
pub use system::SystemError;
pub use validation::ValidationError;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type that can represent any error in the system.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Validation error from input or configuration
    #[error(transparent)]
    Validation(ValidationError),
    /// System error from IO or the notification source
    #[error(transparent)]
    System(SystemError),
    /// Execution error from the store or a failed lookup
    #[error(transparent)]
    Execution(ExecutionError),
}

// Convenience constructors
impl Error {
    /// Create a validation error from an invalid config.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::Validation(ValidationError::InvalidConfig(msg.into()))
    }

    /// Create a validation error from a parse error.
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::Validation(ValidationError::ParseError(msg.into()))
    }

    /// Create a validation error for rejected mutation input.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::Validation(ValidationError::InvalidInput(msg.into()))
    }

    /// Create a system error from an IO error.
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::System(SystemError::IoError(msg.into()))
    }

    /// Create a system error for a watch registration that failed.
    pub fn watcher_setup(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::System(SystemError::WatcherSetup {
            path: path.into(),
            reason: reason.into(),
        })
    }

    /// Create a system error for a watch session that has ended.
    pub fn watcher_stopped(msg: impl Into<String>) -> Self {
        Self::System(SystemError::WatcherStopped(msg.into()))
    }

    /// Create an execution error for a not found resource.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::Execution(ExecutionError::NotFound(msg.into()))
    }

    /// Create an execution error from a store failure.
    pub fn store_error(msg: impl Into<String>) -> Self {
        Self::Execution(ExecutionError::StoreError(msg.into()))
    }

    /// Whether this error was caused by rejected input.
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Error {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit code scheme:
    /// - 1: User error (validation, invalid input, bad configuration)
    /// - 2: System error (IO, watcher)
    /// - 3: Not found
    /// - 4: Store failure
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(err) => err.exit_code(),
            Self::System(err) => err.exit_code(),
            Self::Execution(err) => err.exit_code(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::parse_error(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::parse_error(format!("Failed to parse config: {err}"))
    }
}

impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        let path = err
            .paths
            .first()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Self::watcher_setup(path, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_config() {
        let err = Error::invalid_config("test error");
        assert_eq!(err.to_string(), "Invalid configuration: test error");
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = Error::invalid_input("collection id is empty");
        assert_eq!(err.to_string(), "Invalid input: collection id is empty");
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_display_not_found() {
        let err = Error::not_found("bullet 'b1'");
        assert_eq!(err.to_string(), "Not found: bullet 'b1'");
        assert!(!err.is_validation());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::invalid_input("x").exit_code(), 1);
        assert_eq!(Error::io_error("x").exit_code(), 2);
        assert_eq!(Error::watcher_setup("/a", "b").exit_code(), 2);
        assert_eq!(Error::not_found("x").exit_code(), 3);
        assert_eq!(Error::store_error("x").exit_code(), 4);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::System(SystemError::IoError(_))));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope");
        if let Err(json_err) = parsed {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Validation(ValidationError::ParseError(_))));
        }
    }

    #[test]
    fn test_from_notify_error_keeps_path() {
        let err: Error = notify::Error::path_not_found()
            .add_path(std::path::PathBuf::from("/journal/inbox"))
            .into();
        assert!(err.to_string().contains("/journal/inbox"));
    }
}
