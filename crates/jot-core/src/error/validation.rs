//! Validation error types for configuration and mutation input.
//!
//! These errors represent user input or configuration problems that can be
//! corrected by the caller. A validation failure never leaves a partial
//! mutation behind.

use thiserror::Error;

/// Validation errors represent incorrect input or configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Invalid configuration provided
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Parse error when reading configuration or stored data
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Rejected mutation input (empty collection id, empty label, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ValidationError {
    /// Get exit code for validation errors (always 1).
    pub const fn exit_code(&self) -> i32 {
        1
    }
}
