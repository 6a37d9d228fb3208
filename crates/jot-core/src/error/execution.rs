//! Execution error types for persistence and lookup failures.

use thiserror::Error;

/// Execution errors come from the persistence collaborator or from lookups
/// against state that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),
    /// The store refused or failed an operation
    #[error("Store error: {0}")]
    StoreError(String),
}

impl ExecutionError {
    /// Get exit code for execution errors.
    /// - Not found: 3
    /// - Store failures: 4
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => 3,
            Self::StoreError(_) => 4,
        }
    }
}
