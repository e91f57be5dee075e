//! Error types for joint-set classification

use thiserror::Error;

/// Result type alias for joint-set operations
pub type Result<T> = std::result::Result<T, JointSetError>;

/// Joint-set classification errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JointSetError {
    /// Malformed or out-of-range run configuration, empty input,
    /// or too few distinct rows for the requested number of sets
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl JointSetError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Whether this error was caused by the caller's configuration
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}
