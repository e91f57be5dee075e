//! Error types for the joint-set tool

use jointset_core::JointSetError;
use thiserror::Error;

/// Result type alias for tool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Joint-set tool errors
#[derive(Debug, Error)]
pub enum Error {
    /// Missing columns, no usable rows, or bad configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Clustering core error
    #[error(transparent)]
    Core(#[from] JointSetError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML config error
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Stereonet drawing error
    #[error("Plot error: {0}")]
    Plot(String),
}

impl Error {
    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create a plot error
    pub fn plot(message: impl Into<String>) -> Self {
        Self::Plot(message.into())
    }

    /// Whether the caller's input or settings caused this error
    pub fn is_invalid_configuration(&self) -> bool {
        match self {
            Self::InvalidConfiguration(_) => true,
            Self::Core(err) => err.is_invalid_configuration(),
            _ => false,
        }
    }
}
