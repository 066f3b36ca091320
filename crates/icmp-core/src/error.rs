//! Error types for ICM+ monitoring analysis
//!
//! Provides a unified error type for all icmp crates.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Core error type for episode, burden and reconciliation operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input data violates an ordering or shape requirement
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A duration or configuration value could not be understood
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation was invoked before the step it depends on
    #[error("Missing prerequisite: {0}")]
    MissingPrerequisite(String),

    /// A required tabular column is absent
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a timestamp that does not strictly follow its predecessor
    pub fn unsorted(context: &str, previous: NaiveDateTime, current: NaiveDateTime) -> Self {
        Self::InvalidInput(format!(
            "{context} timestamps must be strictly increasing: {current} follows {previous}"
        ))
    }

    /// Create an error for an unparseable duration
    pub fn invalid_duration(text: &str, reason: &str) -> Self {
        Self::Configuration(format!("cannot parse duration {text:?}: {reason}"))
    }

    /// Create an error for a missing column
    pub fn missing_column(column: &str) -> Self {
        Self::MissingColumn(column.to_string())
    }

    /// Whether the caller may continue with its input unchanged
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingPrerequisite(_))
    }
}
