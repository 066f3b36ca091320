//! Error types for icmp-polars

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Analysis error: {0}")]
    Core(#[from] icmp_core::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Type mismatch in column {column}: expected {expected}, got {got}")]
    TypeMismatch {
        column: String,
        expected: String,
        got: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    pub(crate) fn type_mismatch(column: &str, expected: &str, got: impl std::fmt::Debug) -> Self {
        Self::TypeMismatch {
            column: column.to_string(),
            expected: expected.to_string(),
            got: format!("{got:?}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
