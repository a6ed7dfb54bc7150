//! Error types for the seeker crate.

use thiserror::Error;

/// Errors raised by the record pipeline.
///
/// Only caller misconfiguration is reported here. Malformed record data never
/// produces an error: it fails to match a filter or sorts last.
#[derive(Debug, Error)]
pub enum SeekerError {
    /// Pagination was asked for pages of zero records.
    #[error("page size must be greater than zero")]
    InvalidPageSize,

    /// A date bound given as text could not be read as `YYYY-MM-DD`.
    #[error("invalid date bound '{input}': expected YYYY-MM-DD")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The delimited-text writer failed.
    #[error("export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for SeekerError {
    fn from(err: csv::Error) -> Self {
        SeekerError::Export(err.to_string())
    }
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
