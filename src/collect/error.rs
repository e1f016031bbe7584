//! Collection error types

use thiserror::Error;

/// Errors that abort a collection run before it produces a result
///
/// Soft per-document failures (an unparseable date key, a malformed attached
/// value) are not errors; they skip the document or occurrence silently.
#[derive(Error, Debug)]
pub enum CollectError {
    /// The configuration failed validation
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A query target could not be compiled into a search pattern
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// No explicit bounds and no document carried a parseable date
    #[error("no valid dates: set start/end dates or provide dated documents")]
    NoValidDates,
}

/// Result type for collection operations
pub type CollectResult<T> = Result<T, CollectError>;
