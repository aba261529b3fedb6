//! Feed Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A feed error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document is not an RSS feed.
    #[display("invalid syndication document: not an RSS channel")]
    InvalidDocument,
    /// The output document could not be written.
    #[display("failed to serialize output feed")]
    Serialize,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The document is either valid or it's not.
        false
    }
}
