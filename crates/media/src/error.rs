//! Media Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A media error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for media operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("{_0} not detected on your system")]
    ToolNotFound(#[error(not(source))] &'static str),
    /// The tool could not be started, or was killed by a signal.
    #[display("{_0} could not be run")]
    ToolLaunch(#[error(not(source))] &'static str),
    /// The tool exited with a non-zero exit code.
    #[display("{_0} exited with code: {_1}")]
    ToolFailed(&'static str, i32),
    /// The prober printed something that is not a duration in seconds.
    #[display("unreadable duration: {_0:?}")]
    InvalidDuration(#[error(not(source))] String),
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
