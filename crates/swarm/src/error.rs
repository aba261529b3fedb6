//! Swarm Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A swarm error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for swarm operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("aria2c not detected on your system")]
    ClientNotFound,
    /// The swarm client could not be started, or was killed by a signal.
    #[display("swarm client could not be run")]
    ClientLaunch,
    /// The swarm client exited with a non-zero exit code.
    #[display("swarm client exited with code: {_0}")]
    ClientFailed(#[error(not(source))] i32),
    /// The client finished but left no metadata file behind.
    #[display("swarm metadata was not saved by the client")]
    MissingMetadata,
    /// Not a 40-character hexadecimal BitTorrent v1 info hash.
    #[display("invalid info hash: {_0}")]
    InvalidInfoHash(#[error(not(source))] String),
    /// Reading or writing the cached metadata failed.
    Store,
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // Peers come and go; a failed fetch may well succeed later.
        matches!(self, Self::ClientFailed(_) | Self::MissingMetadata)
    }
}
