//! Pipeline Error Types
//!
//! Every crate below reports its own `ErrorKind`; the pipeline raises them
//! into the categories here so the binary can decide how to exit.

use chapterfeed_feed::models::ChapterKey;
use derive_more::{Display, Error};
use std::path::PathBuf;

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which lookup table a chapter key was missing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Lookup {
    #[display("feed")]
    Feed,
    #[display("swarm archive")]
    Archive,
}

/// Actionable error categories.
///
/// None of these are recovered from locally: a rerun repeats only the steps
/// whose canonical output is still absent.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The input feed is not an RSS document.
    #[display("feed document could not be parsed")]
    Format,
    #[display("{key} not found in the {index}")]
    NotFound {
        #[error(not(source))]
        key: ChapterKey,
        #[error(not(source))]
        index: Lookup,
    },
    /// A download is too small to be real audio.
    #[display("{} is only {size} bytes", path.display())]
    Integrity {
        #[error(not(source))]
        path: PathBuf,
        #[error(not(source))]
        size: u64,
    },
    /// The swarm client finished without producing the requested file.
    #[display("{} missing from swarm download", expected.display())]
    Extraction {
        #[error(not(source))]
        expected: PathBuf,
    },
    /// An external tool (ffmpeg, ffprobe, aria2c) could not be found, run, or
    /// exited unsuccessfully.
    #[display("external tool failed")]
    Tool,
    #[display("network request failed")]
    Network,
    #[display("artifact storage failed")]
    Storage,
    #[display("invalid configuration")]
    Config,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Extraction { .. })
    }

    /// Process exit code for a run that failed with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Extraction { .. } => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Extraction { expected: PathBuf::from("X/Book 1/Chapter 1.mp3") }, 2)]
    #[case(ErrorKind::Integrity { path: PathBuf::from("a.mp3"), size: 12 }, 1)]
    #[case(ErrorKind::NotFound { key: ChapterKey::new(1, 2), index: Lookup::Feed }, 1)]
    #[case(ErrorKind::Tool, 1)]
    fn test_exit_code(#[case] kind: ErrorKind, #[case] expected: u8) {
        assert_eq!(kind.exit_code(), expected);
    }

    #[test]
    fn test_display() {
        let kind = ErrorKind::NotFound { key: ChapterKey::new(3, 12), index: Lookup::Archive };
        assert_eq!(kind.to_string(), "Book 3, Chapter 12 not found in the swarm archive");
        let kind = ErrorKind::Integrity { path: PathBuf::from("episodes/a.mp3"), size: 512 };
        assert_eq!(kind.to_string(), "episodes/a.mp3 is only 512 bytes");
    }
}
