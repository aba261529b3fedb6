pub mod error;
mod job;
#[cfg(any(test, feature = "mock"))]
mod stub;
mod tool;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub use crate::job::{OutputProfile, TranscodeJob};
#[cfg(any(test, feature = "mock"))]
pub use crate::stub::{StubProbe, StubTranscoder};
pub use crate::tool::{Ffmpeg, Ffprobe, parse_duration};

/// Runs whole-file audio transformations.
///
/// The job's output path is written (or overwritten) only on success.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, job: &TranscodeJob) -> Result<()>;
}

/// Reports the playing time of an audio file in whole seconds.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<u64>;
}
