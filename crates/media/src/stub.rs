//! Deterministic tool doubles for testing.

use crate::error::{ErrorKind, Result};
use crate::{DurationProbe, TranscodeJob, Transcoder};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Transcoder that writes a fixed-size placeholder instead of audio.
///
/// Every job is recorded so tests can inspect which inputs were joined in
/// which order.
pub struct StubTranscoder {
    output_size: usize,
    fail: bool,
    jobs: Mutex<Vec<TranscodeJob>>,
}
impl StubTranscoder {
    /// Outputs of `output_size` bytes.
    pub fn new(output_size: usize) -> Self {
        Self { output_size, fail: false, jobs: Mutex::new(Vec::new()) }
    }

    /// Every job fails as if the tool exited with code 1.
    pub fn failing() -> Self {
        Self { fail: true, ..Self::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.jobs().len()
    }

    pub fn jobs(&self) -> Vec<TranscodeJob> {
        match self.jobs.lock() {
            Ok(jobs) => jobs.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
impl Default for StubTranscoder {
    fn default() -> Self {
        Self::new(1024 * 1024)
    }
}

#[async_trait]
impl Transcoder for StubTranscoder {
    async fn transcode(&self, job: &TranscodeJob) -> Result<()> {
        match self.jobs.lock() {
            Ok(mut jobs) => jobs.push(job.clone()),
            Err(poisoned) => poisoned.into_inner().push(job.clone()),
        }
        if self.fail {
            exn::bail!(ErrorKind::ToolFailed("ffmpeg", 1));
        }
        tokio::fs::write(job.output(), vec![0xFF; self.output_size]).await.or_raise(|| ErrorKind::Io)?;
        Ok(())
    }
}

/// Prober that reports the same duration for every file.
pub struct StubProbe {
    seconds: u64,
    calls: AtomicUsize,
}
impl StubProbe {
    pub fn new(seconds: u64) -> Self {
        Self { seconds, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DurationProbe for StubProbe {
    async fn probe(&self, path: &Path) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !tokio::fs::try_exists(path).await.or_raise(|| ErrorKind::Io)? {
            exn::bail!(ErrorKind::ToolFailed("ffprobe", 1));
        }
        Ok(self.seconds)
    }
}
