use super::Executable;
use crate::error::Result;
use crate::{OutputProfile, TranscodeJob, Transcoder};
use async_trait::async_trait;
use std::path::Path;
use tracing::instrument;

/// [FFmpeg](https://ffmpeg.org/) as the transcoder.
pub struct Ffmpeg {
    executable: Executable,
    profile: OutputProfile,
}
impl Ffmpeg {
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        Ok(Self {
            executable: Executable::discover("ffmpeg", explicit)?,
            profile: OutputProfile::default(),
        })
    }
}

#[async_trait]
impl Transcoder for Ffmpeg {
    #[instrument(skip_all, fields(output = %job.output().display()))]
    async fn transcode(&self, job: &TranscodeJob) -> Result<()> {
        self.executable.execute(&job.ffmpeg_args(&self.profile)).await?;
        Ok(())
    }
}
