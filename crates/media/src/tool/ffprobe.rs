use super::Executable;
use crate::DurationProbe;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::instrument;

/// `ffprobe`, reporting the container duration.
pub struct Ffprobe {
    executable: Executable,
}
impl Ffprobe {
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        Ok(Self { executable: Executable::discover("ffprobe", explicit)? })
    }

    fn args(path: &Path) -> Vec<String> {
        let mut args: Vec<String> = [
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ]
        .into_iter()
        .map(String::from)
        .collect();
        args.push(path.display().to_string());
        args
    }
}

#[async_trait]
impl DurationProbe for Ffprobe {
    #[instrument(skip(self))]
    async fn probe(&self, path: &Path) -> Result<u64> {
        let output = self.executable.execute(&Self::args(path)).await?;
        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Whole seconds from ffprobe's fractional duration, truncated.
///
/// ```
/// assert_eq!(chapterfeed_media::parse_duration("1834.579592\n").unwrap(), 1834);
/// ```
pub fn parse_duration(stdout: &str) -> Result<u64> {
    let trimmed = stdout.trim();
    match trimmed.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => Ok(seconds.trunc() as u64),
        _ => exn::bail!(ErrorKind::InvalidDuration(trimmed.to_string())),
    }
}
