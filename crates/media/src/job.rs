use std::path::{Path, PathBuf};

/// The fixed audio format every concatenated episode is encoded to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputProfile {
    pub channels: u8,
    pub sample_rate: u32,
    pub codec: &'static str,
    /// Encoder VBR quality (`-q:a`); lower is better for LAME.
    pub quality: u8,
}
impl OutputProfile {
    fn encoder_args(&self) -> Vec<String> {
        vec![
            "-ac".to_string(),
            self.channels.to_string(),
            "-ar".to_string(),
            self.sample_rate.to_string(),
            "-codec:a".to_string(),
            self.codec.to_string(),
            "-q:a".to_string(),
            self.quality.to_string(),
        ]
    }
}
impl Default for OutputProfile {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44_100,
            codec: "libmp3lame",
            quality: 2,
        }
    }
}

/// One whole-file transformation.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscodeJob {
    /// Scale the volume of `input` by `gain`.
    Normalize { input: PathBuf, output: PathBuf, gain: f32 },
    /// Join `inputs` back-to-back at the container level, then re-encode to
    /// the output profile.
    Concatenate { inputs: Vec<PathBuf>, output: PathBuf },
    /// Generate `seconds` of stereo silence in the output profile.
    Silence { seconds: u32, output: PathBuf },
}
impl TranscodeJob {
    pub fn output(&self) -> &Path {
        match self {
            Self::Normalize { output, .. } | Self::Concatenate { output, .. } | Self::Silence { output, .. } => output,
        }
    }

    /// Command-line arguments for `ffmpeg`, minus the executable.
    ///
    /// ```
    /// use chapterfeed_media::{OutputProfile, TranscodeJob};
    /// let job = TranscodeJob::Normalize { input: "in.mp3".into(), output: "out.mp3".into(), gain: 0.6 };
    /// let args = job.ffmpeg_args(&OutputProfile::default());
    /// assert_eq!(args[args.len() - 3..], ["-filter:a", "volume=0.60", "out.mp3"]);
    /// ```
    pub fn ffmpeg_args(&self, profile: &OutputProfile) -> Vec<String> {
        let mut args: Vec<String> = ["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]
            .into_iter()
            .map(String::from)
            .collect();
        match self {
            Self::Normalize { input, gain, .. } => {
                args.extend(["-i".to_string(), input.display().to_string()]);
                args.extend(["-filter:a".to_string(), format!("volume={gain:.2}")]);
            },
            Self::Concatenate { inputs, .. } => {
                let joined = inputs.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join("|");
                args.extend(["-i".to_string(), format!("concat:{joined}")]);
                args.extend(profile.encoder_args());
            },
            Self::Silence { seconds, .. } => {
                args.extend(["-f", "lavfi", "-i"].map(String::from));
                args.push(format!("anullsrc=r={}:cl=stereo", profile.sample_rate));
                args.extend(["-t".to_string(), seconds.to_string()]);
                args.extend(profile.encoder_args());
            },
        }
        args.push(self.output().display().to_string());
        args
    }
}
