//! External executables and the traits the pipeline uses them through.

mod ffmpeg;
mod ffprobe;

pub use self::ffmpeg::Ffmpeg;
pub use self::ffprobe::{Ffprobe, parse_duration};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;

/// A command-line tool at a known path.
#[derive(Debug, Clone)]
pub(crate) struct Executable {
    name: &'static str,
    path: PathBuf,
}
impl Executable {
    /// Use the given path, or search `PATH` for `name`.
    pub(crate) fn discover(name: &'static str, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self { name, path: path.to_path_buf() });
        }
        match which::which(name) {
            Ok(path) => Ok(Self { name, path }),
            Err(_) => {
                tracing::info!("{name} executable not found in PATH");
                exn::bail!(ErrorKind::ToolNotFound(name));
            },
        }
    }

    pub(crate) async fn execute(&self, args: &[String]) -> Result<Output> {
        tracing::debug!(executable = %self.path.display(), ?args, "Running {}", self.name);
        let output = Command::new(&self.path)
            .args(args)
            .output()
            .await
            .or_raise(|| ErrorKind::ToolLaunch(self.name))?;
        if !output.status.success() {
            tracing::warn!(stderr = %String::from_utf8_lossy(&output.stderr), "{} failed", self.name);
            match output.status.code() {
                Some(code) => exn::bail!(ErrorKind::ToolFailed(self.name, code)),
                None => exn::bail!(ErrorKind::ToolLaunch(self.name)),
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_skips_search() {
        let tool = Executable::discover("definitely-not-installed-anywhere", Some(Path::new("/opt/bin/tool"))).unwrap();
        assert_eq!(tool.path, PathBuf::from("/opt/bin/tool"));
    }

    #[test]
    fn test_missing_tool() {
        let err = Executable::discover("definitely-not-installed-anywhere", None).unwrap_err();
        assert!(matches!(&*err, ErrorKind::ToolNotFound("definitely-not-installed-anywhere")));
    }
}
