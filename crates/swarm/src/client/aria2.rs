use crate::error::{ErrorKind, Result};
use crate::{MagnetLink, SwarmClient};
use async_trait::async_trait;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::instrument;

/// [aria2](https://aria2.github.io/) as the swarm client.
pub struct Aria2 {
    path: PathBuf,
}
impl Aria2 {
    /// Use the given executable, or find `aria2c` on `PATH`.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self { path: path.to_path_buf() });
        }
        match which::which("aria2c") {
            Ok(path) => Ok(Self { path }),
            Err(_) => {
                tracing::info!("aria2c executable not found in PATH");
                exn::bail!(ErrorKind::ClientNotFound);
            },
        }
    }

    async fn execute(&self, args: &[String]) -> Result<Output> {
        tracing::debug!(executable = %self.path.display(), ?args, "Running swarm client");
        let output = Command::new(&self.path).args(args).output().await.or_raise(|| ErrorKind::ClientLaunch)?;
        if !output.status.success() {
            tracing::warn!(stderr = %String::from_utf8_lossy(&output.stderr), "Swarm client failed");
            match output.status.code() {
                Some(code) => exn::bail!(ErrorKind::ClientFailed(code)),
                // Killed by signal.
                None => exn::bail!(ErrorKind::ClientLaunch),
            }
        }
        Ok(output)
    }

    fn metadata_args(magnet: &MagnetLink, directory: &Path) -> Vec<String> {
        vec![
            "--bt-metadata-only=true".to_string(),
            "--bt-save-metadata=true".to_string(),
            "--quiet=true".to_string(),
            format!("--dir={}", directory.display()),
            magnet.to_string(),
        ]
    }

    fn list_args(metadata: &Path) -> Vec<String> {
        vec!["--show-files=true".to_string(), metadata.display().to_string()]
    }

    fn fetch_args(metadata: &Path, index: u32, destination: &Path) -> Vec<String> {
        vec![
            format!("--select-file={index}"),
            "--seed-time=0".to_string(),
            "--file-allocation=none".to_string(),
            "--quiet=true".to_string(),
            format!("--dir={}", destination.display()),
            metadata.display().to_string(),
        ]
    }
}

#[async_trait]
impl SwarmClient for Aria2 {
    #[instrument(skip_all, fields(info_hash = magnet.info_hash()))]
    async fn fetch_metadata(&self, magnet: &MagnetLink) -> Result<Vec<u8>> {
        let scratch = tempfile::tempdir().or_raise(|| ErrorKind::Io)?;
        self.execute(&Self::metadata_args(magnet, scratch.path())).await?;
        // aria2c names the saved metadata after the lowercase hex info hash.
        let saved = scratch.path().join(magnet.metadata_path());
        match tokio::fs::read(&saved).await {
            Ok(metadata) => Ok(metadata),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => exn::bail!(ErrorKind::MissingMetadata),
            Err(e) => Err(e).or_raise(|| ErrorKind::Io),
        }
    }

    #[instrument(skip(self))]
    async fn list_files(&self, metadata: &Path) -> Result<String> {
        let output = self.execute(&Self::list_args(metadata)).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    #[instrument(skip(self))]
    async fn fetch_file(&self, metadata: &Path, index: u32, destination: &Path) -> Result<()> {
        self.execute(&Self::fetch_args(metadata, index, destination)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_explicit_path() {
        let aria2 = Aria2::discover(Some(Path::new("/opt/aria2/bin/aria2c"))).unwrap();
        assert_eq!(aria2.path, PathBuf::from("/opt/aria2/bin/aria2c"));
    }

    #[test]
    fn test_fetch_selects_single_file() {
        let args = Aria2::fetch_args(Path::new("/lib/abc.torrent"), 7, Path::new("/tmp/scratch"));
        assert_eq!(args.first().unwrap(), "--select-file=7");
        assert!(args.contains(&"--dir=/tmp/scratch".to_string()));
        assert_eq!(args.last().unwrap(), "/lib/abc.torrent");
    }

    #[test]
    fn test_metadata_only() {
        let magnet = MagnetLink::new("0123456789abcdef0123456789abcdef01234567", "X", ["udp://t:1"]).unwrap();
        let args = Aria2::metadata_args(&magnet, Path::new("/tmp/meta"));
        assert!(args.contains(&"--bt-metadata-only=true".to_string()));
        assert!(args.contains(&"--bt-save-metadata=true".to_string()));
        assert_eq!(args.last().unwrap(), &magnet.to_string());
    }

    #[test]
    fn test_list_args() {
        assert_eq!(Aria2::list_args(Path::new("a.torrent")), vec!["--show-files=true", "a.torrent"]);
    }
}
