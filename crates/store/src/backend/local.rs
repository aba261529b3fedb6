//! Local filesystem artifact store.
//!
//! Artifacts are stored under a configured root directory and accessed via
//! `tokio::fs`.

use crate::error::ErrorKind;
use crate::{ArtifactStore, Located, error::Result, path::validate as validate_path};
use async_trait::async_trait;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem artifact store.
///
/// # Examples
///
/// ```no_run
/// use chapterfeed_store::backend::LocalStore;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = LocalStore::new("/srv/podcast")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalStore {
    /// Root directory that every artifact path is relative to
    root: PathBuf,
}
impl LocalStore {
    /// Create a new local filesystem store, creating the root directory if
    /// it doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute, or exists but is not a
    /// directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            // Use non-async here; it'll only happen once on start-up and it's
            // not worth making the constructor async.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self { root })
    }

    /// Validates the path and joins it with the root directory.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }

    async fn create_parent(&self, absolute: &Path, path: &Path) -> Result<()> {
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await.map_err(|e| Self::map_io_error(e, path))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ArtifactStore for LocalStore {
    async fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::try_exists(&abs_path).await.map_err(ErrorKind::Io)?)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::read(&abs_path).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        self.create_parent(&abs_path, path).await?;
        Ok(fs::write(&abs_path, data).await.map_err(|e| Self::map_io_error(e, path))?)
    }

    async fn import(&self, source: &Path, path: &Path) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        self.create_parent(&abs_path, path).await?;
        match fs::rename(source, &abs_path).await {
            Ok(()) => Ok(()),
            // Scratch space usually lives on a different filesystem (tmpfs)
            // than the store, where a rename is impossible.
            Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
                tracing::debug!(source = %source.display(), target = %abs_path.display(), "Falling back to copy across devices");
                fs::copy(source, &abs_path).await.map_err(|e| Self::map_io_error(e, path))?;
                Ok(fs::remove_file(source).await.map_err(|e| Self::map_io_error(e, source))?)
            },
            Err(e) => Err(Self::map_io_error(e, source).into()),
        }
    }

    async fn locate(&self, path: &Path) -> Result<Located> {
        let abs_path = self.absolute_path(path)?;
        if !fs::try_exists(&abs_path).await.map_err(ErrorKind::Io)? {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        Ok(Located::Persisted(abs_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(LocalStore::new(temp_dir.path()).is_ok());
        assert!(LocalStore::new("relative/path").is_err());
        assert!(LocalStore::new("./relative").is_err());
    }

    #[test]
    fn test_new_creates_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("library");
        LocalStore::new(&root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_absolute_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp_dir.path()).unwrap();
        let expected = temp_dir.path().join("chapters/a.mp3");
        assert_eq!(store.absolute_path(Path::new("chapters/a.mp3")).unwrap(), expected);
        assert!(store.absolute_path(Path::new("../etc/passwd")).is_err());
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp_dir.path()).unwrap();
        store.write(Path::new("a/b/test.torrent"), b"d8:announce").await.unwrap();
        assert_eq!(store.read(Path::new("a/b/test.torrent")).await.unwrap(), b"d8:announce");
        assert!(temp_dir.path().join("a/b/test.torrent").is_file());
    }

    #[tokio::test]
    async fn test_exists() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp_dir.path()).unwrap();
        assert!(!store.exists(Path::new("silence.mp3")).await.unwrap());
        store.write(Path::new("silence.mp3"), b"data").await.unwrap();
        assert!(store.exists(Path::new("silence.mp3")).await.unwrap());
    }

    #[tokio::test]
    async fn test_import_moves_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let scratch = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp_dir.path()).unwrap();
        let source = scratch.path().join("download.mp3");
        std::fs::write(&source, b"audio").unwrap();
        store.import(&source, Path::new("episodes/ep.mp3")).await.unwrap();
        assert!(!source.exists());
        assert_eq!(store.read(Path::new("episodes/ep.mp3")).await.unwrap(), b"audio");
    }

    #[tokio::test]
    async fn test_import_missing_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp_dir.path()).unwrap();
        let err = store.import(&temp_dir.path().join("nope.mp3"), Path::new("x.mp3")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_locate() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp_dir.path()).unwrap();
        let err = store.locate(Path::new("silence.mp3")).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
        store.write(Path::new("silence.mp3"), b"data").await.unwrap();
        let located = store.locate(Path::new("silence.mp3")).await.unwrap();
        assert_eq!(located.path(), temp_dir.path().join("silence.mp3"));
        assert!(matches!(located, Located::Persisted(_)));
    }

    #[tokio::test]
    async fn test_path_security() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(temp_dir.path()).unwrap();
        assert!(store.read(Path::new("../etc/passwd")).await.is_err());
        assert!(store.write(Path::new("../etc/passwd"), b"data").await.is_err());
        assert!(store.exists(Path::new("../../file")).await.is_err());
    }
}
