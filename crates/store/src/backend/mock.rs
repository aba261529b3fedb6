//! In-memory artifact store for testing.

use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use crate::{ArtifactStore, Located};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// In-memory artifact store for testing.
///
/// Artifacts are stored in a `HashMap` behind a [`RwLock`], so all trait
/// methods can operate on `&self` without external synchronisation. Only
/// [`locate()`](ArtifactStore::locate) touches the filesystem, because the
/// caller asked for a real path.
///
/// # Examples
///
/// ```
/// use chapterfeed_store::{ArtifactStore, backend::MockStore};
/// use std::path::Path;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MockStore::with_files([("silence.mp3", b"ID3")]);
/// assert!(store.exists(Path::new("silence.mp3")).await?);
/// assert!(!store.exists(Path::new("chapters/one.mp3")).await?);
/// # Ok(())
/// # }
/// ```
pub struct MockStore {
    storage: RwLock<HashMap<PathBuf, Vec<u8>>>,
}

impl MockStore {
    /// Create a mock store pre-populated with artifacts.
    ///
    /// Panics if any path fails validation (e.g. path traversal). If test
    /// setup is wrong, then test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                panic!("MockStore::with_files: invalid path {}", path.display());
            };
            map.insert(validated, data.into());
        }
        Self { storage: RwLock::new(map) }
    }

    /// Every artifact path currently held, sorted.
    pub async fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.storage.read().await.keys().cloned().collect();
        paths.sort();
        paths
    }
}
impl Default for MockStore {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

#[async_trait]
impl ArtifactStore for MockStore {
    async fn exists(&self, path: &Path) -> Result<bool> {
        let path = validate_path(path)?;
        Ok(self.storage.read().await.contains_key(&path))
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let path = validate_path(path)?;
        self.storage.read().await.get(&path).cloned().ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path)))
    }

    async fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let path = validate_path(path)?;
        self.storage.write().await.insert(path, data.to_vec());
        Ok(())
    }

    async fn import(&self, source: &Path, path: &Path) -> Result<()> {
        let path = validate_path(path)?;
        let data = tokio::fs::read(source).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(source.to_path_buf()),
            _ => ErrorKind::Io(e),
        })?;
        tokio::fs::remove_file(source).await.map_err(ErrorKind::Io)?;
        self.storage.write().await.insert(path, data);
        Ok(())
    }

    async fn locate(&self, path: &Path) -> Result<Located> {
        let data = self.read(path).await?;
        // Keep the extension: tools like ffmpeg guess the container from it.
        let suffix = path.extension().map(|ext| format!(".{}", ext.to_string_lossy())).unwrap_or_default();
        let mut temp = tempfile::Builder::new().suffix(&suffix).tempfile().map_err(ErrorKind::Io)?;
        temp.write_all(&data).map_err(ErrorKind::Io)?;
        Ok(Located::Temporary(temp.into_temp_path()))
    }
}
