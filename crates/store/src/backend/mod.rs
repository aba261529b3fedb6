//! Artifact store trait and implementations.
//!
//! The pipeline never keeps a ledger of completed work. Whether a step has
//! run is answered by asking the store whether that step's canonical file
//! exists, so everything the pipeline persists goes through [`ArtifactStore`].

mod local;
#[cfg(feature = "mock")]
mod mock;

pub use self::local::LocalStore;
#[cfg(feature = "mock")]
pub use self::mock::MockStore;
use crate::Located;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Unified interface over wherever canonical files live.
///
/// # Path Handling
/// All paths are relative to the store root and are validated using
/// [`validate_path`](crate::validate_path) before use. Implementations must
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use chapterfeed_store::{ArtifactStore, error::Result};
///
/// async fn cached_or_fetched(store: &dyn ArtifactStore, fetch: impl Fn() -> Vec<u8>) -> Result<Vec<u8>> {
///     let path = Path::new("swarm.torrent");
///     if !store.exists(path).await? {
///         store.write(path, &fetch()).await?;
///     }
///     store.read(path).await
/// }
/// ```
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Check if an artifact exists.
    ///
    /// This is the only "is this step done" signal the pipeline has.
    async fn exists(&self, path: &Path) -> Result<bool>;

    /// Read artifact contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the artifact
    /// does not exist.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write artifact contents, creating or overwriting.
    ///
    /// Implementations should create parent directories as needed.
    async fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Move a file from the local filesystem (outside the store) into the
    /// store at `path`.
    ///
    /// The source file no longer exists once this returns successfully. If
    /// the destination already exists, it will be overwritten.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// # use chapterfeed_store::{ArtifactStore, error::Result};
    /// # async fn example(store: &dyn ArtifactStore) -> Result<()> {
    /// let scratch = tempfile::tempdir().unwrap();
    /// let download = scratch.path().join("download.mp3");
    /// // ... some tool writes to `download` ...
    /// store.import(&download, Path::new("episodes/episode.mp3")).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn import(&self, source: &Path, path: &Path) -> Result<()>;

    /// Resolve an artifact to a path on the local filesystem that external
    /// tools can read.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the artifact
    /// does not exist.
    async fn locate(&self, path: &Path) -> Result<Located>;
}
