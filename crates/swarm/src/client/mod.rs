//! Swarm client trait and implementations.

mod aria2;
#[cfg(any(test, feature = "mock"))]
mod stub;

pub use self::aria2::Aria2;
#[cfg(any(test, feature = "mock"))]
pub use self::stub::StubSwarmClient;
use crate::MagnetLink;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// The peer-to-peer operations the pipeline needs from a BitTorrent client.
///
/// Every call blocks (asynchronously) until the client is done; there are no
/// timeouts beyond whatever the client itself enforces.
#[async_trait]
pub trait SwarmClient: Send + Sync {
    /// Fetch only the swarm metadata (the `.torrent` contents) for a magnet.
    async fn fetch_metadata(&self, magnet: &MagnetLink) -> Result<Vec<u8>>;

    /// List the files of the swarm described by the metadata file, one row
    /// per file in `<index>|./<path>` form.
    async fn list_files(&self, metadata: &Path) -> Result<String>;

    /// Download only the file at `index` into `destination`.
    ///
    /// Clients work in pieces rather than files, so neighbouring files that
    /// share a piece with the requested one may be (partially) written to
    /// `destination` as well.
    async fn fetch_file(&self, metadata: &Path, index: u32, destination: &Path) -> Result<()>;
}
