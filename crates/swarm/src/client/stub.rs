//! Scripted swarm client for testing.

use crate::error::{ErrorKind, Result};
use crate::{MagnetLink, SwarmClient};
use async_trait::async_trait;
use exn::ResultExt;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Swarm client that never touches the network.
///
/// Returns a fixed listing, fixed metadata, and writes pre-registered files
/// into the destination directory when asked for a file index. Counts every
/// call so tests can assert on what was (not) fetched.
pub struct StubSwarmClient {
    listing: String,
    metadata: Vec<u8>,
    files: HashMap<u32, Vec<(PathBuf, Vec<u8>)>>,
    requested: Mutex<Vec<u32>>,
    metadata_fetches: AtomicUsize,
    listings: AtomicUsize,
}

impl StubSwarmClient {
    pub fn new(listing: impl Into<String>) -> Self {
        Self {
            listing: listing.into(),
            metadata: b"d4:infod4:name4:stubee".to_vec(),
            files: HashMap::new(),
            requested: Mutex::new(Vec::new()),
            metadata_fetches: AtomicUsize::new(0),
            listings: AtomicUsize::new(0),
        }
    }

    pub fn with_metadata(mut self, metadata: &[u8]) -> Self {
        self.metadata = metadata.to_vec();
        self
    }

    /// Register a file to write (relative to the destination) whenever
    /// `index` is fetched. Registering several files under one index mimics
    /// piece overlap with neighbouring files.
    pub fn with_file(mut self, index: u32, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) -> Self {
        self.files.entry(index).or_default().push((path.into(), data.into()));
        self
    }

    pub fn metadata_fetches(&self) -> usize {
        self.metadata_fetches.load(Ordering::SeqCst)
    }

    pub fn listings(&self) -> usize {
        self.listings.load(Ordering::SeqCst)
    }

    pub async fn file_fetches(&self) -> usize {
        self.requested.lock().await.len()
    }

    /// Every file index requested so far, in order.
    pub async fn requested(&self) -> Vec<u32> {
        self.requested.lock().await.clone()
    }
}

#[async_trait]
impl SwarmClient for StubSwarmClient {
    async fn fetch_metadata(&self, _magnet: &MagnetLink) -> Result<Vec<u8>> {
        self.metadata_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.metadata.clone())
    }

    async fn list_files(&self, metadata: &Path) -> Result<String> {
        if !tokio::fs::try_exists(metadata).await.or_raise(|| ErrorKind::Io)? {
            exn::bail!(ErrorKind::MissingMetadata);
        }
        self.listings.fetch_add(1, Ordering::SeqCst);
        Ok(self.listing.clone())
    }

    async fn fetch_file(&self, _metadata: &Path, index: u32, destination: &Path) -> Result<()> {
        self.requested.lock().await.push(index);
        for (path, data) in self.files.get(&index).into_iter().flatten() {
            let target = destination.join(path);
            if let Some(parent) = target.parent() {
                tokio::fs::create_dir_all(parent).await.or_raise(|| ErrorKind::Io)?;
            }
            tokio::fs::write(&target, data).await.or_raise(|| ErrorKind::Io)?;
        }
        Ok(())
    }
}
