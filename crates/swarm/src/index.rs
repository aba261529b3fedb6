//! Index of which swarm file holds which chapter.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chapterfeed_feed::models::ChapterKey;
use chapterfeed_store::ArtifactStore;
use exn::ResultExt;
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::{MagnetLink, SwarmClient};

/// A chapter-title clip inside the swarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub book: u32,
    pub chapter: u32,
    /// 1-based file index, as the swarm client counts them
    pub index: u32,
    /// Path of the file within the swarm, including the top-level directory
    pub path: PathBuf,
}
impl ArchiveEntry {
    pub fn key(&self) -> ChapterKey {
        ChapterKey::new(self.book, self.chapter)
    }
}

/// Swarm files keyed by book, then chapter. Last listed row wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveIndex {
    books: BTreeMap<u32, BTreeMap<u32, ArchiveEntry>>,
}
impl ArchiveIndex {
    pub fn insert(&mut self, entry: ArchiveEntry) -> Option<ArchiveEntry> {
        self.books.entry(entry.book).or_default().insert(entry.chapter, entry)
    }

    pub fn get(&self, key: ChapterKey) -> Option<&ArchiveEntry> {
        self.books.get(&key.book).and_then(|chapters| chapters.get(&key.chapter))
    }

    pub fn len(&self) -> usize {
        self.books.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl FromIterator<ArchiveEntry> for ArchiveIndex {
    fn from_iter<T: IntoIterator<Item = ArchiveEntry>>(iter: T) -> Self {
        let mut index = Self::default();
        for entry in iter {
            index.insert(entry);
        }
        index
    }
}

/// Parses one row of a swarm file listing.
///
/// ```
/// use chapterfeed_swarm::parse_listing_row;
/// let entry = parse_listing_row("7|./X/Book 3 Something/Chapter 12 Foo.mp3").unwrap();
/// assert_eq!((entry.index, entry.book, entry.chapter), (7, 3, 12));
/// assert_eq!(entry.path.to_str(), Some("X/Book 3 Something/Chapter 12 Foo.mp3"));
/// ```
pub fn parse_listing_row(row: &str) -> Option<ArchiveEntry> {
    let captures = consts::LISTING_ROW_REGEX.captures(row)?;
    let book: u32 = captures.get(3)?.as_str().parse().ok()?;
    let chapter: u32 = captures.get(4)?.as_str().parse().ok()?;
    if book == 0 || chapter == 0 {
        return None;
    }
    Some(ArchiveEntry {
        index: captures.get(1)?.as_str().parse().ok()?,
        path: PathBuf::from(captures.get(2)?.as_str()),
        book,
        chapter,
    })
}

/// Builds an [`ArchiveIndex`] from a complete swarm file listing, skipping
/// every row that isn't a chapter clip (headers, size rows, separators,
/// other files).
pub fn parse_listing(listing: &str) -> ArchiveIndex {
    listing.lines().filter_map(parse_listing_row).collect()
}

/// Resolves the chapter index of the swarm.
///
/// The swarm metadata is fetched through `client` only when the store does
/// not already hold it under [`MagnetLink::metadata_path`]; afterwards the
/// cached copy is used forever.
#[instrument(skip_all, fields(info_hash = magnet.info_hash(), chapters))]
pub async fn resolve_index(
    store: &dyn ArtifactStore,
    client: &dyn SwarmClient,
    magnet: &MagnetLink,
) -> Result<ArchiveIndex> {
    let metadata_path = magnet.metadata_path();
    if store.exists(&metadata_path).await.or_raise(|| ErrorKind::Store)? {
        tracing::debug!(path = %metadata_path.display(), "Using cached swarm metadata");
    } else {
        tracing::info!(%magnet, "Fetching swarm metadata");
        let metadata = client.fetch_metadata(magnet).await?;
        store.write(&metadata_path, &metadata).await.or_raise(|| ErrorKind::Store)?;
    }
    let located = store.locate(&metadata_path).await.or_raise(|| ErrorKind::Store)?;
    let listing = client.list_files(located.path()).await?;
    let index = parse_listing(&listing);
    tracing::Span::current().record("chapters", index.len());
    Ok(index)
}
