//! Shared test doubles for pipeline tests.

use crate::error::{ErrorKind, Result};
use crate::http::Fetcher;
use crate::{Context, Services};
use async_trait::async_trait;
use chapterfeed_config::Config;
use chapterfeed_feed::ChannelInfo;
use chapterfeed_media::{StubProbe, StubTranscoder};
use chapterfeed_store::StoreHandle;
use chapterfeed_store::backend::{LocalStore, MockStore};
use chapterfeed_swarm::StubSwarmClient;
use exn::ResultExt;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub(crate) const MIB: usize = 1024 * 1024;
pub(crate) const FEED_URL: &str = "https://podcast.example.org/feed.xml";
pub(crate) const HASH: &str = "0123456789abcdef0123456789abcdef01234567";
pub(crate) const PUBLISHED: &str = "Mon, 01 Jan 2024 00:00:00 +0000";

/// Serves registered documents; every other URL downloads as a fixed-size
/// episode.
pub(crate) struct StubFetcher {
    documents: Mutex<HashMap<String, Vec<u8>>>,
    episode_bytes: usize,
    downloads: AtomicUsize,
}
impl StubFetcher {
    pub(crate) fn new(episode_bytes: usize) -> Self {
        Self { documents: Mutex::new(HashMap::new()), episode_bytes, downloads: AtomicUsize::new(0) }
    }

    pub(crate) fn serve(&self, url: &str, document: impl Into<Vec<u8>>) {
        self.documents.lock().unwrap().insert(url.to_string(), document.into());
    }

    pub(crate) fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let document = self.documents.lock().unwrap().get(url).cloned();
        match document {
            Some(document) => Ok(document),
            None => exn::bail!(ErrorKind::Network),
        }
    }

    async fn download(&self, _url: &str, destination: &Path) -> Result<u64> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(destination, vec![0xAA; self.episode_bytes]).await.or_raise(|| ErrorKind::Storage)?;
        Ok(self.episode_bytes as u64)
    }
}

/// Path of a chapter clip inside the stub swarm.
pub(crate) fn swarm_path(book: u32, chapter: u32) -> String {
    format!("Harry Potter/Book {book} - Part {book}/Chapter {chapter:02} - Title {chapter}.mp3")
}

/// An `aria2c --show-files` style listing with one row per chapter, indexed
/// from one in the given order.
pub(crate) fn listing(chapters: &[(u32, u32)]) -> String {
    let mut listing = String::from("idx|path/length\n===+===\n");
    for (index, (book, chapter)) in (1..).zip(chapters) {
        listing.push_str(&format!("{index:>3}|./{}\n   |1.0MiB (1,048,576)\n---+---\n", swarm_path(*book, *chapter)));
    }
    listing
}

/// A narration feed with one episode per chapter, plus an unrelated item.
pub(crate) fn feed_document(chapters: &[(u32, u32)]) -> String {
    let items: String = chapters
        .iter()
        .map(|(book, chapter)| {
            format!(
                r#"<item><title>Book {book}, Chapter {chapter}</title><enclosure url="https://podcast.example.org/{book}-{chapter}.mp3" length="0" type="audio/mpeg"/><pubDate>{PUBLISHED}</pubDate></item>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Narration</title><link>https://podcast.example.org/</link><description>D</description><item><title>Bonus: Live Show</title><enclosure url="https://podcast.example.org/live.mp3" length="0" type="audio/mpeg"/></item>{items}</channel></rss>"#
    )
}

/// A complete set of stubbed services.
pub(crate) struct Fixture {
    pub(crate) store: StoreHandle,
    pub(crate) swarm: Arc<StubSwarmClient>,
    pub(crate) transcoder: Arc<StubTranscoder>,
    pub(crate) probe: Arc<StubProbe>,
    pub(crate) fetcher: Arc<StubFetcher>,
    pub(crate) config: Config,
    _root: Option<TempDir>,
}
impl Fixture {
    /// Every chapter is in the swarm and every artifact is large enough.
    pub(crate) fn new(chapters: &[(u32, u32)]) -> Self {
        Self::sized(chapters, MIB, MIB)
    }

    /// Chapter clips of `chapter_bytes` and episodes of `episode_bytes`.
    ///
    /// Fetching a chapter also drops a partial copy of the next chapter in
    /// the scratch directory, like a real client sharing a piece.
    pub(crate) fn sized(chapters: &[(u32, u32)], chapter_bytes: usize, episode_bytes: usize) -> Self {
        let mut swarm = StubSwarmClient::new(listing(chapters));
        for (index, (book, chapter)) in (1..).zip(chapters) {
            swarm = swarm
                .with_file(index, swarm_path(*book, *chapter), vec![*chapter as u8; chapter_bytes])
                .with_file(index, swarm_path(*book, chapter + 1), vec![0; 64]);
        }
        let mut config = Config::default();
        config.feed.url = FEED_URL.to_string();
        config.swarm.info_hash = HASH.to_string();
        Self {
            store: Arc::new(MockStore::default()),
            swarm: Arc::new(swarm),
            transcoder: Arc::new(StubTranscoder::default()),
            probe: Arc::new(StubProbe::new(1834)),
            fetcher: Arc::new(StubFetcher::new(episode_bytes)),
            config,
            _root: None,
        }
    }

    /// Same services, but artifacts live in a real directory so their
    /// located paths are stable.
    pub(crate) fn on_disk(mut self) -> Self {
        let root = tempfile::tempdir().unwrap();
        self.store = Arc::new(LocalStore::new(root.path()).unwrap());
        self._root = Some(root);
        self
    }

    pub(crate) fn with_swarm(mut self, swarm: StubSwarmClient) -> Self {
        self.swarm = Arc::new(swarm);
        self
    }

    pub(crate) fn with_transcoder(mut self, transcoder: StubTranscoder) -> Self {
        self.transcoder = Arc::new(transcoder);
        self
    }

    pub(crate) fn services(&self) -> Services {
        Services {
            store: self.store.clone(),
            swarm: self.swarm.clone(),
            transcoder: self.transcoder.clone(),
            probe: self.probe.clone(),
            fetcher: self.fetcher.clone(),
        }
    }

    /// A prepared context whose feed is `document`.
    pub(crate) async fn context(&self, document: &str) -> Context {
        self.fetcher.serve(FEED_URL, document);
        Context::prepare(self.services(), &self.config).await.unwrap()
    }

    pub(crate) async fn has(&self, path: &str) -> bool {
        self.store.exists(Path::new(path)).await.unwrap()
    }

    pub(crate) fn channel(&self) -> ChannelInfo {
        crate::assemble::channel_info(&self.config.channel)
    }
}
