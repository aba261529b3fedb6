//! Builds a podcast feed that plays each audiobook chapter's title, read by
//! the audiobook narrator, before the narration podcast episode about that
//! chapter.
//!
//! A run is a straight line: read the narration feed, resolve the swarm's
//! chapter index, then for each of the most recent chapters acquire the
//! chapter clip, acquire the episode, join them, and finally write the feed.
//! Every stage checks whether its canonical file already exists in the
//! [`ArtifactStore`](chapterfeed_store::ArtifactStore) and does nothing if so,
//! which is the only thing making reruns cheap.

pub mod acquire;
pub mod artifact;
pub mod assemble;
pub mod concat;
pub mod error;
pub mod http;
#[cfg(test)]
mod testing;

use crate::artifact::PathGenerator;
use crate::error::{ErrorKind, Result};
use crate::http::{Fetcher, ReqwestFetcher};
use chapterfeed_config::{Config, Limits};
use chapterfeed_feed::FeedIndex;
use chapterfeed_media::{DurationProbe, Ffmpeg, Ffprobe, Transcoder};
use chapterfeed_store::StoreHandle;
use chapterfeed_store::backend::LocalStore;
use chapterfeed_swarm::error::ErrorKind as SwarmErrorKind;
use chapterfeed_swarm::{Aria2, ArchiveIndex, MagnetLink, SwarmClient};
use exn::ResultExt;
use std::sync::Arc;
use tracing::instrument;

pub use crate::acquire::{acquire_chapter, acquire_episode};
pub use crate::assemble::{assemble, build_feed};
pub use crate::concat::{concatenate, ensure_silence};

/// Everything the pipeline talks to outside its own memory.
#[derive(Clone)]
pub struct Services {
    pub store: StoreHandle,
    pub swarm: Arc<dyn SwarmClient>,
    pub transcoder: Arc<dyn Transcoder>,
    pub probe: Arc<dyn DurationProbe>,
    pub fetcher: Arc<dyn Fetcher>,
}
impl Services {
    /// The production services: the library directory on disk, aria2c,
    /// ffmpeg and ffprobe (explicit paths or `PATH`), and a real HTTP client.
    pub fn discover(config: &Config) -> Result<Self> {
        let root = std::path::absolute(&config.library.root).or_raise(|| ErrorKind::Config)?;
        let store = LocalStore::new(root).or_raise(|| ErrorKind::Storage)?;
        let tools = &config.tools;
        Ok(Self {
            store: Arc::new(store),
            swarm: Arc::new(Aria2::discover(tools.aria2c.as_deref()).or_raise(|| ErrorKind::Tool)?),
            transcoder: Arc::new(Ffmpeg::discover(tools.ffmpeg.as_deref()).or_raise(|| ErrorKind::Tool)?),
            probe: Arc::new(Ffprobe::discover(tools.ffprobe.as_deref()).or_raise(|| ErrorKind::Tool)?),
            fetcher: Arc::new(ReqwestFetcher::new()?),
        })
    }
}

/// Per-run state shared by every stage.
pub struct Context {
    pub services: Services,
    pub paths: PathGenerator,
    pub limits: Limits,
    pub magnet: MagnetLink,
    pub feed: FeedIndex,
    pub archive: ArchiveIndex,
}
impl Context {
    /// Reads the narration feed and resolves the swarm's chapter index.
    ///
    /// Both indexes are rebuilt from scratch on every run; only the swarm
    /// metadata is cached between runs.
    #[instrument(skip_all, fields(feed = %config.feed.url, episodes, chapters))]
    pub async fn prepare(services: Services, config: &Config) -> Result<Self> {
        let paths: PathGenerator = config.library.template.parse()?;
        let swarm = &config.swarm;
        let magnet = MagnetLink::new(&swarm.info_hash, &swarm.display_name, &swarm.trackers)
            .or_raise(|| ErrorKind::Config)?;

        let document = services.fetcher.fetch(&config.feed.url).await?;
        let feed = chapterfeed_feed::parse(document).or_raise(|| ErrorKind::Format)?;
        tracing::Span::current().record("episodes", feed.len());

        let archive =
            match chapterfeed_swarm::resolve_index(services.store.as_ref(), services.swarm.as_ref(), &magnet).await {
                Ok(archive) => archive,
                Err(e) if matches!(&*e, SwarmErrorKind::Store) => return Err(e).or_raise(|| ErrorKind::Storage),
                Err(e) => return Err(e).or_raise(|| ErrorKind::Tool),
            };
        tracing::Span::current().record("chapters", archive.len());

        Ok(Self {
            services,
            paths,
            limits: config.limits.clone(),
            magnet,
            feed,
            archive,
        })
    }
}
