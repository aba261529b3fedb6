//! The entry point: from feed and swarm to a written output feed.

use crate::artifact::ArtifactKind;
use crate::error::{ErrorKind, Lookup, Result};
use crate::{Context, acquire_chapter, acquire_episode, concatenate, ensure_silence};
use chapterfeed_config::ChannelConfig;
use chapterfeed_feed::models::ChapterKey;
use chapterfeed_feed::{ChannelInfo, OutputFeed, OutputItem};
use exn::{OptionExt, ResultExt};
use std::path::Path;
use time::OffsetDateTime;
use tracing::instrument;

pub fn channel_info(config: &ChannelConfig) -> ChannelInfo {
    ChannelInfo {
        title: config.title.clone(),
        description: config.description.clone(),
        link: config.link.clone(),
        image_url: config.image.clone(),
    }
}

/// Runs every stage for the most recent chapters and builds the feed.
///
/// Chapters are processed one after another, newest first; the first failure
/// stops the run.
#[instrument(skip_all, fields(base_url = %base_url, items))]
pub async fn build_feed(
    ctx: &Context,
    channel: ChannelInfo,
    base_url: &str,
    built_at: OffsetDateTime,
) -> Result<OutputFeed> {
    let mut feed = OutputFeed::new(channel, built_at);
    for key in ctx.feed.most_recent(ctx.limits.recent) {
        feed.push(assemble_item(ctx, key, base_url).await?);
    }
    tracing::Span::current().record("items", feed.items().len());
    Ok(feed)
}

/// Builds the feed and overwrites `target` with it.
///
/// Nothing is written unless every selected chapter made it through.
pub async fn assemble(ctx: &Context, channel: ChannelInfo, base_url: &str, target: &Path) -> Result<OutputFeed> {
    let feed = build_feed(ctx, channel, base_url, OffsetDateTime::now_utc()).await?;
    let xml = feed.to_xml().or_raise(|| ErrorKind::Format)?;
    tokio::fs::write(target, xml).await.or_raise(|| ErrorKind::Storage)?;
    tracing::info!(path = %target.display(), items = feed.items().len(), "Feed written");
    Ok(feed)
}

#[instrument(skip(ctx, base_url), fields(book = key.book, chapter = key.chapter))]
async fn assemble_item(ctx: &Context, key: ChapterKey, base_url: &str) -> Result<OutputItem> {
    let entry = ctx.feed.get(key).ok_or_raise(|| ErrorKind::NotFound { key, index: Lookup::Feed })?;
    let chapter = acquire_chapter(ctx, key).await?;
    let episode = acquire_episode(ctx, key).await?;
    let silence = ensure_silence(ctx).await?;
    let target = ctx.paths.generate(key, ArtifactKind::Concatenated)?;
    concatenate(ctx, &target, &[chapter, silence, episode]).await?;

    let located = ctx.services.store.locate(&target).await.or_raise(|| ErrorKind::Storage)?;
    let length = ctx.services.probe.probe(located.path()).await.or_raise(|| ErrorKind::Tool)?;
    Ok(OutputItem {
        title: key.to_string(),
        publish_date: entry.publish_date.clone(),
        url: enclosure_url(base_url, &target),
        media_type: entry.media_type.clone(),
        length,
    })
}

/// `base_url` is a literal prefix; no separator is added.
fn enclosure_url(base_url: &str, relative: &Path) -> String {
    let path = relative.iter().map(|part| part.to_string_lossy()).collect::<Vec<_>>().join("/");
    format!("{base_url}{path}")
}
