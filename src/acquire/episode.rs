use super::check_integrity;
use crate::Context;
use crate::artifact::ArtifactKind;
use crate::error::{ErrorKind, Lookup, Result};
use chapterfeed_feed::models::ChapterKey;
use chapterfeed_media::TranscodeJob;
use exn::{OptionExt, ResultExt};
use std::path::PathBuf;
use tracing::instrument;

/// Downloads the narration episode for `key` and normalizes its volume.
#[instrument(skip(ctx), fields(book = key.book, chapter = key.chapter))]
pub async fn acquire_episode(ctx: &Context, key: ChapterKey) -> Result<PathBuf> {
    let target = ctx.paths.generate(key, ArtifactKind::Episode)?;
    let store = &ctx.services.store;
    if store.exists(&target).await.or_raise(|| ErrorKind::Storage)? {
        tracing::info!(path = %target.display(), "Episode already present");
        return Ok(target);
    }
    let entry = ctx.feed.get(key).ok_or_raise(|| ErrorKind::NotFound { key, index: Lookup::Feed })?;

    let scratch = tempfile::tempdir().or_raise(|| ErrorKind::Storage)?;
    let download = scratch.path().join("download.mp3");
    tracing::info!(url = %entry.url, "Downloading episode");
    let size = ctx.services.fetcher.download(&entry.url, &download).await?;
    check_integrity(&target, size, ctx.limits.min_artifact_bytes)?;

    let normalized = scratch.path().join("normalized.mp3");
    let job = TranscodeJob::Normalize { input: download, output: normalized.clone(), gain: ctx.limits.gain };
    ctx.services.transcoder.transcode(&job).await.or_raise(|| ErrorKind::Tool)?;

    store.import(&normalized, &target).await.or_raise(|| ErrorKind::Storage)?;
    tracing::info!(path = %target.display(), size, "Episode acquired");
    Ok(target)
}
