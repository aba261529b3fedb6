use super::check_integrity;
use crate::Context;
use crate::artifact::ArtifactKind;
use crate::error::{ErrorKind, Lookup, Result};
use chapterfeed_feed::models::ChapterKey;
use exn::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;

/// Cuts the chapter-title clip for `key` out of the audiobook swarm.
///
/// Only the one file index is requested, into a scratch directory that is
/// removed however this returns. Swarm clients download whole pieces, so
/// neighbouring chapters may show up in the scratch directory too; the clip
/// is picked by its path inside the swarm, never by being the only file.
#[instrument(skip(ctx), fields(book = key.book, chapter = key.chapter))]
pub async fn acquire_chapter(ctx: &Context, key: ChapterKey) -> Result<PathBuf> {
    let target = ctx.paths.generate(key, ArtifactKind::Chapter)?;
    let store = &ctx.services.store;
    if store.exists(&target).await.or_raise(|| ErrorKind::Storage)? {
        tracing::info!(path = %target.display(), "Chapter clip already present");
        return Ok(target);
    }
    let entry = ctx.archive.get(key).ok_or_raise(|| ErrorKind::NotFound { key, index: Lookup::Archive })?;
    let metadata = store.locate(&ctx.magnet.metadata_path()).await.or_raise(|| ErrorKind::Storage)?;

    let scratch = tempfile::tempdir().or_raise(|| ErrorKind::Storage)?;
    tracing::info!(index = entry.index, path = %entry.path.display(), "Fetching chapter clip from swarm");
    ctx.services
        .swarm
        .fetch_file(metadata.path(), entry.index, scratch.path())
        .await
        .or_raise(|| ErrorKind::Tool)?;

    let found = find_download(scratch.path(), &entry.path)?
        .ok_or_raise(|| ErrorKind::Extraction { expected: entry.path.clone() })?;
    let size = tokio::fs::metadata(&found).await.or_raise(|| ErrorKind::Storage)?.len();
    check_integrity(&target, size, ctx.limits.min_artifact_bytes)?;

    store.import(&found, &target).await.or_raise(|| ErrorKind::Storage)?;
    tracing::info!(path = %target.display(), size, "Chapter clip acquired");
    Ok(target)
}

/// The `.mp3` under `root` whose trailing path components equal `expected`.
fn find_download(root: &Path, expected: &Path) -> Result<Option<PathBuf>> {
    for entry in WalkDir::new(root) {
        let entry = entry.or_raise(|| ErrorKind::Storage)?;
        let path = entry.path();
        let is_mp3 = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
        if !entry.file_type().is_file() || !is_mp3 {
            continue;
        }
        tracing::trace!(path = %path.display(), "Swarm download candidate");
        if path.strip_prefix(root).is_ok_and(|relative| relative.ends_with(expected)) {
            return Ok(Some(path.to_path_buf()));
        }
    }
    Ok(None)
}
