//! Joining chapter clip, silence, and episode into one file.

use crate::Context;
use crate::artifact::SILENCE_PATH;
use crate::error::{ErrorKind, Result};
use chapterfeed_media::TranscodeJob;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Concatenates `inputs`, in the given order, into `target`.
///
/// The inputs are joined at the container level and then re-encoded to the
/// transcoder's output profile. Does nothing if `target` already exists.
#[instrument(skip(ctx, inputs), fields(target = %target.display(), inputs = inputs.len()))]
pub async fn concatenate(ctx: &Context, target: &Path, inputs: &[PathBuf]) -> Result<()> {
    let store = &ctx.services.store;
    if store.exists(target).await.or_raise(|| ErrorKind::Storage)? {
        tracing::info!("Concatenated file already present");
        return Ok(());
    }
    // Held until the transcoder is done; some stores only lend out temporary copies.
    let mut located = Vec::with_capacity(inputs.len());
    for input in inputs {
        located.push(store.locate(input).await.or_raise(|| ErrorKind::Storage)?);
    }

    let scratch = tempfile::tempdir().or_raise(|| ErrorKind::Storage)?;
    let output = scratch.path().join("concatenated.mp3");
    let job = TranscodeJob::Concatenate {
        inputs: located.iter().map(|l| l.path().to_path_buf()).collect(),
        output: output.clone(),
    };
    ctx.services.transcoder.transcode(&job).await.or_raise(|| ErrorKind::Tool)?;

    store.import(&output, target).await.or_raise(|| ErrorKind::Storage)?;
    tracing::info!("Concatenated file created");
    Ok(())
}

/// The pause placed between chapter title and episode, generated the first
/// time it is needed and reused forever after.
#[instrument(skip_all)]
pub async fn ensure_silence(ctx: &Context) -> Result<PathBuf> {
    let target = PathBuf::from(SILENCE_PATH);
    let store = &ctx.services.store;
    if store.exists(&target).await.or_raise(|| ErrorKind::Storage)? {
        return Ok(target);
    }
    let scratch = tempfile::tempdir().or_raise(|| ErrorKind::Storage)?;
    let output = scratch.path().join(SILENCE_PATH);
    let job = TranscodeJob::Silence { seconds: ctx.limits.silence_seconds, output: output.clone() };
    ctx.services.transcoder.transcode(&job).await.or_raise(|| ErrorKind::Tool)?;
    store.import(&output, &target).await.or_raise(|| ErrorKind::Storage)?;
    tracing::info!(seconds = ctx.limits.silence_seconds, "Silence clip generated");
    Ok(target)
}
