//! Acquisition stages: each fills in one canonical file per chapter.

mod chapter;
mod episode;

pub use self::chapter::acquire_chapter;
pub use self::episode::acquire_episode;

use crate::error::{ErrorKind, Result};
use std::path::Path;

/// Rejects downloads too small to be real audio.
///
/// `path` is the canonical path the download was meant for; it is reported
/// in the error and never created.
fn check_integrity(path: &Path, size: u64, minimum: u64) -> Result<()> {
    if size < minimum {
        tracing::warn!(path = %path.display(), size, minimum, "Download is too small");
        exn::bail!(ErrorKind::Integrity { path: path.to_path_buf(), size });
    }
    Ok(())
}
