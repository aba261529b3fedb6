use std::path::{Path, PathBuf};
use tempfile::TempPath;

/// A filesystem location for an artifact, handed to external tools that can
/// only work on real paths.
///
/// Stores that keep artifacts on disk hand out the artifact's own path. Stores
/// that don't (the in-memory mock) materialize a temporary copy that is
/// deleted once this value is dropped, so keep it alive for as long as the
/// tool needs the file.
#[derive(Debug)]
pub enum Located {
    Persisted(PathBuf),
    Temporary(TempPath),
}
impl Located {
    pub fn path(&self) -> &Path {
        match self {
            Self::Persisted(path) => path,
            Self::Temporary(temp) => temp,
        }
    }
}
impl AsRef<Path> for Located {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}
