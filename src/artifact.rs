//! Canonical artifact paths.
//!
//! Every chapter produces three files in the store, one per [`ArtifactKind`],
//! all sharing a file stem rendered from a user-configured [upon] template.
//! The template sees two integer variables, `book` and `chapter`, and one
//! extra function:
//!
//! - **`pad`**: zero-pads an integer to a minimum width, usable as either
//!   `pad(book, 2)` or `{{ book|pad: 2 }}`.
//!
//! ```
//! use chapterfeed::artifact::{ArtifactKind, PathGenerator};
//! use chapterfeed_feed::models::ChapterKey;
//!
//! let generator: PathGenerator = "book{{ book|pad: 2 }}-{{ chapter }}".parse().unwrap();
//! let path = generator.generate(ChapterKey::new(3, 7), ArtifactKind::Episode).unwrap();
//! assert_eq!(path.to_str(), Some("episodes/book03-7.mp3"));
//! ```

use crate::error::{Error, ErrorKind, Result};
use chapterfeed_feed::models::ChapterKey;
use chapterfeed_store::validate_path;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use upon::{Engine, Template};

/// The shared ten-second pause, generated once at the store root.
pub const SILENCE_PATH: &str = "silence.mp3";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// The chapter-title clip cut from the audiobook swarm.
    Chapter,
    /// The volume-normalized narration episode.
    Episode,
    /// Chapter clip, silence, and episode joined together.
    Concatenated,
}
impl ArtifactKind {
    pub fn directory(self) -> &'static Path {
        Path::new(match self {
            Self::Chapter => "chapters",
            Self::Episode => "episodes",
            Self::Concatenated => "concatenated",
        })
    }
}

/// Generates canonical store paths for a chapter.
///
/// Constructed via [`FromStr`], which compiles the template eagerly so that
/// syntax errors surface at startup rather than halfway through a run.
pub struct PathGenerator {
    engine: Engine<'static>,
    template: Template<'static>,
}
impl FromStr for PathGenerator {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(s.to_string()).or_raise(|| ErrorKind::Config)?;
        Ok(Self { engine, template })
    }
}
impl PathGenerator {
    /// The file stem for `key`, without directory or extension.
    pub fn stem(&self, key: ChapterKey) -> Result<String> {
        let stem = self
            .template
            .render(&self.engine, upon::value! { book: i64::from(key.book), chapter: i64::from(key.chapter) })
            .to_string()
            .or_raise(|| ErrorKind::Config)?;
        let stem = stem.trim();
        if stem.is_empty() || stem.contains('/') {
            exn::bail!(ErrorKind::Config);
        }
        Ok(stem.to_string())
    }

    /// `<kind directory>/<stem>.mp3`, validated to stay inside the store.
    pub fn generate(&self, key: ChapterKey, kind: ArtifactKind) -> Result<PathBuf> {
        let path = kind.directory().join(format!("{}.mp3", self.stem(key)?));
        validate_path(&path).or_raise(|| ErrorKind::Config)
    }
}

mod addons {
    use upon::Engine;

    fn pad(value: i64, width: i64) -> String {
        let width = usize::try_from(width).unwrap_or(0);
        format!("{value:0width$}")
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_function("pad", pad);
    }
}
