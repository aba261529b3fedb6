//! Layered configuration.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults,
//! 2. `config.toml` in the user's configuration directory,
//! 3. `chapterfeed.toml` in the working directory, or an explicit file,
//! 4. `CHAPTERFEED_`-prefixed environment variables, nested keys split on
//!    `__` (for example `CHAPTERFEED_LIMITS__RECENT=3`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const LOCAL_FILE: &str = "chapterfeed.toml";
const ENV_PREFIX: &str = "CHAPTERFEED_";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub swarm: SwarmConfig,
    pub library: LibraryConfig,
    pub channel: ChannelConfig,
    pub tools: ToolsConfig,
    pub limits: Limits,
}

/// The narration podcast to follow.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Required.
    pub url: String,
}

/// The audiobook swarm holding the chapter-title clips.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Required; 40 hexadecimal characters.
    pub info_hash: String,
    pub display_name: String,
    pub trackers: Vec<String>,
}
impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            info_hash: String::new(),
            display_name: "Harry Potter".to_string(),
            trackers: vec![
                "udp://tracker.opentrackr.org:1337/announce".to_string(),
                "udp://open.demonii.com:1337/announce".to_string(),
                "udp://tracker.torrent.eu.org:451/announce".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory holding every artifact; relative paths resolve against the
    /// working directory.
    pub root: PathBuf,
    /// File stem template, rendered with `book` and `chapter`.
    pub template: String,
}
impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            template: "harry_potter_book_{{ book|pad: 2 }}_chapter_{{ chapter|pad: 2 }}".to_string(),
        }
    }
}

/// Metadata of the generated feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub title: String,
    pub description: String,
    pub link: String,
    pub image: String,
}
impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            title: "Harry Potter and the Chapter Titles".to_string(),
            description: "Each chapter title, read by the audiobook narrator, followed by its podcast episode."
                .to_string(),
            link: "https://example.com/".to_string(),
            image: "https://example.com/cover.jpg".to_string(),
        }
    }
}

/// Explicit executable paths; unset means search `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
    pub aria2c: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// How many of the newest chapters make it into the feed.
    pub recent: usize,
    /// Downloads smaller than this are treated as corrupt.
    pub min_artifact_bytes: u64,
    /// Volume multiplier applied to every episode.
    pub gain: f32,
    /// Length of the pause between chapter title and episode.
    pub silence_seconds: u32,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            recent: 5,
            min_artifact_bytes: 1024 * 1024,
            gain: 0.60,
            silence_seconds: 10,
        }
    }
}

impl Config {
    /// Loads and validates configuration from every source.
    ///
    /// When `explicit` is given it replaces `./chapterfeed.toml` and must
    /// exist; the other files are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let working_dir = std::env::current_dir().or_raise(|| ErrorKind::Load)?;
        Self::load_from(explicit, &working_dir)
    }

    /// [`load`](Self::load) with `working_dir` standing in for the process
    /// working directory. Parent directories are never searched.
    fn load_from(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(dirs) = ProjectDirs::from("", "", "chapterfeed") {
            let user = dirs.config_dir().join("config.toml");
            tracing::debug!(path = %user.display(), "User configuration file");
            figment = figment.merge(Toml::file_exact(user));
        }
        figment = match explicit {
            Some(path) => {
                if !path.is_file() {
                    exn::bail!(ErrorKind::Invalid(format!("configuration file {} does not exist", path.display())));
                }
                figment.merge(Toml::file_exact(path))
            },
            None => figment.merge(Toml::file_exact(working_dir.join(LOCAL_FILE))),
        };
        Self::from_figment(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extracts and validates configuration from already-layered sources.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed.url.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("feed.url is required".to_string()));
        }
        let hash = self.swarm.info_hash.trim();
        if hash.len() != 40 || !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            exn::bail!(ErrorKind::Invalid(format!(
                "swarm.info_hash must be 40 hexadecimal characters, got {hash:?}"
            )));
        }
        if self.limits.recent == 0 {
            exn::bail!(ErrorKind::Invalid("limits.recent must be positive".to_string()));
        }
        if !(self.limits.gain > 0.0 && self.limits.gain <= 1.0) {
            exn::bail!(ErrorKind::Invalid(format!("limits.gain must be in (0, 1], got {}", self.limits.gain)));
        }
        if self.library.template.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("library.template must not be empty".to_string()));
        }
        Ok(())
    }
}
