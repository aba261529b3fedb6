use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use url::form_urlencoded::Serializer;

use crate::consts;
use crate::error::{ErrorKind, Result};

/// A magnet locator for a BitTorrent v1 swarm.
///
/// ```
/// use chapterfeed_swarm::MagnetLink;
/// let magnet = MagnetLink::new(
///     "0123456789ABCDEF0123456789ABCDEF01234567",
///     "Audiobooks",
///     ["udp://tracker.example.org:1337/announce"],
/// ).unwrap();
/// assert_eq!(
///     magnet.to_string(),
///     "magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567&dn=Audiobooks&tr=udp%3A%2F%2Ftracker.example.org%3A1337%2Fannounce",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagnetLink {
    info_hash: String,
    display_name: String,
    trackers: Vec<String>,
}
impl MagnetLink {
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidInfoHash`] unless `info_hash` is exactly 40
    /// hexadecimal characters.
    pub fn new(
        info_hash: impl AsRef<str>,
        display_name: impl Into<String>,
        trackers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self> {
        let info_hash = info_hash.as_ref().trim();
        if !consts::INFO_HASH_REGEX.is_match(info_hash) {
            exn::bail!(ErrorKind::InvalidInfoHash(info_hash.to_string()));
        }
        Ok(Self {
            info_hash: info_hash.to_ascii_lowercase(),
            display_name: display_name.into(),
            trackers: trackers.into_iter().map(Into::into).collect(),
        })
    }

    /// Lowercase hexadecimal info hash.
    pub fn info_hash(&self) -> &str {
        &self.info_hash
    }

    /// Store path of the cached swarm metadata, `<hash>.torrent` at the root.
    pub fn metadata_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.torrent", self.info_hash))
    }
}
impl Display for MagnetLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let params = Serializer::new(String::new())
            .append_pair("dn", &self.display_name)
            .extend_pairs(self.trackers.iter().map(|tracker| ("tr", tracker)))
            .finish();
        write!(f, "magnet:?xt=urn:btih:{}&{params}", self.info_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const HASH: &str = "0123456789abcdef0123456789abcdef01234567";

    #[rstest]
    #[case("")]
    #[case("0123456789abcdef")]
    #[case("0123456789abcdef0123456789abcdef0123456g")]
    #[case("0123456789abcdef0123456789abcdef012345678")]
    fn test_rejects_invalid_hash(#[case] hash: &str) {
        let err = MagnetLink::new(hash, "name", Vec::<String>::new()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidInfoHash(_)));
    }

    #[test]
    fn test_metadata_path() {
        let magnet = MagnetLink::new(HASH.to_uppercase(), "name", Vec::<String>::new()).unwrap();
        assert_eq!(magnet.info_hash(), HASH);
        assert_eq!(magnet.metadata_path(), PathBuf::from(format!("{HASH}.torrent")));
    }

    #[test]
    fn test_display_encodes_every_tracker() {
        let magnet = MagnetLink::new(HASH, "Harry Potter", ["udp://a:1/announce", "http://b/announce"]).unwrap();
        let link = magnet.to_string();
        assert!(link.starts_with(&format!("magnet:?xt=urn:btih:{HASH}&dn=Harry+Potter&")));
        assert_eq!(link.matches("&tr=").count(), 2);
        assert!(link.ends_with("tr=http%3A%2F%2Fb%2Fannounce"));
    }
}
