//! Access to the BitTorrent swarm holding the chapter-title clips.
//!
//! The swarm is addressed by a [`MagnetLink`]. Its metadata is fetched once
//! and cached in the artifact store, then [`resolve_index`] lists the swarm's
//! files and builds an [`ArchiveIndex`] from the paths that look like
//! chapters. The actual peer-to-peer work is done by a [`SwarmClient`].

pub mod client;
mod consts;
pub mod error;
mod index;
mod magnet;

pub use crate::client::{Aria2, SwarmClient};
#[cfg(any(test, feature = "mock"))]
pub use crate::client::StubSwarmClient;
pub use crate::index::{ArchiveEntry, ArchiveIndex, parse_listing, parse_listing_row, resolve_index};
pub use crate::magnet::MagnetLink;
