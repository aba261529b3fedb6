//! Syndication feeds in and out.
//!
//! - [`parse`] turns an RSS document of narration episodes into a
//!   [`FeedIndex`] keyed by [`ChapterKey`](models::ChapterKey).
//! - [`OutputFeed`] serializes the assembled episodes back into RSS.

mod consts;
pub mod error;
mod index;
pub mod models;
mod output;

pub use crate::index::{FeedIndex, parse, parse_title};
pub use crate::output::{ChannelInfo, OutputFeed, OutputItem};
