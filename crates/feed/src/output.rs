//! Serializing assembled episodes into an RSS document.

use exn::ResultExt;
use rss::{Channel, Enclosure, Image, Item};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Channel-level metadata of the output feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub title: String,
    pub description: String,
    pub link: String,
    /// URL of the cover art; the image reuses the channel title and link.
    pub image_url: String,
}

/// One assembled episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputItem {
    pub title: String,
    /// Publish date carried over from the input feed
    pub publish_date: String,
    pub url: String,
    pub media_type: String,
    /// Duration of the audio in whole seconds, published as the enclosure length
    pub length: u64,
}

/// The output feed, in the order items were pushed.
#[derive(Debug, Clone)]
pub struct OutputFeed {
    channel: ChannelInfo,
    built_at: OffsetDateTime,
    items: Vec<OutputItem>,
}
impl OutputFeed {
    pub fn new(channel: ChannelInfo, built_at: OffsetDateTime) -> Self {
        Self { channel, built_at, items: Vec::new() }
    }

    pub fn push(&mut self, item: OutputItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[OutputItem] {
        &self.items
    }

    /// Renders the feed as an RSS 2.0 document.
    ///
    /// Both `pubDate` and `lastBuildDate` of the channel are the build time.
    #[instrument(skip_all, fields(items = self.items.len()))]
    pub fn to_xml(&self) -> Result<Vec<u8>> {
        let built_at = self.built_at.format(&Rfc2822).or_raise(|| ErrorKind::Serialize)?;
        let channel = Channel {
            title: self.channel.title.clone(),
            link: self.channel.link.clone(),
            description: self.channel.description.clone(),
            pub_date: Some(built_at.clone()),
            last_build_date: Some(built_at),
            image: Some(Image {
                url: self.channel.image_url.clone(),
                title: self.channel.title.clone(),
                link: self.channel.link.clone(),
                ..Default::default()
            }),
            items: self.items.iter().map(Self::item).collect(),
            ..Default::default()
        };
        channel.write_to(Vec::new()).or_raise(|| ErrorKind::Serialize)
    }

    fn item(item: &OutputItem) -> Item {
        Item {
            title: Some(item.title.clone()),
            pub_date: Some(item.publish_date.clone()).filter(|date| !date.is_empty()),
            enclosure: Some(Enclosure {
                url: item.url.clone(),
                length: item.length.to_string(),
                mime_type: item.media_type.clone(),
            }),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::ChapterKey, parse};
    use time::macros::datetime;

    fn channel() -> ChannelInfo {
        ChannelInfo {
            title: "Chapter by Chapter".to_string(),
            description: "Chapter titles and narration".to_string(),
            link: "https://example.org/".to_string(),
            image_url: "https://example.org/cover.jpg".to_string(),
        }
    }

    fn item(book: u32, chapter: u32) -> OutputItem {
        OutputItem {
            title: ChapterKey::new(book, chapter).to_string(),
            publish_date: "Mon, 01 Jan 2020 00:00:00 +0000".to_string(),
            url: format!("https://example.org/concatenated/{book}-{chapter}.mp3"),
            media_type: "audio/mpeg".to_string(),
            length: 1234,
        }
    }

    #[test]
    fn test_channel_metadata() {
        let feed = OutputFeed::new(channel(), datetime!(2024-06-15 12:30:00 UTC));
        let xml = String::from_utf8(feed.to_xml().unwrap()).unwrap();
        assert!(xml.contains("<title>Chapter by Chapter</title>"));
        assert!(xml.contains("<link>https://example.org/</link>"));
        assert!(xml.contains("<lastBuildDate>Sat, 15 Jun 2024 12:30:00 +0000</lastBuildDate>"));
        assert!(xml.contains("<pubDate>Sat, 15 Jun 2024 12:30:00 +0000</pubDate>"));
        assert!(xml.contains("<url>https://example.org/cover.jpg</url>"));
    }

    #[test]
    fn test_items_keep_order() {
        let mut feed = OutputFeed::new(channel(), datetime!(2024-06-15 12:30:00 UTC));
        feed.push(item(2, 3));
        feed.push(item(2, 2));
        let xml = String::from_utf8(feed.to_xml().unwrap()).unwrap();
        let first = xml.find("Book 2, Chapter 3").unwrap();
        let second = xml.find("Book 2, Chapter 2").unwrap();
        assert!(first < second);
        assert!(xml.contains(r#"length="1234""#));
        assert!(xml.contains(r#"type="audio/mpeg""#));
    }

    #[test]
    fn test_output_is_readable_rss() {
        let mut feed = OutputFeed::new(channel(), datetime!(2024-06-15 12:30:00 UTC));
        feed.push(item(1, 1));
        let index = parse(feed.to_xml().unwrap()).unwrap();
        let entry = index.get(ChapterKey::new(1, 1)).unwrap();
        assert_eq!(entry.url, "https://example.org/concatenated/1-1.mp3");
        assert_eq!(entry.publish_date, "Mon, 01 Jan 2020 00:00:00 +0000");
    }

    #[test]
    fn test_empty_publish_date_is_omitted() {
        let mut feed = OutputFeed::new(channel(), datetime!(2024-06-15 12:30:00 UTC));
        feed.push(OutputItem { publish_date: String::new(), ..item(1, 1) });
        let xml = String::from_utf8(feed.to_xml().unwrap()).unwrap();
        // Only the channel's own pubDate remains.
        assert_eq!(xml.matches("<pubDate>").count(), 1);
    }
}
