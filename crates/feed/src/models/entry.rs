use crate::models::ChapterKey;

/// A narration episode from the input feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub book: u32,
    pub chapter: u32,
    /// Enclosure URL of the narration audio
    pub url: String,
    /// Enclosure MIME type, carried through to the output feed
    pub media_type: String,
    pub title: String,
    /// Publish date exactly as written in the feed (RFC 2822), possibly empty
    pub publish_date: String,
}
impl FeedEntry {
    pub fn key(&self) -> ChapterKey {
        ChapterKey::new(self.book, self.chapter)
    }
}
