//! Parsing the narration feed into a chapter-keyed index.

use std::collections::BTreeMap;

use exn::ResultExt;
use rss::{Channel, Item};
use tracing::instrument;

use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::models::{ChapterKey, FeedEntry};

/// Narration episodes keyed by book, then chapter.
///
/// Built once per run by [`parse`] and treated as immutable afterwards. When
/// the feed carries more than one item for the same chapter, the one that
/// appears last in the document wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedIndex {
    books: BTreeMap<u32, BTreeMap<u32, FeedEntry>>,
}
impl FeedIndex {
    /// Insert an entry, replacing (and returning) any previous entry for the
    /// same chapter.
    pub fn insert(&mut self, entry: FeedEntry) -> Option<FeedEntry> {
        self.books.entry(entry.book).or_default().insert(entry.chapter, entry)
    }

    pub fn get(&self, key: ChapterKey) -> Option<&FeedEntry> {
        self.books.get(&key.book).and_then(|chapters| chapters.get(&key.chapter))
    }

    /// Every chapter in the index, most recent first (descending book, then
    /// descending chapter).
    pub fn keys(&self) -> impl Iterator<Item = ChapterKey> + '_ {
        self.books
            .iter()
            .rev()
            .flat_map(|(book, chapters)| chapters.keys().rev().map(|chapter| ChapterKey::new(*book, *chapter)))
    }

    /// The `n` most recent chapters, most recent first.
    ///
    /// Recency is judged purely by book/chapter position; publish dates are
    /// never compared.
    pub fn most_recent(&self, n: usize) -> Vec<ChapterKey> {
        self.keys().take(n).collect()
    }

    pub fn len(&self) -> usize {
        self.books.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl FromIterator<FeedEntry> for FeedIndex {
    fn from_iter<T: IntoIterator<Item = FeedEntry>>(iter: T) -> Self {
        let mut index = Self::default();
        for entry in iter {
            index.insert(entry);
        }
        index
    }
}

/// Extracts the book and chapter numbers from an episode title.
///
/// Returns `None` for titles outside the "Book N, Chapter M" pattern, and for
/// zero (books and chapters count from one).
///
/// ```
/// use chapterfeed_feed::{parse_title, models::ChapterKey};
/// assert_eq!(parse_title("Commitment (Book 1, Chapter 1)"), Some(ChapterKey::new(1, 1)));
/// assert_eq!(parse_title("Bonus: Live Show"), None);
/// ```
pub fn parse_title(title: &str) -> Option<ChapterKey> {
    let captures = consts::TITLE_REGEX.captures(title)?;
    let (Ok(book), Ok(chapter)) = (captures.get(1)?.as_str().parse::<u32>(), captures.get(2)?.as_str().parse::<u32>())
    else {
        tracing::debug!(title, "Chapter numbers out of range");
        return None;
    };
    (book > 0 && chapter > 0).then(|| ChapterKey::new(book, chapter))
}

/// Parses raw RSS bytes into a [`FeedIndex`].
///
/// Items that aren't chapter episodes (title outside the pattern) or that
/// have nothing to download (no enclosure) are skipped without error.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidDocument`] if the bytes are not an RSS channel.
#[instrument(skip(feed), fields(feed_size = feed.as_ref().len(), entries))]
pub fn parse(feed: impl AsRef<[u8]>) -> Result<FeedIndex> {
    let channel = Channel::read_from(feed.as_ref()).or_raise(|| ErrorKind::InvalidDocument)?;
    let index: FeedIndex = channel.items().iter().filter_map(self::entry).collect();
    tracing::Span::current().record("entries", index.len());
    Ok(index)
}

fn entry(item: &Item) -> Option<FeedEntry> {
    let title = item.title()?;
    let Some(key) = parse_title(title) else {
        tracing::trace!(title, "Skipping item outside the chapter pattern");
        return None;
    };
    let Some(enclosure) = item.enclosure() else {
        tracing::debug!(title, "Skipping chapter item without an enclosure");
        return None;
    };
    Some(FeedEntry {
        book: key.book,
        chapter: key.chapter,
        url: enclosure.url().to_string(),
        media_type: enclosure.mime_type().to_string(),
        title: title.to_string(),
        publish_date: item.pub_date().unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn feed(items: &[(&str, &str)]) -> String {
        let items: String = items
            .iter()
            .map(|(title, url)| {
                format!(
                    r#"<item><title>{title}</title><enclosure url="{url}" length="0" type="audio/mpeg"/><pubDate>Mon, 01 Jan 2020 00:00:00 +0000</pubDate></item>"#
                )
            })
            .collect();
        format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>T</title><link>http://x/</link><description>D</description>{items}</channel></rss>"#)
    }

    #[rstest]
    #[case("Book 1, Chapter 1", Some((1, 1)))]
    #[case("Book 7, Chapter 36", Some((7, 36)))]
    #[case("Commitment (Book 2, Chapter 10)", Some((2, 10)))]
    #[case("Book 12, Chapter 345: The Long One", Some((12, 345)))]
    #[case("Book 0, Chapter 1", None)]
    #[case("Book 99999999999, Chapter 1", None)]
    #[case("Book 1, Chapter 4294967296", None)]
    #[case("Book 1 Chapter 1", None)]
    #[case("book 1, chapter 1", None)]
    #[case("Bonus Episode", None)]
    #[case("", None)]
    fn test_parse_title(#[case] title: &str, #[case] expected: Option<(u32, u32)>) {
        assert_eq!(parse_title(title), expected.map(ChapterKey::from));
    }

    #[test]
    fn test_parse_extracts_entries() {
        let index = parse(feed(&[("Book 1, Chapter 1", "http://x/a.mp3"), ("Book 1, Chapter 2", "http://x/b.mp3")])).unwrap();
        assert_eq!(index.len(), 2);
        let entry = index.get(ChapterKey::new(1, 1)).unwrap();
        assert_eq!(entry.url, "http://x/a.mp3");
        assert_eq!(entry.media_type, "audio/mpeg");
        assert_eq!(entry.title, "Book 1, Chapter 1");
        assert_eq!(entry.publish_date, "Mon, 01 Jan 2020 00:00:00 +0000");
        assert_eq!(entry.key(), ChapterKey::new(1, 1));
    }

    #[test]
    fn test_parse_skips_non_chapter_items() {
        let index = parse(feed(&[("Trailer", "http://x/t.mp3"), ("Book 2, Chapter 3", "http://x/c.mp3")])).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.get(ChapterKey::new(2, 3)).is_some());
    }

    #[test]
    fn test_parse_skips_items_without_enclosure() {
        let xml = r#"<rss version="2.0"><channel><title>T</title><link>l</link><description>d</description><item><title>Book 1, Chapter 1</title></item></channel></rss>"#;
        assert!(parse(xml).unwrap().is_empty());
    }

    #[test]
    fn test_parse_last_item_wins() {
        let index = parse(feed(&[("Book 1, Chapter 1", "http://x/first.mp3"), ("Book 1, Chapter 1", "http://x/second.mp3")])).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(ChapterKey::new(1, 1)).unwrap().url, "http://x/second.mp3");
    }

    #[rstest]
    #[case("")]
    #[case("not xml at all")]
    #[case("<html><body>nope</body></html>")]
    fn test_parse_rejects_non_rss(#[case] document: &str) {
        let err = parse(document).unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidDocument);
    }

    #[test]
    fn test_most_recent_ordering() {
        let index = parse(feed(&[
            ("Book 1, Chapter 1", "u"),
            ("Book 1, Chapter 2", "u"),
            ("Book 2, Chapter 1", "u"),
            ("Book 2, Chapter 2", "u"),
            ("Book 2, Chapter 3", "u"),
        ]))
        .unwrap();
        let expected: Vec<ChapterKey> = [(2, 3), (2, 2), (2, 1), (1, 2), (1, 1)].map(ChapterKey::from).to_vec();
        assert_eq!(index.most_recent(5), expected);
    }

    #[test]
    fn test_most_recent_drops_lowest_ranked() {
        let index: FeedIndex = [(1, 1), (1, 2), (1, 10), (2, 1), (2, 2), (3, 1), (3, 2)]
            .into_iter()
            .map(|(book, chapter)| FeedEntry {
                book,
                chapter,
                url: String::new(),
                media_type: String::new(),
                title: String::new(),
                publish_date: String::new(),
            })
            .collect();
        let recent = index.most_recent(5);
        assert_eq!(recent.len(), 5);
        // Chapter 10 sorts numerically, not lexically.
        assert_eq!(recent[4], ChapterKey::new(1, 10));
        assert!(!recent.contains(&ChapterKey::new(1, 1)));
        assert!(!recent.contains(&ChapterKey::new(1, 2)));
    }
}
