use std::fmt::{Display, Formatter, Result as FmtResult};

/// Position of a chapter within the series.
///
/// Orders by book, then chapter. Book and chapter numbers only ever grow as
/// the series is published, so the greatest key is the most recent chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChapterKey {
    pub book: u32,
    pub chapter: u32,
}
impl ChapterKey {
    pub fn new(book: u32, chapter: u32) -> Self {
        Self { book, chapter }
    }
}
impl From<(u32, u32)> for ChapterKey {
    fn from((book, chapter): (u32, u32)) -> Self {
        ChapterKey::new(book, chapter)
    }
}
impl Display for ChapterKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Book {}, Chapter {}", self.book, self.chapter)
    }
}
