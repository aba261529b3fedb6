mod entry;
mod key;

pub use self::entry::FeedEntry;
pub use self::key::ChapterKey;
