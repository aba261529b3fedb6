use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// aria2c right-aligns the file index, hence the leading whitespace:
//   "  7|./Series/Book 3 Something/Chapter 12 Foo.mp3"
regex!(
    LISTING_ROW_REGEX,
    r"^\s*(\d+)\|\./([^/]+/Book (\d+)\b[^/]*/Chapter (\d+)\b[^/]*\.mp3)\s*$"
);
regex!(INFO_HASH_REGEX, r"^[0-9a-fA-F]{40}$");
