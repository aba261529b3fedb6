use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Episode titles carry the position anywhere in the title, e.g.
// "Commitment (Book 1, Chapter 1)".
regex!(TITLE_REGEX, r"Book (\d+), Chapter (\d+)");
