use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of places an article can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    Article,
    Blog,
    Tweet,
    Newspaper,
}

impl Source {
    pub const ALL: [Source; 4] = [
        Source::Article,
        Source::Blog,
        Source::Tweet,
        Source::Newspaper,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Article => "ARTICLE",
            Source::Blog => "BLOG",
            Source::Tweet => "TWEET",
            Source::Newspaper => "NEWSPAPER",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    /// Keys are matched exactly: `"blog"` is not a source.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Source::ALL
            .iter()
            .copied()
            .find(|source| source.as_str() == s)
            .ok_or_else(|| format!("unknown source '{}'", s))
    }
}
