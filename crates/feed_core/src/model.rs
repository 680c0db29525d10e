use std::fmt;

/// Milliseconds on the app's monotonic clock.
pub type Millis = u64;

pub type PostId = String;

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub author: String,
    pub subreddit: String,
    pub selftext: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub num_comments: u64,
    pub permalink: String,
    pub url: String,
    /// Seconds since the Unix epoch.
    pub created_utc: i64,
    pub media: Media,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Media {
    #[default]
    None,
    Image {
        url: String,
    },
    Gallery {
        urls: Vec<String>,
    },
    Video {
        url: String,
        poster: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created_utc: i64,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub total_karma: i64,
    pub created_utc: i64,
}

/// Opaque access token handed to the content source as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Normalizes user input into a subreddit name.
///
/// Accepts `name`, `r/name` and `/r/name`, and `a+b` multireddits. Returns
/// `None` for blank input or any part that is not ASCII alphanumerics and `_`.
pub fn normalize_subreddit(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let name = trimmed
        .strip_prefix("/r/")
        .or_else(|| trimmed.strip_prefix("r/"))
        .unwrap_or(trimmed)
        .trim_end_matches('/');
    let valid_part = |part: &str| {
        !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    // `a+b` is a multireddit.
    if !name.split('+').all(valid_part) {
        return None;
    }
    Some(name.to_string())
}
