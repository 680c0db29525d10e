use crate::Millis;

pub const DEFAULT_MIN_INTERVAL_MS: Millis = 6_000;
pub const DEFAULT_SUBREDDIT: &str = "popular";

/// What happens to a comment thread when its post is collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentCachePolicy {
    /// Drop the thread on collapse; every expand fetches again.
    Refetch,
    /// Keep a loaded thread and show it again on the next expand.
    #[default]
    Reuse,
}

/// How many posts may show their comment thread at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionMode {
    /// Expanding a post collapses the previously expanded one.
    #[default]
    Single,
    /// Every post card expands on its own.
    Independent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub min_interval_ms: Millis,
    pub comment_cache: CommentCachePolicy,
    pub expansion: ExpansionMode,
    pub default_subreddit: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            comment_cache: CommentCachePolicy::default(),
            expansion: ExpansionMode::default(),
            default_subreddit: DEFAULT_SUBREDDIT.to_string(),
        }
    }
}
