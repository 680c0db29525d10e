use crate::{Comment, FetchGate, Post, PostId, Profile, Resource};

/// Read-only snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub subreddit: Option<String>,
    pub posts: Resource<Vec<Post>>,
    /// Expanded posts, oldest first.
    pub threads: Vec<ThreadView>,
    pub profiles: Vec<(String, Resource<Profile>)>,
    pub gate: FetchGate,
    pub signed_in: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThreadView {
    pub post_id: PostId,
    pub title: String,
    pub comments: Resource<Vec<Comment>>,
}

impl AppViewModel {
    pub fn profile(&self, author: &str) -> Option<&Resource<Profile>> {
        self.profiles
            .iter()
            .find(|(name, _)| name == author)
            .map(|(_, profile)| profile)
    }
}
