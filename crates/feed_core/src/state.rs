use std::collections::BTreeMap;

use crate::view_model::{AppViewModel, ThreadView};
use crate::{
    normalize_subreddit, Comment, CommentCachePolicy, Credential, Effect, ExpansionMode,
    FeedConfig, FetchFailure, FetchGate, Millis, Post, PostId, Profile, Resource, Status, Ticket,
};

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExpandedPost {
    post_id: PostId,
    title: String,
    permalink: String,
}

/// Owner of every fetched resource plus the process-wide fetch gate.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    config: FeedConfig,
    gate: FetchGate,
    next_ticket: u64,
    subreddit: Option<String>,
    posts: Resource<Vec<Post>>,
    expanded: Vec<ExpandedPost>,
    comments: BTreeMap<PostId, Resource<Vec<Comment>>>,
    profiles: BTreeMap<String, Resource<Profile>>,
    credential: Option<Credential>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(FeedConfig::default())
    }

    pub fn with_config(config: FeedConfig) -> Self {
        Self {
            gate: FetchGate::new(config.min_interval_ms),
            config,
            next_ticket: 0,
            subreddit: None,
            posts: Resource::new(),
            expanded: Vec::new(),
            comments: BTreeMap::new(),
            profiles: BTreeMap::new(),
            credential: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let threads = self
            .expanded
            .iter()
            .map(|post| ThreadView {
                post_id: post.post_id.clone(),
                title: post.title.clone(),
                comments: self
                    .comments
                    .get(&post.post_id)
                    .cloned()
                    .unwrap_or_default(),
            })
            .collect();

        AppViewModel {
            subreddit: self.subreddit.clone(),
            posts: self.posts.clone(),
            threads,
            profiles: self
                .profiles
                .iter()
                .map(|(name, profile)| (name.clone(), profile.clone()))
                .collect(),
            gate: self.gate.clone(),
            signed_in: self.credential.is_some(),
            dirty: self.dirty,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn gate(&self) -> &FetchGate {
        &self.gate
    }

    /// The most recently requested subreddit.
    pub fn subreddit(&self) -> Option<&str> {
        self.subreddit.as_deref()
    }

    pub fn posts(&self) -> &Resource<Vec<Post>> {
        &self.posts
    }

    pub fn comments(&self, post_id: &str) -> Option<&Resource<Vec<Comment>>> {
        self.comments.get(post_id)
    }

    pub fn profile(&self, author: &str) -> Option<&Resource<Profile>> {
        self.profiles.get(author)
    }

    pub fn expanded(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(|post| post.post_id.as_str())
    }

    pub fn is_expanded(&self, post_id: &str) -> bool {
        self.expanded.iter().any(|post| post.post_id == post_id)
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket::new(self.next_ticket)
    }

    pub(crate) fn request_posts(&mut self, raw_name: &str, at: Millis) -> Option<Effect> {
        let name = normalize_subreddit(raw_name)?;
        if self.posts.is_loading_for(&name) {
            return None;
        }
        // Open threads always belong to the loaded feed.
        self.collapse(None);
        if self.subreddit.as_deref() != Some(name.as_str()) {
            self.comments.clear();
            self.profiles.clear();
            self.subreddit = Some(name.clone());
        }
        self.mark_dirty();

        if !self.gate.acquire(at).is_allowed() {
            self.posts.reject(name);
            return None;
        }
        let ticket = self.issue_ticket();
        self.posts.start(name.clone(), ticket);
        Some(Effect::FetchPosts {
            ticket,
            subreddit: name,
            credential: self.credential.clone(),
        })
    }

    pub(crate) fn expand_post(&mut self, post_id: &str, at: Millis) -> Option<Effect> {
        if let Some(existing) = self.comments.get(post_id) {
            if self.is_expanded(post_id) && existing.status() != Status::Failed {
                return None;
            }
        }
        let post = self
            .posts
            .data()?
            .iter()
            .find(|post| post.id == post_id)
            .map(|post| ExpandedPost {
                post_id: post.id.clone(),
                title: post.title.clone(),
                permalink: post.permalink.clone(),
            })?;

        if self.config.expansion == ExpansionMode::Single {
            let others: Vec<PostId> = self
                .expanded
                .iter()
                .filter(|open| open.post_id != post_id)
                .map(|open| open.post_id.clone())
                .collect();
            for other in others {
                self.collapse(Some(other.as_str()));
            }
        }
        if !self.is_expanded(post_id) {
            self.expanded.push(post.clone());
        }
        self.mark_dirty();

        let status = self
            .comments
            .get(post_id)
            .map(Resource::status)
            .unwrap_or_default();
        match status {
            Status::Loading => None,
            Status::Succeeded if self.config.comment_cache == CommentCachePolicy::Reuse => None,
            _ => self.fetch_comments(post, at),
        }
    }

    fn fetch_comments(&mut self, post: ExpandedPost, at: Millis) -> Option<Effect> {
        let allowed = self.gate.acquire(at).is_allowed();
        let ticket = allowed.then(|| self.issue_ticket());
        let resource = self.comments.entry(post.post_id.clone()).or_default();
        let Some(ticket) = ticket else {
            resource.reject(post.post_id);
            return None;
        };
        resource.start(post.post_id.clone(), ticket);
        Some(Effect::FetchComments {
            ticket,
            post_id: post.post_id,
            permalink: post.permalink,
            credential: self.credential.clone(),
        })
    }

    /// Closes one thread, or all of them for `None`.
    pub(crate) fn collapse(&mut self, post_id: Option<&str>) {
        let before = self.expanded.len();
        let mut closed = Vec::new();
        self.expanded.retain(|open| {
            let keep = post_id.is_some_and(|id| open.post_id != id);
            if !keep {
                closed.push(open.post_id.clone());
            }
            keep
        });
        if self.config.comment_cache == CommentCachePolicy::Refetch {
            for id in &closed {
                self.comments.remove(id);
            }
        }
        if self.expanded.len() != before {
            self.mark_dirty();
        }
    }

    pub(crate) fn retry(&mut self, at: Millis) -> Option<Effect> {
        let failed_thread = self
            .expanded
            .iter()
            .rev()
            .find(|open| {
                self.comments
                    .get(&open.post_id)
                    .is_some_and(|resource| resource.status() == Status::Failed)
            })
            .cloned();
        if let Some(post) = failed_thread {
            self.mark_dirty();
            return self.fetch_comments(post, at);
        }

        if self.posts.status() == Status::Failed {
            let name = self.posts.key()?.to_string();
            return self.request_posts(&name, at);
        }
        None
    }

    pub(crate) fn hover_author(&mut self, raw_author: &str, at: Millis) -> Option<Effect> {
        let author = raw_author.trim().trim_start_matches("u/");
        if author.is_empty() {
            return None;
        }
        let status = self
            .profiles
            .get(author)
            .map(Resource::status)
            .unwrap_or_default();
        if matches!(status, Status::Loading | Status::Succeeded) {
            return None;
        }
        self.mark_dirty();

        let allowed = self.gate.acquire(at).is_allowed();
        let ticket = allowed.then(|| self.issue_ticket());
        let resource = self.profiles.entry(author.to_string()).or_default();
        let Some(ticket) = ticket else {
            resource.reject(author);
            return None;
        };
        resource.start(author, ticket);
        Some(Effect::FetchProfile {
            ticket,
            author: author.to_string(),
            credential: self.credential.clone(),
        })
    }

    pub(crate) fn set_credential(&mut self, credential: Option<Credential>) -> Effect {
        self.credential = credential.clone();
        self.mark_dirty();
        Effect::StoreCredential(credential)
    }

    pub(crate) fn restore_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
        self.mark_dirty();
    }

    pub(crate) fn apply_posts(
        &mut self,
        ticket: Ticket,
        subreddit: &str,
        result: Result<Vec<Post>, FetchFailure>,
        at: Millis,
    ) {
        if !self.posts.settle(subreddit, ticket, result, at) {
            return;
        }
        if let Some(posts) = self.posts.data() {
            self.comments
                .retain(|post_id, _| posts.iter().any(|post| &post.id == post_id));
        }
        self.mark_dirty();
    }

    pub(crate) fn apply_comments(
        &mut self,
        ticket: Ticket,
        post_id: &str,
        result: Result<Vec<Comment>, FetchFailure>,
        at: Millis,
    ) {
        let applied = self
            .comments
            .get_mut(post_id)
            .is_some_and(|resource| resource.settle(post_id, ticket, result, at));
        if applied && self.is_expanded(post_id) {
            self.mark_dirty();
        }
    }

    pub(crate) fn apply_profile(
        &mut self,
        ticket: Ticket,
        author: &str,
        result: Result<Profile, FetchFailure>,
        at: Millis,
    ) {
        let applied = self
            .profiles
            .get_mut(author)
            .is_some_and(|resource| resource.settle(author, ticket, result, at));
        if applied {
            self.mark_dirty();
        }
    }
}
