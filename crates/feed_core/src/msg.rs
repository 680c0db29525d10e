use crate::{Comment, Credential, FetchFailure, Millis, Post, PostId, Profile, Ticket};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User picked a subreddit (search bar or sidebar entry).
    SelectSubreddit { name: String, at: Millis },
    /// User opened the comment thread of a post in the current feed.
    ExpandPost { post_id: PostId, at: Millis },
    /// User closed one thread, or every open thread when `post_id` is `None`.
    CollapsePost { post_id: Option<PostId> },
    /// User asked to retry the most specific failed fetch.
    Retry { at: Millis },
    /// Pointer rested on an author name long enough to show the hovercard.
    AuthorHovered { author: String, at: Millis },
    /// A credential was entered or removed.
    CredentialChanged(Option<Credential>),
    /// Credential loaded from the local store at startup.
    CredentialRestored(Credential),
    /// Engine completion for a feed request.
    PostsFetched {
        ticket: Ticket,
        subreddit: String,
        result: Result<Vec<Post>, FetchFailure>,
        at: Millis,
    },
    /// Engine completion for a comment thread request.
    CommentsFetched {
        ticket: Ticket,
        post_id: PostId,
        result: Result<Vec<Comment>, FetchFailure>,
        at: Millis,
    },
    /// Engine completion for an author profile request.
    ProfileFetched {
        ticket: Ticket,
        author: String,
        result: Result<Profile, FetchFailure>,
        at: Millis,
    },
}
