use crate::{Credential, PostId, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPosts {
        ticket: Ticket,
        subreddit: String,
        credential: Option<Credential>,
    },
    FetchComments {
        ticket: Ticket,
        post_id: PostId,
        permalink: String,
        credential: Option<Credential>,
    },
    FetchProfile {
        ticket: Ticket,
        author: String,
        credential: Option<Credential>,
    },
    StoreCredential(Option<Credential>),
}
