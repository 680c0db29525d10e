#![allow(dead_code)]

use std::sync::Once;

use feed_core::{
    update, AppState, Comment, Effect, FetchFailure, Media, Millis, Msg, Post, Ticket,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feed_logging::initialize_for_tests);
}

pub fn post(id: &str) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Post {id}"),
        author: "someone".to_string(),
        subreddit: "rust".to_string(),
        selftext: String::new(),
        score: 10,
        upvote_ratio: 0.9,
        num_comments: 2,
        permalink: format!("/r/rust/comments/{id}/post/"),
        url: String::new(),
        created_utc: 1_700_000_000,
        media: Media::None,
    }
}

pub fn comment(id: &str, body: &str) -> Comment {
    Comment {
        id: id.to_string(),
        author: "commenter".to_string(),
        body: body.to_string(),
        created_utc: 1_700_000_100,
        score: 1,
    }
}

pub fn select(state: AppState, name: &str, at: Millis) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::SelectSubreddit {
            name: name.to_string(),
            at,
        },
    )
}

pub fn expand(state: AppState, post_id: &str, at: Millis) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::ExpandPost {
            post_id: post_id.to_string(),
            at,
        },
    )
}

pub fn posts_ticket(effects: &[Effect]) -> Ticket {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchPosts { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("fetch posts effect")
}

pub fn comments_ticket(effects: &[Effect]) -> Ticket {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchComments { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("fetch comments effect")
}

pub fn posts_done(
    state: AppState,
    ticket: Ticket,
    subreddit: &str,
    result: Result<Vec<Post>, FetchFailure>,
    at: Millis,
) -> AppState {
    let (state, effects) = update(
        state,
        Msg::PostsFetched {
            ticket,
            subreddit: subreddit.to_string(),
            result,
            at,
        },
    );
    assert!(effects.is_empty());
    state
}

pub fn comments_done(
    state: AppState,
    ticket: Ticket,
    post_id: &str,
    result: Result<Vec<Comment>, FetchFailure>,
    at: Millis,
) -> AppState {
    let (state, effects) = update(
        state,
        Msg::CommentsFetched {
            ticket,
            post_id: post_id.to_string(),
            result,
            at,
        },
    );
    assert!(effects.is_empty());
    state
}

/// Loads `posts` into the `rust` feed at t=0 and returns the state.
pub fn loaded_feed(state: AppState, posts: Vec<Post>) -> AppState {
    let (state, effects) = select(state, "rust", 0);
    let ticket = posts_ticket(&effects);
    posts_done(state, ticket, "rust", Ok(posts), 100)
}
