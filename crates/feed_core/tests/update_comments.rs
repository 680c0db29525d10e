mod common;

use common::{
    comment, comments_done, comments_ticket, expand, init_logging, loaded_feed, post, posts_done,
    posts_ticket, select,
};
use feed_core::{
    update, AppState, CommentCachePolicy, Effect, ExpansionMode, FeedConfig, FetchFailure, Msg,
    Status,
};
use pretty_assertions::assert_eq;

fn state_with(cache: CommentCachePolicy, expansion: ExpansionMode) -> AppState {
    let config = FeedConfig {
        comment_cache: cache,
        expansion,
        ..FeedConfig::default()
    };
    loaded_feed(
        AppState::with_config(config),
        vec![post("p1"), post("p2"), post("p3")],
    )
}

fn collapse(state: AppState, post_id: Option<&str>) -> AppState {
    let (state, effects) = update(
        state,
        Msg::CollapsePost {
            post_id: post_id.map(str::to_string),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn expand_emits_fetch_with_permalink() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Single);
    let (state, effects) = expand(state, "p1", 6_000);
    let ticket = comments_ticket(&effects);

    assert_eq!(
        effects,
        vec![Effect::FetchComments {
            ticket,
            post_id: "p1".to_string(),
            permalink: "/r/rust/comments/p1/post/".to_string(),
            credential: None,
        }]
    );
    assert!(state.is_expanded("p1"));
    assert_eq!(state.comments("p1").map(|r| r.status()), Some(Status::Loading));
}

#[test]
fn expand_unknown_post_is_ignored() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Single);
    let (state, effects) = expand(state, "missing", 6_000);
    assert!(effects.is_empty());
    assert!(!state.is_expanded("missing"));
}

#[test]
fn http_error_then_retry_succeeds_and_clears_error() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Single);
    let (state, effects) = expand(state, "p1", 6_000);
    let ticket = comments_ticket(&effects);
    let state = comments_done(state, ticket, "p1", Err(FetchFailure::Http(404)), 6_100);

    let thread = state.comments("p1").expect("thread");
    assert_eq!(thread.status(), Status::Failed);
    assert_eq!(thread.error(), Some(&FetchFailure::Http(404)));

    let (state, effects) = update(state, Msg::Retry { at: 12_000 });
    let retry = comments_ticket(&effects);
    let thread = state.comments("p1").expect("thread");
    assert_eq!(thread.status(), Status::Loading);
    assert_eq!(thread.error(), None);

    let fresh = vec![comment("c1", "first"), comment("c2", "second")];
    let state = comments_done(state, retry, "p1", Ok(fresh.clone()), 12_100);
    let thread = state.comments("p1").expect("thread");
    assert_eq!(thread.status(), Status::Succeeded);
    assert_eq!(thread.data(), Some(&fresh));
    assert_eq!(thread.error(), None);
}

#[test]
fn retry_prefers_failed_thread_over_failed_feed() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Single);
    let (state, effects) = expand(state, "p1", 6_000);
    let ticket = comments_ticket(&effects);
    let state = comments_done(state, ticket, "p1", Err(FetchFailure::Http(503)), 6_100);

    let (_state, effects) = update(state, Msg::Retry { at: 12_000 });
    assert!(matches!(
        effects.as_slice(),
        [Effect::FetchComments { post_id, .. }] if post_id == "p1"
    ));
}

#[test]
fn reuse_policy_shows_cached_thread_on_reexpand() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Single);
    let (state, effects) = expand(state, "p1", 6_000);
    let ticket = comments_ticket(&effects);
    let thread = vec![comment("c1", "hello")];
    let state = comments_done(state, ticket, "p1", Ok(thread.clone()), 6_100);

    let state = collapse(state, None);
    assert!(!state.is_expanded("p1"));

    let (state, effects) = expand(state, "p1", 12_000);
    assert!(effects.is_empty());
    assert!(state.is_expanded("p1"));
    assert_eq!(state.comments("p1").and_then(|r| r.data()), Some(&thread));
    let view = state.view();
    assert_eq!(view.threads.len(), 1);
    assert_eq!(view.threads[0].comments.data(), Some(&thread));
}

#[test]
fn refetch_policy_fetches_again_on_reexpand() {
    init_logging();
    let state = state_with(CommentCachePolicy::Refetch, ExpansionMode::Single);
    let (state, effects) = expand(state, "p1", 6_000);
    let ticket = comments_ticket(&effects);
    let state = comments_done(state, ticket, "p1", Ok(vec![comment("c1", "hello")]), 6_100);

    let state = collapse(state, Some("p1"));
    assert!(state.comments("p1").is_none());

    let (state, effects) = expand(state, "p1", 12_000);
    let again = comments_ticket(&effects);
    assert_ne!(again, ticket);
    assert_eq!(state.comments("p1").map(|r| r.status()), Some(Status::Loading));
}

#[test]
fn refetch_policy_discards_response_after_collapse() {
    init_logging();
    let state = state_with(CommentCachePolicy::Refetch, ExpansionMode::Single);
    let (state, effects) = expand(state, "p1", 6_000);
    let ticket = comments_ticket(&effects);
    let state = collapse(state, None);

    let state = comments_done(state, ticket, "p1", Ok(vec![comment("c1", "late")]), 6_100);
    assert!(state.comments("p1").is_none());
}

#[test]
fn reuse_policy_keeps_loading_thread_across_collapse() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Single);
    let (state, effects) = expand(state, "p1", 6_000);
    let ticket = comments_ticket(&effects);
    let state = collapse(state, None);

    let (state, effects) = expand(state, "p1", 12_000);
    assert!(effects.is_empty(), "in-flight fetch must not be duplicated");

    let state = comments_done(state, ticket, "p1", Ok(vec![comment("c1", "hi")]), 12_100);
    assert_eq!(
        state.comments("p1").map(|r| r.status()),
        Some(Status::Succeeded)
    );
}

#[test]
fn single_mode_replaces_expanded_post() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Single);
    let (state, _) = expand(state, "p1", 6_000);
    let (state, _) = expand(state, "p2", 12_000);

    assert_eq!(state.expanded().collect::<Vec<_>>(), vec!["p2"]);
}

#[test]
fn independent_mode_keeps_several_threads_open() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Independent);
    let (state, _) = expand(state, "p1", 6_000);
    let (state, _) = expand(state, "p2", 12_000);
    assert_eq!(state.expanded().collect::<Vec<_>>(), vec!["p1", "p2"]);

    let state = collapse(state, Some("p1"));
    assert_eq!(state.expanded().collect::<Vec<_>>(), vec!["p2"]);
}

#[test]
fn expand_while_rate_limited_marks_thread_failed_without_fetch() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Single);
    // The feed was accepted at t=0, so t=1000 falls inside the window.
    let (state, effects) = expand(state, "p1", 1_000);
    assert!(effects.is_empty());
    let thread = state.comments("p1").expect("thread");
    assert_eq!(thread.status(), Status::Failed);
    assert_eq!(thread.error(), Some(&FetchFailure::RateLimited));
    assert!(state.is_expanded("p1"));
}

#[test]
fn changing_subreddit_collapses_threads() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Independent);
    let (state, _) = expand(state, "p1", 6_000);
    let (state, _) = select(state, "python", 12_000);
    assert_eq!(state.expanded().count(), 0);
    assert!(state.view().threads.is_empty());
}

#[test]
fn rate_limited_reselect_closes_threads_of_the_dropped_feed() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Single);
    let (state, effects) = expand(state, "p1", 6_000);
    let ticket = comments_ticket(&effects);
    let state = comments_done(state, ticket, "p1", Ok(vec![comment("c1", "hi")]), 6_100);

    let (state, effects) = select(state, "rust", 7_000);
    assert!(effects.is_empty());
    assert_eq!(state.posts().error(), Some(&FetchFailure::RateLimited));
    assert_eq!(state.expanded().count(), 0);
    assert!(state.view().threads.is_empty());

    let (state, effects) = update(state, Msg::Retry { at: 20_000 });
    let ticket = posts_ticket(&effects);
    let state = posts_done(state, ticket, "rust", Ok(vec![post("p1"), post("p2")]), 20_100);
    let (state, effects) = expand(state, "p2", 26_000);
    assert!(matches!(
        effects.as_slice(),
        [Effect::FetchComments { post_id, .. }] if post_id == "p2"
    ));
    assert_eq!(state.expanded().collect::<Vec<_>>(), vec!["p2"]);
}

#[test]
fn switching_subreddits_drops_threads_and_profiles_of_the_old_feed() {
    init_logging();
    let mut state = AppState::new();
    for round in 0..4u64 {
        let at = round * 30_000;
        let name = format!("sub{round}");
        let post_id = format!("p{round}");

        let (next, effects) = select(state, &name, at);
        let ticket = posts_ticket(&effects);
        let next = posts_done(next, ticket, &name, Ok(vec![post(&post_id)]), at + 100);
        let (next, effects) = expand(next, &post_id, at + 6_000);
        let ticket = comments_ticket(&effects);
        let next = comments_done(next, ticket, &post_id, Ok(vec![comment("c", "x")]), at + 6_100);
        let (next, _) = update(
            next,
            Msg::AuthorHovered {
                author: format!("author{round}"),
                at: at + 12_000,
            },
        );
        state = next;
    }

    assert!(state.comments("p3").is_some());
    for old in ["p0", "p1", "p2"] {
        assert!(state.comments(old).is_none(), "{old} should be pruned");
    }
    assert!(state.profile("author3").is_some());
    assert!(state.profile("author0").is_none());
    assert_eq!(state.view().profiles.len(), 1);
}

#[test]
fn refreshed_feed_keeps_threads_only_for_posts_still_listed() {
    init_logging();
    let state = state_with(CommentCachePolicy::Reuse, ExpansionMode::Independent);
    let (state, effects) = expand(state, "p1", 6_000);
    let first = comments_ticket(&effects);
    let (state, effects) = expand(state, "p2", 12_000);
    let second = comments_ticket(&effects);
    let state = comments_done(state, first, "p1", Ok(vec![comment("c1", "a")]), 12_100);
    let state = comments_done(state, second, "p2", Ok(vec![comment("c2", "b")]), 12_200);

    let (state, effects) = select(state, "rust", 18_000);
    let ticket = posts_ticket(&effects);
    let state = posts_done(state, ticket, "rust", Ok(vec![post("p2"), post("p4")]), 18_100);

    assert!(state.comments("p1").is_none());
    assert_eq!(
        state.comments("p2").map(|r| r.status()),
        Some(Status::Succeeded)
    );
}
