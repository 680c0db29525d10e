use std::fmt::Write;

use chrono::DateTime;
use feed_core::{
    AppViewModel, Comment, FetchFailure, FetchGate, Media, Millis, Post, Profile, Resource,
    Status, ThreadView,
};

use super::constants::{COMMENT_WIDTH, RULE, SELFTEXT_PREVIEW, TITLE_WIDTH};

/// Everything the renderer needs besides the view model.
pub struct RenderContext<'a> {
    /// Monotonic app time, for the rate-limit countdown.
    pub now: Millis,
    /// Wall-clock Unix seconds, for "3h ago".
    pub wall_now: i64,
    /// Author whose profile card is shown.
    pub focused_author: Option<&'a str>,
}

pub fn render(view: &AppViewModel, ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    render_header(&mut out, view);
    render_posts(&mut out, view, ctx);
    for thread in &view.threads {
        render_thread(&mut out, thread, &view.gate, ctx);
    }
    if let Some(author) = ctx.focused_author {
        render_profile(&mut out, author, view.profile(author), &view.gate, ctx);
    }
    out
}

fn render_header(out: &mut String, view: &AppViewModel) {
    let _ = writeln!(out, "{RULE}");
    let subreddit = view.subreddit.as_deref().unwrap_or("-");
    let account = if view.signed_in { "signed in" } else { "anonymous" };
    let _ = writeln!(out, "r/{subreddit}  [{account}]");
    let _ = writeln!(out, "{RULE}");
}

fn render_posts(out: &mut String, view: &AppViewModel, ctx: &RenderContext<'_>) {
    match view.posts.status() {
        Status::Idle => {
            let _ = writeln!(out, "Pick a subreddit with `r <name>`.");
        }
        Status::Loading => {
            let _ = writeln!(out, "Loading...");
        }
        Status::Failed => {
            if let Some(failure) = view.posts.error() {
                let _ = writeln!(out, "{}", failure_message(failure, &view.gate, ctx.now));
            }
        }
        Status::Succeeded => {
            let posts = view.posts.data().map(Vec::as_slice).unwrap_or_default();
            if posts.is_empty() {
                let _ = writeln!(out, "No posts.");
            }
            for (index, post) in posts.iter().enumerate() {
                render_post(out, index + 1, post, ctx.wall_now);
            }
        }
    }
}

fn render_post(out: &mut String, position: usize, post: &Post, wall_now: i64) {
    let ratio = (post.upvote_ratio * 100.0).round() as i64;
    let _ = writeln!(
        out,
        "{position:>3}. [{score:>6} | {ratio:>3}%] {title}",
        score = post.score,
        title = truncate(&post.title, TITLE_WIDTH),
    );
    let mut line = format!(
        "      u/{} · {} · {} comments",
        post.author,
        format_age(post.created_utc, wall_now),
        post.num_comments
    );
    if let Some(kind) = media_label(&post.media) {
        let _ = write!(line, " · {kind}");
    }
    let _ = writeln!(out, "{line}");
    if !post.selftext.is_empty() {
        let _ = writeln!(out, "      {}", truncate(&one_line(&post.selftext), SELFTEXT_PREVIEW));
    }
}

fn render_thread(out: &mut String, thread: &ThreadView, gate: &FetchGate, ctx: &RenderContext<'_>) {
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Comments: {}", truncate(&thread.title, TITLE_WIDTH));
    render_comments(out, &thread.comments, gate, ctx);
}

fn render_comments(
    out: &mut String,
    comments: &Resource<Vec<Comment>>,
    gate: &FetchGate,
    ctx: &RenderContext<'_>,
) {
    match (comments.status(), comments.data(), comments.error()) {
        (Status::Failed, _, Some(failure)) => {
            let _ = writeln!(out, "  {}", failure_message(failure, gate, ctx.now));
        }
        (Status::Succeeded, Some(list), _) if list.is_empty() => {
            let _ = writeln!(out, "  No comments.");
        }
        (Status::Succeeded, Some(list), _) => {
            for comment in list {
                let _ = writeln!(
                    out,
                    "  u/{} · {} · {} points",
                    comment.author,
                    format_age(comment.created_utc, ctx.wall_now),
                    comment.score
                );
                for line in truncate(&comment.body, COMMENT_WIDTH).lines() {
                    let _ = writeln!(out, "    {line}");
                }
            }
        }
        _ => {
            let _ = writeln!(out, "  Loading comments...");
        }
    }
}

fn render_profile(
    out: &mut String,
    author: &str,
    profile: Option<&Resource<Profile>>,
    gate: &FetchGate,
    ctx: &RenderContext<'_>,
) {
    let _ = writeln!(out, "{RULE}");
    let Some(profile) = profile else {
        return;
    };
    match (profile.data(), profile.error()) {
        (Some(profile), _) => {
            let _ = writeln!(out, "u/{}", profile.name);
            let _ = writeln!(out, "  Karma: {}", profile.total_karma);
            let _ = writeln!(out, "  Joined: {}", format_date(profile.created_utc));
        }
        (None, Some(failure)) => {
            let _ = writeln!(
                out,
                "u/{author}: {}",
                failure_message(failure, gate, ctx.now)
            );
        }
        (None, None) => {
            let _ = writeln!(out, "u/{author}: loading...");
        }
    }
}

/// One message per failure kind; rate limiting gets its own guidance.
pub fn failure_message(failure: &FetchFailure, gate: &FetchGate, now: Millis) -> String {
    match failure {
        FetchFailure::RateLimited => {
            let wait_secs = gate.remaining(now).div_ceil(1000);
            if wait_secs == 0 {
                "Too many requests. You can `retry` now.".to_string()
            } else {
                format!("Too many requests. Wait {wait_secs}s, then `retry`.")
            }
        }
        FetchFailure::Http(404) => "Not found (HTTP 404).".to_string(),
        FetchFailure::Http(429) => {
            "Reddit is throttling requests (HTTP 429). Try `retry` later.".to_string()
        }
        FetchFailure::Http(status) => format!("Request failed with HTTP {status}. Type `retry`."),
        FetchFailure::Network(message) => format!("Network error: {message}. Type `retry`."),
    }
}

fn media_label(media: &Media) -> Option<String> {
    match media {
        Media::None => None,
        Media::Image { .. } => Some("[image]".to_string()),
        Media::Gallery { urls } => Some(format!("[gallery: {} images]", urls.len())),
        Media::Video { .. } => Some("[video]".to_string()),
    }
}

/// Cuts `text` to at most `max` characters, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Relative age of a Unix timestamp: "just now", "5m ago", "3h ago",
/// "2d ago", then the calendar date.
pub fn format_age(created_utc: i64, now_utc: i64) -> String {
    let elapsed = now_utc.saturating_sub(created_utc).max(0);
    match elapsed {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", elapsed / 60),
        3_600..=86_399 => format!("{}h ago", elapsed / 3_600),
        86_400..=2_591_999 => format!("{}d ago", elapsed / 86_400),
        _ => format_date(created_utc),
    }
}

pub fn format_date(created_utc: i64) -> String {
    DateTime::from_timestamp(created_utc, 0)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

#[cfg(test)]
mod tests {
    use feed_core::{
        update, AppState, Effect, FetchFailure, Msg, Post, Profile,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn ctx(now: Millis) -> RenderContext<'static> {
        RenderContext {
            now,
            wall_now: 1_700_003_600,
            focused_author: None,
        }
    }

    fn post(id: &str, title: &str) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            author: "alice".to_string(),
            subreddit: "rust".to_string(),
            selftext: String::new(),
            score: 42,
            upvote_ratio: 0.97,
            num_comments: 3,
            permalink: format!("/r/rust/comments/{id}/x/"),
            url: String::new(),
            created_utc: 1_700_000_000,
            media: Media::Gallery {
                urls: vec!["a".to_string(), "b".to_string()],
            },
        }
    }

    fn loaded_view() -> AppViewModel {
        let (state, effects) = update(
            AppState::new(),
            Msg::SelectSubreddit {
                name: "rust".to_string(),
                at: 0,
            },
        );
        let Some(Effect::FetchPosts { ticket, .. }) = effects.into_iter().next() else {
            panic!("expected fetch");
        };
        let (state, _) = update(
            state,
            Msg::PostsFetched {
                ticket,
                subreddit: "rust".to_string(),
                result: Ok(vec![post("p1", "Hello world")]),
                at: 10,
            },
        );
        state.view()
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("héllo wörld", 6), "héllo…");
        assert_eq!(truncate("abc", 0), "…");
    }

    #[test]
    fn age_buckets() {
        let now = 1_700_000_000;
        assert_eq!(format_age(now - 5, now), "just now");
        assert_eq!(format_age(now - 300, now), "5m ago");
        assert_eq!(format_age(now - 3 * 3_600, now), "3h ago");
        assert_eq!(format_age(now - 2 * 86_400, now), "2d ago");
        assert_eq!(format_age(0, now), "1970-01-01");
        assert_eq!(format_age(now + 100, now), "just now");
    }

    #[test]
    fn rate_limit_message_counts_down() {
        let mut gate = FetchGate::new(6_000);
        gate.acquire(0);
        assert_eq!(
            failure_message(&FetchFailure::RateLimited, &gate, 1_500),
            "Too many requests. Wait 5s, then `retry`."
        );
        assert_eq!(
            failure_message(&FetchFailure::RateLimited, &gate, 6_000),
            "Too many requests. You can `retry` now."
        );
    }

    #[test]
    fn rate_limit_and_http_429_read_differently() {
        let gate = FetchGate::new(6_000);
        let limited = failure_message(&FetchFailure::RateLimited, &gate, 0);
        let throttled = failure_message(&FetchFailure::Http(429), &gate, 0);
        assert_ne!(limited, throttled);
        assert!(throttled.contains("429"));
    }

    #[test]
    fn feed_lists_posts_with_position_and_media() {
        let text = render(&loaded_view(), &ctx(10));
        assert!(text.contains("r/rust  [anonymous]"));
        assert!(text.contains("  1. [    42 |  97%] Hello world"));
        assert!(text.contains("u/alice · 1h ago · 3 comments · [gallery: 2 images]"));
    }

    #[test]
    fn loading_and_idle_states_render() {
        let idle = render(&AppState::new().view(), &ctx(0));
        assert!(idle.contains("Pick a subreddit"));

        let (state, _) = update(
            AppState::new(),
            Msg::SelectSubreddit {
                name: "rust".to_string(),
                at: 0,
            },
        );
        assert!(render(&state.view(), &ctx(0)).contains("Loading..."));
    }

    #[test]
    fn profile_card_shows_when_focused() {
        let (state, effects) = update(
            AppState::new(),
            Msg::AuthorHovered {
                author: "spez".to_string(),
                at: 0,
            },
        );
        let Some(Effect::FetchProfile { ticket, .. }) = effects.into_iter().next() else {
            panic!("expected fetch");
        };
        let (state, _) = update(
            state,
            Msg::ProfileFetched {
                ticket,
                author: "spez".to_string(),
                result: Ok(Profile {
                    name: "spez".to_string(),
                    total_karma: 900,
                    created_utc: 1_118_030_400,
                }),
                at: 5,
            },
        );
        let context = RenderContext {
            focused_author: Some("spez"),
            ..ctx(5)
        };
        let text = render(&state.view(), &context);
        assert!(text.contains("Karma: 900"));
        assert!(text.contains("Joined: 2005-06-06"));
    }
}
