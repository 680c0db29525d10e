use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SelectSubreddit { name, at } => state.request_posts(&name, at).into_iter().collect(),
        Msg::ExpandPost { post_id, at } => state.expand_post(&post_id, at).into_iter().collect(),
        Msg::CollapsePost { post_id } => {
            state.collapse(post_id.as_deref());
            Vec::new()
        }
        Msg::Retry { at } => state.retry(at).into_iter().collect(),
        Msg::AuthorHovered { author, at } => {
            state.hover_author(&author, at).into_iter().collect()
        }
        Msg::CredentialChanged(credential) => vec![state.set_credential(credential)],
        Msg::CredentialRestored(credential) => {
            state.restore_credential(credential);
            Vec::new()
        }
        Msg::PostsFetched {
            ticket,
            subreddit,
            result,
            at,
        } => {
            state.apply_posts(ticket, &subreddit, result, at);
            Vec::new()
        }
        Msg::CommentsFetched {
            ticket,
            post_id,
            result,
            at,
        } => {
            state.apply_comments(ticket, &post_id, result, at);
            Vec::new()
        }
        Msg::ProfileFetched {
            ticket,
            author,
            result,
            at,
        } => {
            state.apply_profile(ticket, &author, result, at);
            Vec::new()
        }
    };

    (state, effects)
}
