//! Feed core: fetch gate, resource lifecycle and the pure view synchronizer.
mod config;
mod effect;
mod gate;
mod model;
mod msg;
mod resource;
mod state;
mod update;
mod view_model;

pub use config::{
    CommentCachePolicy, ExpansionMode, FeedConfig, DEFAULT_MIN_INTERVAL_MS, DEFAULT_SUBREDDIT,
};
pub use effect::Effect;
pub use gate::{try_acquire, FetchGate, GateDecision};
pub use model::{normalize_subreddit, Comment, Credential, Media, Millis, Post, PostId, Profile};
pub use msg::Msg;
pub use resource::{FetchFailure, Resource, Status, Ticket};
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, ThreadView};
