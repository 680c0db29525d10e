//! Feed engine: Reddit content source, payload decoding and effect execution.
mod decode;
mod engine;
mod fetch;
mod media;
mod persist;
mod types;

pub use decode::{decode_comments, decode_posts, decode_profile};
pub use engine::EngineHandle;
pub use fetch::{ContentSource, FetchSettings, RedditSource};
pub use media::{is_image_link, unescape_url};
pub use persist::{ensure_data_dir, PersistError, StateFile};
pub use types::{EngineEvent, FailureKind, FetchError, FetchRequest};
