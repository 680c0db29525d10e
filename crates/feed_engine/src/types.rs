use std::fmt;

use feed_core::{Comment, FetchFailure, Post, PostId, Profile, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Posts {
        ticket: Ticket,
        subreddit: String,
    },
    Comments {
        ticket: Ticket,
        post_id: PostId,
        permalink: String,
    },
    Profile {
        ticket: Ticket,
        author: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PostsFetched {
        ticket: Ticket,
        subreddit: String,
        result: Result<Vec<Post>, FetchError>,
    },
    CommentsFetched {
        ticket: Ticket,
        post_id: PostId,
        result: Result<Vec<Comment>, FetchError>,
    },
    ProfileFetched {
        ticket: Ticket,
        author: String,
        result: Result<Profile, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

/// Collapses transport details into the taxonomy the view state tracks.
/// Only a server status survives as its own kind; everything else, decode
/// failures included, is a network error.
impl From<FetchError> for FetchFailure {
    fn from(err: FetchError) -> Self {
        match err.kind {
            FailureKind::HttpStatus(status) => FetchFailure::Http(status),
            _ => FetchFailure::Network(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed payload"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
