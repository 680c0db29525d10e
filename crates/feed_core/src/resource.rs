use std::fmt;

use crate::Millis;

/// Tag of one accepted fetch. Completions carrying any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The gate refused the request; no network call was made.
    RateLimited,
    /// Transport failure, timeout or an unparseable payload.
    Network(String),
    /// The server answered with a non-2xx status.
    Http(u16),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::RateLimited => write!(f, "rate limited"),
            FetchFailure::Network(message) => write!(f, "network error: {message}"),
            FetchFailure::Http(status) => write!(f, "http status {status}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase<T> {
    Idle,
    Loading { ticket: Ticket },
    Succeeded { data: T, fetched_at: Millis },
    Failed(FetchFailure),
}

/// Lifecycle of one asynchronous fetch for one identifier.
///
/// The phase enum makes the data/error invariants structural: data exists
/// only when succeeded, an error only when failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource<T> {
    key: Option<String>,
    phase: Phase<T>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Resource<T> {
    pub fn new() -> Self {
        Self {
            key: None,
            phase: Phase::Idle,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn status(&self) -> Status {
        match self.phase {
            Phase::Idle => Status::Idle,
            Phase::Loading { .. } => Status::Loading,
            Phase::Succeeded { .. } => Status::Succeeded,
            Phase::Failed(_) => Status::Failed,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match &self.phase {
            Phase::Succeeded { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchFailure> {
        match &self.phase {
            Phase::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn last_fetched_at(&self) -> Option<Millis> {
        match self.phase {
            Phase::Succeeded { fetched_at, .. } => Some(fetched_at),
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        match self.phase {
            Phase::Loading { ticket } => Some(ticket),
            _ => None,
        }
    }

    pub fn is_loading_for(&self, key: &str) -> bool {
        self.status() == Status::Loading && self.key() == Some(key)
    }

    /// Enters loading for `key`, discarding any previous data or error.
    pub fn start(&mut self, key: impl Into<String>, ticket: Ticket) {
        self.key = Some(key.into());
        self.phase = Phase::Loading { ticket };
    }

    /// Marks `key` as rate limited without ever entering loading.
    pub fn reject(&mut self, key: impl Into<String>) {
        self.key = Some(key.into());
        self.phase = Phase::Failed(FetchFailure::RateLimited);
    }

    /// Applies a completion. Returns false and leaves the resource untouched
    /// when the completion does not belong to the fetch currently in flight.
    pub fn settle(
        &mut self,
        key: &str,
        ticket: Ticket,
        result: Result<T, FetchFailure>,
        at: Millis,
    ) -> bool {
        if self.key() != Some(key) || self.in_flight() != Some(ticket) {
            return false;
        }
        self.phase = match result {
            Ok(data) => Phase::Succeeded {
                data,
                fetched_at: at,
            },
            Err(failure) => Phase::Failed(failure),
        };
        true
    }
}
