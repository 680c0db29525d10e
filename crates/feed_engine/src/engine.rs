use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use feed_core::Credential;
use feed_logging::{feed_debug, feed_warn};

use crate::fetch::{ContentSource, FetchSettings, RedditSource};
use crate::{EngineEvent, FetchError, FetchRequest};

enum EngineCommand {
    Fetch {
        request: FetchRequest,
        credential: Option<Credential>,
    },
}

/// Runs content-source calls on a background Tokio runtime.
///
/// Requests go in through `enqueue`; completions come back as
/// [`EngineEvent`]s in completion order.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let source = RedditSource::new(settings)?;
        Self::with_source(Arc::new(source))
            .map_err(|err| FetchError::new(crate::FailureKind::Network, err.to_string()))
    }

    pub fn with_source(source: Arc<dyn ContentSource>) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let source = source.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(source.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn enqueue(&self, request: FetchRequest, credential: Option<Credential>) {
        feed_debug!("enqueue {:?}", request);
        let _ = self.cmd_tx.send(EngineCommand::Fetch {
            request,
            credential,
        });
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    source: &dyn ContentSource,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let EngineCommand::Fetch {
        request,
        credential,
    } = command;
    let credential = credential.as_ref();

    let event = match request {
        FetchRequest::Posts { ticket, subreddit } => {
            let result = source.fetch_subreddit_posts(&subreddit, credential).await;
            log_failure(&result, "posts", &subreddit);
            EngineEvent::PostsFetched {
                ticket,
                subreddit,
                result,
            }
        }
        FetchRequest::Comments {
            ticket,
            post_id,
            permalink,
        } => {
            let result = source.fetch_comments(&permalink, credential).await;
            log_failure(&result, "comments", &permalink);
            EngineEvent::CommentsFetched {
                ticket,
                post_id,
                result,
            }
        }
        FetchRequest::Profile { ticket, author } => {
            let result = source.fetch_author_profile(&author, credential).await;
            log_failure(&result, "profile", &author);
            EngineEvent::ProfileFetched {
                ticket,
                author,
                result,
            }
        }
    };
    let _ = event_tx.send(event);
}

fn log_failure<T>(result: &Result<T, FetchError>, what: &str, target: &str) {
    if let Err(err) = result {
        feed_warn!("Fetching {} for {} failed: {}", what, target, err);
    }
}
