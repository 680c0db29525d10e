use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use feed_core::{Effect, FetchFailure, Msg};
use feed_engine::{EngineEvent, EngineHandle, FetchRequest, FetchSettings};
use feed_logging::{feed_debug, feed_info};

use super::app::AppEvent;
use super::clock::Clock;
use super::persistence;

pub struct EffectRunner {
    engine: EngineHandle,
    data_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(
        event_tx: mpsc::Sender<AppEvent>,
        settings: FetchSettings,
        data_dir: PathBuf,
        clock: Clock,
    ) -> anyhow::Result<Self> {
        let engine = EngineHandle::new(settings)?;
        let runner = Self { engine, data_dir };
        runner.spawn_event_loop(event_tx, clock);
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchPosts {
                    ticket,
                    subreddit,
                    credential,
                } => {
                    feed_info!("FetchPosts ticket={} subreddit={}", ticket, subreddit);
                    self.engine
                        .enqueue(FetchRequest::Posts { ticket, subreddit }, credential);
                }
                Effect::FetchComments {
                    ticket,
                    post_id,
                    permalink,
                    credential,
                } => {
                    feed_info!("FetchComments ticket={} post_id={}", ticket, post_id);
                    self.engine.enqueue(
                        FetchRequest::Comments {
                            ticket,
                            post_id,
                            permalink,
                        },
                        credential,
                    );
                }
                Effect::FetchProfile {
                    ticket,
                    author,
                    credential,
                } => {
                    feed_info!("FetchProfile ticket={} author={}", ticket, author);
                    self.engine
                        .enqueue(FetchRequest::Profile { ticket, author }, credential);
                }
                Effect::StoreCredential(credential) => {
                    feed_info!(
                        "StoreCredential present={}",
                        credential.is_some()
                    );
                    persistence::save_credential(&self.data_dir, credential.as_ref());
                }
            }
        }
    }

    fn spawn_event_loop(&self, event_tx: mpsc::Sender<AppEvent>, clock: Clock) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(250)) else {
                continue;
            };
            let msg = map_event(event, clock.now());
            if event_tx.send(AppEvent::Core(msg)).is_err() {
                feed_debug!("App loop gone; stopping engine event forwarding");
                break;
            }
        });
    }
}

/// Turns an engine completion into a core message stamped with `at`.
pub(crate) fn map_event(event: EngineEvent, at: feed_core::Millis) -> Msg {
    match event {
        EngineEvent::PostsFetched {
            ticket,
            subreddit,
            result,
        } => Msg::PostsFetched {
            ticket,
            subreddit,
            result: result.map_err(FetchFailure::from),
            at,
        },
        EngineEvent::CommentsFetched {
            ticket,
            post_id,
            result,
        } => Msg::CommentsFetched {
            ticket,
            post_id,
            result: result.map_err(FetchFailure::from),
            at,
        },
        EngineEvent::ProfileFetched {
            ticket,
            author,
            result,
        } => Msg::ProfileFetched {
            ticket,
            author,
            result: result.map_err(FetchFailure::from),
            at,
        },
    }
}
