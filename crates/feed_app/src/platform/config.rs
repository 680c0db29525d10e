//! Optional RON config file mapped onto the core and engine settings.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use feed_core::{CommentCachePolicy, ExpansionMode, FeedConfig};
use feed_engine::FetchSettings;
use feed_logging::feed_info;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

const DEFAULT_CONFIG_FILENAME: &str = "feed_config.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum CommentCacheSetting {
    Refetch,
    Reuse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum ExpansionSetting {
    Single,
    Independent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct PersistedConfig {
    min_interval_ms: u64,
    comment_cache: CommentCacheSetting,
    expansion: ExpansionSetting,
    default_subreddit: String,
    base_url: String,
    oauth_base_url: String,
    user_agent: String,
    connect_timeout_secs: u64,
    request_timeout_secs: u64,
    max_bytes: u64,
}

impl Default for PersistedConfig {
    fn default() -> Self {
        let feed = FeedConfig::default();
        let fetch = FetchSettings::default();
        Self {
            min_interval_ms: feed.min_interval_ms,
            comment_cache: match feed.comment_cache {
                CommentCachePolicy::Refetch => CommentCacheSetting::Refetch,
                CommentCachePolicy::Reuse => CommentCacheSetting::Reuse,
            },
            expansion: match feed.expansion {
                ExpansionMode::Single => ExpansionSetting::Single,
                ExpansionMode::Independent => ExpansionSetting::Independent,
            },
            default_subreddit: feed.default_subreddit,
            base_url: fetch.base_url,
            oauth_base_url: fetch.oauth_base_url,
            user_agent: fetch.user_agent,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            max_bytes: fetch.max_bytes,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct AppConfig {
    pub feed: FeedConfig,
    pub fetch: FetchSettings,
}

impl From<PersistedConfig> for AppConfig {
    fn from(persisted: PersistedConfig) -> Self {
        Self {
            feed: FeedConfig {
                min_interval_ms: persisted.min_interval_ms,
                comment_cache: match persisted.comment_cache {
                    CommentCacheSetting::Refetch => CommentCachePolicy::Refetch,
                    CommentCacheSetting::Reuse => CommentCachePolicy::Reuse,
                },
                expansion: match persisted.expansion {
                    ExpansionSetting::Single => ExpansionMode::Single,
                    ExpansionSetting::Independent => ExpansionMode::Independent,
                },
                default_subreddit: persisted.default_subreddit,
            },
            fetch: FetchSettings {
                base_url: persisted.base_url,
                oauth_base_url: persisted.oauth_base_url,
                user_agent: persisted.user_agent,
                connect_timeout: Duration::from_secs(persisted.connect_timeout_secs),
                request_timeout: Duration::from_secs(persisted.request_timeout_secs),
                max_bytes: persisted.max_bytes,
            },
        }
    }
}

impl AppConfig {
    pub(crate) fn apply_cli(&mut self, cli: &Cli) {
        if let Some(min_interval_ms) = cli.min_interval_ms {
            self.feed.min_interval_ms = min_interval_ms;
        }
        if let Some(subreddit) = &cli.subreddit {
            self.feed.default_subreddit = subreddit.clone();
        }
    }
}

/// Loads the config from `explicit` (must exist) or from the default file in
/// the current directory (optional). Missing default file means defaults.
pub(crate) fn load_config(explicit: Option<&Path>) -> anyhow::Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILENAME);
            if !default.exists() {
                return Ok(PersistedConfig::default().into());
            }
            default
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    feed_info!("Loaded config from {:?}", path);
    Ok(config)
}

fn parse_config(content: &str) -> anyhow::Result<AppConfig> {
    let persisted: PersistedConfig = ron::from_str(content)?;
    Ok(persisted.into())
}
