use std::time::Duration;

use feed_core::{Comment, Credential, Post, Profile};
use feed_logging::{feed_debug, feed_warn};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::{decode_comments, decode_posts, decode_profile, FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Host for anonymous requests.
    pub base_url: String,
    /// Host for requests carrying a credential.
    pub oauth_base_url: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.reddit.com".to_string(),
            oauth_base_url: "https://oauth.reddit.com".to_string(),
            user_agent: concat!("feed_app/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 8 * 1024 * 1024,
        }
    }
}

/// Where posts, comment threads and author profiles come from.
///
/// The credential is opaque to callers; how it is used (host, headers) is up
/// to the implementation.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_subreddit_posts(
        &self,
        subreddit: &str,
        credential: Option<&Credential>,
    ) -> Result<Vec<Post>, FetchError>;

    async fn fetch_comments(
        &self,
        permalink: &str,
        credential: Option<&Credential>,
    ) -> Result<Vec<Comment>, FetchError>;

    async fn fetch_author_profile(
        &self,
        username: &str,
        credential: Option<&Credential>,
    ) -> Result<Profile, FetchError>;
}

/// Reddit's JSON API over `reqwest`.
#[derive(Debug, Clone)]
pub struct RedditSource {
    settings: FetchSettings,
    client: reqwest::Client,
}

impl RedditSource {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Builds `{host}/{segments...}.json?raw_json=1`, percent-encoding each
    /// segment.
    fn endpoint(&self, segments: &[&str], credential: Option<&Credential>) -> Result<Url, FetchError> {
        let host = if credential.is_some() {
            &self.settings.oauth_base_url
        } else {
            &self.settings.base_url
        };
        let mut url = Url::parse(host)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let Some((last, rest)) = segments.split_last() else {
            return Err(FetchError::new(FailureKind::InvalidUrl, "empty path"));
        };
        let last = format!("{last}.json");
        url.path_segments_mut()
            .map_err(|_| FetchError::new(FailureKind::InvalidUrl, "base url cannot hold a path"))?
            .pop_if_empty()
            .extend(rest)
            .push(&last);
        url.query_pairs_mut().append_pair("raw_json", "1");
        Ok(url)
    }

    async fn get_json(&self, url: Url, credential: Option<&Credential>) -> Result<Vec<u8>, FetchError> {
        feed_debug!("GET {}", url);
        let mut request = self
            .client
            .get(url.clone())
            .header(USER_AGENT, &self.settings.user_agent)
            .header(ACCEPT, "application/json");
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.expose());
        }

        let response = request.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            feed_warn!("GET {} answered {}", url, status);
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl ContentSource for RedditSource {
    async fn fetch_subreddit_posts(
        &self,
        subreddit: &str,
        credential: Option<&Credential>,
    ) -> Result<Vec<Post>, FetchError> {
        let url = self.endpoint(&["r", subreddit], credential)?;
        let bytes = self.get_json(url, credential).await?;
        decode_posts(&bytes)
    }

    async fn fetch_comments(
        &self,
        permalink: &str,
        credential: Option<&Credential>,
    ) -> Result<Vec<Comment>, FetchError> {
        let segments: Vec<&str> = permalink
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        let url = self.endpoint(&segments, credential)?;
        let bytes = self.get_json(url, credential).await?;
        decode_comments(&bytes)
    }

    async fn fetch_author_profile(
        &self,
        username: &str,
        credential: Option<&Credential>,
    ) -> Result<Profile, FetchError> {
        let url = self.endpoint(&["user", username, "about"], credential)?;
        let bytes = self.get_json(url, credential).await?;
        decode_profile(&bytes)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
