//! Decoding of Reddit's listing JSON into core records.
//!
//! Every field is optional on the wire; missing values fall back to defaults
//! instead of failing the whole listing.

use std::collections::HashMap;

use feed_core::{Comment, Post, Profile};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::media::classify_media;
use crate::{FailureKind, FetchError};

#[derive(Debug, Deserialize)]
struct Thing<T> {
    #[serde(default)]
    kind: String,
    data: T,
}

#[derive(Debug, Deserialize)]
struct Listing<T> {
    #[serde(default = "Vec::new")]
    children: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawPost {
    pub id: String,
    pub title: String,
    pub author: String,
    pub subreddit: String,
    pub selftext: String,
    pub score: i64,
    pub upvote_ratio: f64,
    pub num_comments: u64,
    pub permalink: String,
    pub url: String,
    pub created_utc: f64,
    pub is_video: bool,
    pub is_gallery: bool,
    pub media: Option<RawMedia>,
    pub preview: Option<RawPreview>,
    pub gallery_data: Option<RawGalleryData>,
    pub media_metadata: Option<HashMap<String, RawMediaMetadata>>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMedia {
    pub reddit_video: Option<RawRedditVideo>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawRedditVideo {
    pub fallback_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPreview {
    #[serde(default)]
    pub images: Vec<RawPreviewImage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawPreviewImage {
    pub source: Option<RawImageSource>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawImageSource {
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawGalleryData {
    #[serde(default)]
    pub items: Vec<RawGalleryItem>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawGalleryItem {
    pub media_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMediaMetadata {
    pub s: Option<RawMediaSource>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMediaSource {
    pub u: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawComment {
    id: String,
    author: String,
    body: String,
    created_utc: f64,
    score: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProfile {
    name: String,
    total_karma: Option<i64>,
    link_karma: i64,
    comment_karma: i64,
    created_utc: f64,
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(bytes).map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
}

/// Posts of a subreddit listing (`t3` children), in listing order.
pub fn decode_posts(bytes: &[u8]) -> Result<Vec<Post>, FetchError> {
    let listing: Thing<Listing<Thing<RawPost>>> = parse(bytes)?;
    Ok(listing
        .data
        .children
        .into_iter()
        .filter(|child| child.kind == "t3")
        .map(|child| into_post(child.data))
        .collect())
}

fn into_post(raw: RawPost) -> Post {
    let media = classify_media(&raw);
    Post {
        id: raw.id,
        title: raw.title,
        author: raw.author,
        subreddit: raw.subreddit,
        selftext: raw.selftext,
        score: raw.score,
        upvote_ratio: raw.upvote_ratio,
        num_comments: raw.num_comments,
        permalink: raw.permalink,
        url: raw.url,
        created_utc: raw.created_utc as i64,
        media,
    }
}

/// Top-level comments of a post page.
///
/// The page is a two-element array `[post listing, comment listing]`. Only
/// `t1` children with an id and a body are kept; `more` stubs are dropped.
pub fn decode_comments(bytes: &[u8]) -> Result<Vec<Comment>, FetchError> {
    let pages: Vec<Thing<Listing<Thing<serde_json::Value>>>> = parse(bytes)?;
    let Some(thread) = pages.into_iter().nth(1) else {
        return Ok(Vec::new());
    };

    let mut comments = Vec::new();
    for child in thread.data.children {
        if child.kind != "t1" {
            continue;
        }
        let raw: RawComment = serde_json::from_value(child.data)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        if raw.id.is_empty() || raw.body.is_empty() {
            continue;
        }
        comments.push(Comment {
            id: raw.id,
            author: raw.author,
            body: raw.body,
            created_utc: raw.created_utc as i64,
            score: raw.score,
        });
    }
    Ok(comments)
}

/// Account summary from `user/{name}/about.json`.
pub fn decode_profile(bytes: &[u8]) -> Result<Profile, FetchError> {
    let thing: Thing<RawProfile> = parse(bytes)?;
    let raw = thing.data;
    if raw.name.is_empty() {
        return Err(FetchError::new(FailureKind::Decode, "profile without a name"));
    }
    Ok(Profile {
        total_karma: raw
            .total_karma
            .unwrap_or(raw.link_karma + raw.comment_karma),
        name: raw.name,
        created_utc: raw.created_utc as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_skip_non_link_children() {
        let json = br#"{"kind":"Listing","data":{"children":[
            {"kind":"t3","data":{"id":"a","title":"A","created_utc":1700000000.0}},
            {"kind":"t5","data":{"id":"sub"}},
            {"kind":"t3","data":{"id":"b","title":"B"}}
        ]}}"#;
        let posts = decode_posts(json).unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(posts[0].created_utc, 1_700_000_000);
    }

    #[test]
    fn comments_keep_only_t1_with_body() {
        let json = br#"[
            {"kind":"Listing","data":{"children":[]}},
            {"kind":"Listing","data":{"children":[
                {"kind":"t1","data":{"id":"c1","author":"x","body":"hi","score":3}},
                {"kind":"t1","data":{"id":"c2","author":"y","body":""}},
                {"kind":"more","data":{"count":10,"children":["c9"]}},
                {"kind":"t1","data":{"id":"c3","author":"z","body":"yo"}}
            ]}}
        ]"#;
        let comments = decode_comments(json).unwrap();
        let ids: Vec<_> = comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3"]);
        assert_eq!(comments[0].score, 3);
    }

    #[test]
    fn comments_page_without_thread_is_empty() {
        let json = br#"[{"kind":"Listing","data":{"children":[]}}]"#;
        assert!(decode_comments(json).unwrap().is_empty());
    }

    #[test]
    fn profile_falls_back_to_summed_karma() {
        let json = br#"{"kind":"t2","data":{"name":"spez","link_karma":10,"comment_karma":5,"created_utc":1118030400.0}}"#;
        let profile = decode_profile(json).unwrap();
        assert_eq!(profile.total_karma, 15);
        assert_eq!(profile.created_utc, 1_118_030_400);
    }

    #[test]
    fn malformed_json_is_decode_error() {
        let err = decode_posts(b"<html>").unwrap_err();
        assert_eq!(err.kind, FailureKind::Decode);
    }
}
