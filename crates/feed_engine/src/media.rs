use feed_core::Media;

use crate::decode::RawPost;

const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// Reddit HTML-escapes `&` in preview and gallery URLs.
pub fn unescape_url(url: &str) -> String {
    url.replace("&amp;", "&")
}

pub fn is_image_link(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Picks what a post shows: video first, then gallery, then a single image.
pub(crate) fn classify_media(post: &RawPost) -> Media {
    let preview = preview_image(post);

    if post.is_video {
        let video = post
            .media
            .as_ref()
            .and_then(|media| media.reddit_video.as_ref());
        if let Some(url) = video.and_then(|video| video.fallback_url.as_deref()) {
            let poster = video
                .and_then(|video| video.thumbnail_url.as_deref())
                .map(unescape_url)
                .or_else(|| preview.clone());
            return Media::Video {
                url: url.to_string(),
                poster,
            };
        }
    }

    if post.is_gallery {
        if let (Some(gallery), Some(metadata)) = (&post.gallery_data, &post.media_metadata) {
            let urls: Vec<String> = gallery
                .items
                .iter()
                .filter_map(|item| metadata.get(&item.media_id))
                .filter_map(|meta| meta.s.as_ref().and_then(|source| source.u.as_deref()))
                .map(unescape_url)
                .collect();
            if !urls.is_empty() {
                return Media::Gallery { urls };
            }
        }
    }

    if !post.is_video && !post.is_gallery {
        if let Some(url) = preview {
            return Media::Image { url };
        }
        if is_image_link(&post.url) {
            return Media::Image {
                url: post.url.clone(),
            };
        }
    }

    Media::None
}

fn preview_image(post: &RawPost) -> Option<String> {
    post.preview
        .as_ref()?
        .images
        .first()?
        .source
        .as_ref()?
        .url
        .as_deref()
        .map(unescape_url)
}
