//! Stream URL resolution
//!
//! The independent catalog streams every track from a fixed URL template;
//! catalog songs carry their own download links and the best quality wins.

use crate::{PlayableItem, Result, SourceError};
use tracing::warn;
use url::Url;

/// Public discovery node of the independent catalog
pub const DEFAULT_INDEPENDENT_BASE_URL: &str = "https://discoveryprovider.audius.co/v1";

/// `{base}/tracks/{id}/stream`, with `id` percent-encoded as a path segment
pub fn independent_stream_url(base_url: &str, id: &str) -> String {
    let mut url = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(base_url, "Invalid stream base URL: {}", e);
            return format!("{}/tracks/{}/stream", base_url.trim_end_matches('/'), id);
        }
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["tracks", id, "stream"]);
    }
    url.to_string()
}

/// Resolves the URL bound to the audio output for a [`PlayableItem`]
#[derive(Debug, Clone)]
pub struct StreamResolver {
    independent_base_url: String,
}

impl Default for StreamResolver {
    fn default() -> Self {
        Self::new(DEFAULT_INDEPENDENT_BASE_URL)
    }
}

impl StreamResolver {
    pub fn new(independent_base_url: impl Into<String>) -> Self {
        Self {
            independent_base_url: independent_base_url.into(),
        }
    }

    pub fn independent_base_url(&self) -> &str {
        &self.independent_base_url
    }

    /// Returns the stream URL, or [`SourceError::NoStreamResolvable`] when the
    /// item carries nothing playable.
    pub fn resolve(&self, item: &PlayableItem) -> Result<String> {
        match item {
            PlayableItem::Independent(track) if !track.id.is_empty() => {
                Ok(independent_stream_url(&self.independent_base_url, &track.id))
            }
            PlayableItem::Catalog(song) => song
                .best_download_link()
                .map(str::to_string)
                .ok_or_else(|| SourceError::NoStreamResolvable(item.display_name().to_string())),
            PlayableItem::Independent(_) => Err(SourceError::NoStreamResolvable(
                item.display_name().to_string(),
            )),
        }
    }
}
