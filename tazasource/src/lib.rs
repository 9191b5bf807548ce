//! # TazaSource
//!
//! Common traits and types for TazaTunes catalog sources.
//!
//! This crate provides the foundational abstractions shared by the song-search
//! proxy (`tazasaavn`), the independent-artist catalog (`tazaaudius`) and the
//! playback layer (`tazacontrol`):
//!
//! - **[`PlayableItem`]**: a tagged union over [`CatalogSong`] and
//!   [`IndependentTrack`]. The variant is chosen by the client that
//!   deserialized the record, never by probing fields afterwards.
//! - **Projections**: display name, artist label, album label and thumbnail
//!   for any item, with documented fallbacks instead of errors.
//! - **[`StreamResolver`]**: turns an item into the URL handed to the audio
//!   output device.
//! - **[`SearchCoordinator`]**: runs both catalog searches concurrently and
//!   tags every query with a generation so stale responses are discarded.
//! - **[`Notifier`]**: the transient user-visible notification bus every
//!   failure ends up on.
//!
//! ## Implementing a source
//!
//! ```rust,ignore
//! use tazasource::{CatalogSource, PlayableItem, SourceTag, Result};
//!
//! #[derive(Debug)]
//! struct MySource;
//!
//! #[async_trait::async_trait]
//! impl CatalogSource for MySource {
//!     fn tag(&self) -> SourceTag {
//!         SourceTag::Saavn
//!     }
//!
//!     async fn search(&self, query: &str) -> Result<Vec<PlayableItem>> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod item;
pub mod notification;
pub mod search;
pub mod stream;
pub mod time;

pub use item::{
    AlbumRef, ArtistGroup, ArtistRef, Artwork, CatalogSong, INDEPENDENT_RELEASE,
    IndependentTrack, ItemKey, PREFERRED_THUMBNAIL, PlayableItem, QualityLink, UNKNOWN_ARTIST,
    Uploader,
};
pub use notification::{Notification, Notifier, Severity};
pub use search::{
    CombinedResults, GENRE_SHELVES, GenreShelf, ResultSection, SHELF_SIZE, SearchCoordinator,
    SearchOutcome, SourceFailure,
};
pub use stream::{DEFAULT_INDEPENDENT_BASE_URL, StreamResolver, independent_stream_url};
pub use time::format_time;

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Error types for catalog source operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    #[error("{origin} request failed: {message}")]
    Network { origin: SourceTag, message: String },

    #[error("Search query is empty")]
    EmptyQuery,

    #[error("No playable stream for {0}")]
    NoStreamResolvable(String),

    #[error("Source not available: {0}")]
    SourceUnavailable(String),
}

impl SourceError {
    /// Wraps any client error as a network failure of `origin`
    pub fn network(origin: SourceTag, err: impl fmt::Display) -> Self {
        Self::Network {
            origin,
            message: err.to_string(),
        }
    }
}

/// Result type for catalog source operations
pub type Result<T> = std::result::Result<T, SourceError>;

/// Where a playable item comes from.
///
/// Item identifiers are only unique within one source, so playback identity
/// is always the pair `(SourceTag, id)`, see [`ItemKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    /// Song-search proxy (catalog songs)
    Saavn,
    /// Independent-artist catalog
    Audius,
    /// Files added to the local library
    Local,
}

impl SourceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::Saavn => "saavn",
            SourceTag::Audius => "audius",
            SourceTag::Local => "local",
        }
    }

    /// Human readable section label used when listing results
    pub fn section_label(&self) -> &'static str {
        match self {
            SourceTag::Saavn => "Popular Music (Saavn)",
            SourceTag::Audius => "Independent Artists (Audius)",
            SourceTag::Local => "My Music",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A searchable catalog of playable items.
///
/// Implementations wrap one remote service and tag everything they return
/// with their own [`SourceTag`].
#[async_trait::async_trait]
pub trait CatalogSource: Debug + Send + Sync {
    /// Tag stamped on every item this source returns
    fn tag(&self) -> SourceTag;

    /// Display name of the source
    fn name(&self) -> &str {
        self.tag().section_label()
    }

    /// Searches the catalog.
    ///
    /// Callers reject blank queries before reaching this method; sources may
    /// still return an empty list for them.
    async fn search(&self, query: &str) -> Result<Vec<PlayableItem>>;
}
