//! Playable item model and its display projections

use crate::SourceTag;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Artist label used when a catalog song lists no primary artist
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Album label of every independent track (that catalog has no albums)
pub const INDEPENDENT_RELEASE: &str = "Independent Release";

/// Artwork quality preferred for thumbnails, for both sources
pub const PREFERRED_THUMBNAIL: &str = "150x150";

/// Accepts identifiers sent either as strings or as integers (null becomes empty)
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(Error::custom("ID must be a string or number")),
    }
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts durations sent as numbers, numeric strings or null
fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

// ============================================================================
// Catalog songs (song-search proxy)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtistGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub primary: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A link tagged with a quality (`"320kbps"`, `"150x150"`, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityLink {
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality: String,
    #[serde(default, alias = "url", deserialize_with = "null_as_default")]
    pub link: String,
}

impl QualityLink {
    /// Leading number of the quality tag, `0` when there is none
    fn rank(&self) -> u32 {
        let digits: String = self
            .quality
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().unwrap_or(0)
    }
}

/// A track record from the song-search proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSong {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, alias = "artists", deserialize_with = "null_as_default")]
    pub artist: ArtistGroup,
    #[serde(default, deserialize_with = "null_as_default")]
    pub album: AlbumRef,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub duration: Option<u64>,
    /// Download links, lowest quality first as served by the API
    #[serde(default, rename = "downloadUrl", deserialize_with = "null_as_default")]
    pub download_url: Vec<QualityLink>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: Vec<QualityLink>,
}

impl CatalogSong {
    /// Primary artist names joined with ", ", or [`UNKNOWN_ARTIST`]
    pub fn artist_label(&self) -> String {
        if self.artist.primary.is_empty() {
            return UNKNOWN_ARTIST.to_string();
        }
        self.artist
            .primary
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The "150x150" image, else the first image, else nothing
    pub fn thumbnail(&self) -> Option<&str> {
        self.image
            .iter()
            .find(|img| img.quality == PREFERRED_THUMBNAIL && !img.link.is_empty())
            .or_else(|| self.image.first())
            .map(|img| img.link.as_str())
            .filter(|link| !link.is_empty())
    }

    /// Download link with the highest numeric quality.
    ///
    /// Entries with an empty link are skipped. On equal rank the later entry
    /// wins, matching the ascending order the API uses.
    pub fn best_download_link(&self) -> Option<&str> {
        self.download_url
            .iter()
            .filter(|l| !l.link.trim().is_empty())
            .max_by_key(|l| l.rank())
            .map(|l| l.link.as_str())
    }
}

// ============================================================================
// Independent tracks (independent-artist catalog)
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uploader {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub handle: Option<String>,
}

/// Artwork published at fixed resolutions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    #[serde(default, rename = "150x150")]
    pub small: Option<String>,
    #[serde(default, rename = "480x480")]
    pub medium: Option<String>,
}

/// A track record from the independent-artist catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndependentTrack {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user: Uploader,
    #[serde(default, deserialize_with = "deserialize_seconds")]
    pub duration: Option<u64>,
    #[serde(default)]
    pub artwork: Option<Artwork>,
    #[serde(default)]
    pub stream_url: Option<String>,
}

impl IndependentTrack {
    /// "150x150" artwork, then "480x480", else nothing
    pub fn thumbnail(&self) -> Option<&str> {
        let artwork = self.artwork.as_ref()?;
        [&artwork.small, &artwork.medium]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|link| !link.is_empty())
    }
}

// ============================================================================
// Unified view
// ============================================================================

/// Identity of an item for playback: ids only repeat across sources
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub source: SourceTag,
    pub id: String,
}

impl ItemKey {
    pub fn new(source: SourceTag, id: impl Into<String>) -> Self {
        Self {
            source,
            id: id.into(),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.id)
    }
}

/// Either kind of searchable track, tagged when the record is ingested
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", content = "item", rename_all = "lowercase")]
pub enum PlayableItem {
    #[serde(rename = "saavn")]
    Catalog(CatalogSong),
    #[serde(rename = "audius")]
    Independent(IndependentTrack),
}

impl PlayableItem {
    pub fn source(&self) -> SourceTag {
        match self {
            PlayableItem::Catalog(_) => SourceTag::Saavn,
            PlayableItem::Independent(_) => SourceTag::Audius,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            PlayableItem::Catalog(song) => &song.id,
            PlayableItem::Independent(track) => &track.id,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey::new(self.source(), self.id())
    }

    pub fn is_catalog_song(&self) -> bool {
        matches!(self, PlayableItem::Catalog(_))
    }

    pub fn is_independent_track(&self) -> bool {
        matches!(self, PlayableItem::Independent(_))
    }

    pub fn display_name(&self) -> &str {
        match self {
            PlayableItem::Catalog(song) => &song.name,
            PlayableItem::Independent(track) => &track.title,
        }
    }

    pub fn artist_label(&self) -> String {
        match self {
            PlayableItem::Catalog(song) => song.artist_label(),
            PlayableItem::Independent(track) => track.user.name.clone(),
        }
    }

    pub fn album_label(&self) -> &str {
        match self {
            PlayableItem::Catalog(song) => &song.album.name,
            PlayableItem::Independent(_) => INDEPENDENT_RELEASE,
        }
    }

    pub fn thumbnail(&self) -> Option<&str> {
        match self {
            PlayableItem::Catalog(song) => song.thumbnail(),
            PlayableItem::Independent(track) => track.thumbnail(),
        }
    }

    pub fn duration_secs(&self) -> Option<u64> {
        match self {
            PlayableItem::Catalog(song) => song.duration,
            PlayableItem::Independent(track) => track.duration,
        }
    }
}

impl From<CatalogSong> for PlayableItem {
    fn from(song: CatalogSong) -> Self {
        PlayableItem::Catalog(song)
    }
}

impl From<IndependentTrack> for PlayableItem {
    fn from(track: IndependentTrack) -> Self {
        PlayableItem::Independent(track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song(value: serde_json::Value) -> CatalogSong {
        serde_json::from_value(value).unwrap()
    }

    fn track(value: serde_json::Value) -> IndependentTrack {
        serde_json::from_value(value).unwrap()
    }

    fn perfect() -> CatalogSong {
        song(json!({
            "id": "dXo4",
            "name": "Perfect",
            "artist": { "primary": [{ "id": "578407", "name": "Ed Sheeran" }] },
            "album": { "id": "11004", "name": "Divide" },
            "duration": 263,
            "downloadUrl": [
                { "quality": "12kbps", "link": "https://cdn.example/12.mp4" },
                { "quality": "96kbps", "link": "https://cdn.example/96.mp4" },
                { "quality": "320kbps", "link": "https://cdn.example/320.mp4" },
                { "quality": "160kbps", "link": "https://cdn.example/160.mp4" }
            ],
            "image": [
                { "quality": "50x50", "link": "https://img.example/50.jpg" },
                { "quality": "150x150", "link": "https://img.example/150.jpg" },
                { "quality": "500x500", "link": "https://img.example/500.jpg" }
            ]
        }))
    }

    #[test]
    fn test_exactly_one_predicate_holds() {
        let items = [
            PlayableItem::from(perfect()),
            PlayableItem::from(track(json!({ "id": "abc123", "title": "Demo" }))),
        ];
        for item in &items {
            assert!(item.is_catalog_song() ^ item.is_independent_track());
        }
    }

    #[test]
    fn test_catalog_projections() {
        let item = PlayableItem::from(perfect());
        assert_eq!(item.display_name(), "Perfect");
        assert_eq!(item.artist_label(), "Ed Sheeran");
        assert_eq!(item.album_label(), "Divide");
        assert_eq!(item.duration_secs(), Some(263));
        assert_eq!(item.key(), ItemKey::new(SourceTag::Saavn, "dXo4"));
    }

    #[test]
    fn test_multiple_artists_are_joined() {
        let s = song(json!({
            "id": "1",
            "name": "Duet",
            "artist": { "primary": [{ "name": "A" }, { "name": "B" }] },
        }));
        assert_eq!(s.artist_label(), "A, B");
    }

    #[test]
    fn test_empty_primary_artists_fall_back() {
        let s = song(json!({ "id": "1", "name": "x", "artist": { "primary": [] } }));
        assert_eq!(s.artist_label(), UNKNOWN_ARTIST);

        let bare = song(json!({ "id": "2" }));
        assert_eq!(bare.artist_label(), "Unknown Artist");
    }

    #[test]
    fn test_null_fields_fall_back_to_defaults() {
        let s = song(json!({
            "id": "x1",
            "name": "Perfect",
            "album": { "id": null, "name": null, "url": null },
            "artists": { "primary": [{ "id": 1, "name": null }] },
            "image": null,
            "downloadUrl": [{ "quality": null, "url": "https://cdn.example/a.mp4" }]
        }));
        assert_eq!(s.album, AlbumRef::default());
        assert_eq!(s.artist.primary[0].name, "");
        assert!(s.image.is_empty());
        assert_eq!(s.best_download_link(), Some("https://cdn.example/a.mp4"));

        let nameless = song(json!({ "id": "x2", "name": null, "album": null, "artists": null }));
        assert_eq!(nameless.name, "");
        assert_eq!(nameless.album.name, "");
        assert_eq!(nameless.artist_label(), UNKNOWN_ARTIST);

        let t = track(json!({ "id": "abc", "title": null, "user": null }));
        assert_eq!(t.title, "");
        assert_eq!(t.user, Uploader::default());
    }

    #[test]
    fn test_independent_album_label_is_fixed() {
        let item = PlayableItem::from(track(json!({
            "id": "abc123",
            "title": "Night Drive",
            "user": { "name": "Synth Kid" },
            "duration": 180
        })));
        assert_eq!(item.album_label(), "Independent Release");
        assert_eq!(item.artist_label(), "Synth Kid");
        assert_eq!(item.display_name(), "Night Drive");
    }

    #[test]
    fn test_catalog_thumbnail_prefers_150() {
        assert_eq!(perfect().thumbnail(), Some("https://img.example/150.jpg"));

        let fallback = song(json!({
            "id": "1",
            "image": [
                { "quality": "50x50", "link": "https://img.example/50.jpg" },
                { "quality": "500x500", "link": "https://img.example/500.jpg" }
            ]
        }));
        assert_eq!(fallback.thumbnail(), Some("https://img.example/50.jpg"));

        let none = song(json!({ "id": "1", "image": [] }));
        assert_eq!(none.thumbnail(), None);
    }

    #[test]
    fn test_independent_thumbnail_prefers_150() {
        let both = track(json!({
            "id": "1",
            "artwork": { "150x150": "https://a/150.jpg", "480x480": "https://a/480.jpg" }
        }));
        assert_eq!(both.thumbnail(), Some("https://a/150.jpg"));

        let medium = track(json!({ "id": "1", "artwork": { "480x480": "https://a/480.jpg" } }));
        assert_eq!(medium.thumbnail(), Some("https://a/480.jpg"));

        let none = track(json!({ "id": "1", "artwork": null }));
        assert_eq!(none.thumbnail(), None);
    }

    #[test]
    fn test_best_download_link() {
        assert_eq!(perfect().best_download_link(), Some("https://cdn.example/320.mp4"));

        let with_url_alias = song(json!({
            "id": "1",
            "downloadUrl": [
                { "quality": "96kbps", "url": "https://cdn.example/96.mp4" },
                { "quality": "320kbps", "url": "" }
            ]
        }));
        assert_eq!(
            with_url_alias.best_download_link(),
            Some("https://cdn.example/96.mp4")
        );

        let none = song(json!({ "id": "1", "downloadUrl": [] }));
        assert_eq!(none.best_download_link(), None);
    }

    #[test]
    fn test_numeric_ids_and_string_durations() {
        let t = track(json!({ "id": 42, "title": "n", "duration": "12" }));
        assert_eq!(t.id, "42");
        assert_eq!(t.duration, Some(12));
    }
}
