//! Data models for the station directory
//!
//! This module contains the station record returned by the directory and
//! the filter criteria used to query it.

use serde::{Deserialize, Deserializer, Serialize};

/// Countries offered in the country picker
pub const COUNTRIES: &[&str] = &[
    "India",
    "USA",
    "UK",
    "Germany",
    "France",
    "Japan",
    "Australia",
    "Canada",
];

/// Country selected when nothing else is configured
pub const DEFAULT_COUNTRY: &str = "India";

/// Tags offered in the genre picker
pub const POPULAR_TAGS: &[&str] = &[
    "bollywood",
    "rock",
    "pop",
    "jazz",
    "classical",
    "electronic",
    "country",
    "hip-hop",
];

/// Picker value meaning "no tag filter"
pub const ALL_TAGS: &str = "all";

/// Number of tags shown next to a station
pub const DISPLAYED_TAGS: usize = 3;

/// Empty strings become `None`
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

// ============================================================================
// Station
// ============================================================================

/// A station as listed by the directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RadioStation {
    /// Directory identifier
    #[serde(rename = "stationuuid")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Raw stream URL as submitted to the directory
    #[serde(default)]
    pub url: String,
    /// Stream URL after playlist/redirect resolution by the directory
    #[serde(default)]
    pub url_resolved: String,
    #[serde(default)]
    pub country: String,
    /// Comma-separated tags
    #[serde(default)]
    pub tags: String,
    /// Bitrate in kbps, 0 when unknown
    #[serde(default)]
    pub bitrate: u32,
    #[serde(default)]
    pub votes: u32,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub favicon: Option<String>,
}

impl RadioStation {
    /// Resolved URL when present, raw URL otherwise
    pub fn stream_url(&self) -> Option<&str> {
        [self.url_resolved.as_str(), self.url.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|u| !u.is_empty())
    }

    /// Tags split on commas, trimmed, empties dropped
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// First tags, as shown in station lists
    pub fn display_tags(&self) -> Vec<&str> {
        self.tag_list().into_iter().take(DISPLAYED_TAGS).collect()
    }

    /// `"India • 128kbps • 42 votes"`, omitting unknown parts
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.country.is_empty() {
            parts.push(self.country.clone());
        }
        if self.bitrate > 0 {
            parts.push(format!("{}kbps", self.bitrate));
        }
        parts.push(format!("{} votes", self.votes));
        parts.join(" • ")
    }

    /// Case-insensitive match of `needle` against the name or the tag string
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.tags.to_lowercase().contains(&needle)
    }
}

/// Narrows an already fetched list by name or tag text.
///
/// Blank text keeps every station. Order is preserved.
pub fn filter_stations<'a>(stations: &'a [RadioStation], text: &str) -> Vec<&'a RadioStation> {
    stations.iter().filter(|s| s.matches(text)).collect()
}

// ============================================================================
// Query
// ============================================================================

/// Server-side filter for a directory request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationQuery {
    pub country: Option<String>,
    pub tag: Option<String>,
}

impl StationQuery {
    /// Builds a query from picker values.
    ///
    /// Blank values and the `"all"` tag mean no filter.
    pub fn new(country: Option<&str>, tag: Option<&str>) -> Self {
        let clean = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL_TAGS))
                .map(str::to_string)
        };
        Self {
            country: clean(country),
            tag: clean(tag),
        }
    }

    pub fn by_country(country: &str) -> Self {
        Self::new(Some(country), None)
    }

    /// Path segments appended to `.../stations`
    pub fn path_segments(&self) -> Vec<&str> {
        let mut segments = Vec::new();
        if let Some(country) = &self.country {
            segments.extend(["bycountry", country.as_str()]);
        }
        if let Some(tag) = &self.tag {
            segments.extend(["bytag", tag.as_str()]);
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn station(name: &str, tags: &str) -> RadioStation {
        serde_json::from_value(json!({
            "stationuuid": format!("id-{name}"),
            "name": name,
            "url": "http://raw.example/stream",
            "url_resolved": "",
            "country": "India",
            "tags": tags,
            "bitrate": 128,
            "votes": 10,
            "favicon": ""
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_directory_record() {
        let s = station("Radio Mirchi", "bollywood,hindi,fm");
        assert_eq!(s.id, "id-Radio Mirchi");
        assert_eq!(s.favicon, None);
        assert_eq!(s.summary(), "India • 128kbps • 10 votes");
    }

    #[test]
    fn test_stream_url_prefers_resolved() {
        let mut s = station("a", "");
        assert_eq!(s.stream_url(), Some("http://raw.example/stream"));

        s.url_resolved = "http://resolved.example/stream".into();
        assert_eq!(s.stream_url(), Some("http://resolved.example/stream"));

        s.url_resolved.clear();
        s.url.clear();
        assert_eq!(s.stream_url(), None);
    }

    #[test]
    fn test_display_tags_keeps_first_three() {
        let s = station("a", "bollywood, hindi,,fm,news");
        assert_eq!(s.display_tags(), vec!["bollywood", "hindi", "fm"]);
    }

    #[test]
    fn test_filter_matches_name_or_tags_case_insensitively() {
        let stations = vec![
            station("Radio City FM", "bollywood"),
            station("Vividh Bharati", "bollywood,FM"),
            station("Big Radio", "bollywood,hindi"),
        ];

        let names: Vec<_> = filter_stations(&stations, "fm")
            .into_iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Radio City FM", "Vividh Bharati"]);

        assert_eq!(filter_stations(&stations, "  ").len(), 3);
    }

    #[test]
    fn test_query_segments() {
        let both = StationQuery::new(Some("India"), Some("bollywood"));
        assert_eq!(both.path_segments(), vec!["bycountry", "India", "bytag", "bollywood"]);

        let country_only = StationQuery::new(Some("India"), Some("all"));
        assert_eq!(country_only.path_segments(), vec!["bycountry", "India"]);

        let tag_only = StationQuery::new(None, Some("jazz"));
        assert_eq!(tag_only.path_segments(), vec!["bytag", "jazz"]);

        assert!(StationQuery::new(Some(" "), None).path_segments().is_empty());
    }
}
