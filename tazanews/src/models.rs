//! Data models for converted RSS feeds

use chrono::{DateTime, NaiveDateTime};
use scraper::Html;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of articles shown for a feed
pub const DISPLAYED_ARTICLES: usize = 10;

/// Output format of publication dates
pub const DATE_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Feed-level metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub link: String,
}

/// One news item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    /// Raw publication date as provided by the converter
    #[serde(default, rename = "pubDate")]
    pub pub_date: String,
    /// HTML description
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub content: Option<String>,
}

impl Article {
    /// Description with markup removed and whitespace collapsed
    pub fn plain_description(&self) -> String {
        strip_html(&self.description)
    }

    /// Publication date formatted for display, or the raw value when unparsable
    pub fn formatted_date(&self) -> String {
        format_pub_date(&self.pub_date)
    }
}

/// Converter response for one feed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub feed: FeedInfo,
    #[serde(default)]
    pub items: Vec<Article>,
}

impl NewsResponse {
    /// Articles shown for the feed
    pub fn headlines(&self) -> &[Article] {
        &self.items[..self.items.len().min(DISPLAYED_ARTICLES)]
    }
}

/// Text content of an HTML fragment, whitespace collapsed
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    fragment
        .root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats a feed date with [`DATE_FORMAT`].
///
/// Accepts the converter's `YYYY-MM-DD HH:MM:SS`, RFC 2822 and RFC 3339;
/// anything else is returned unchanged.
pub fn format_pub_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return naive.format(DATE_FORMAT).to_string();
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(trimmed) {
        return date.format(DATE_FORMAT).to_string();
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return date.format(DATE_FORMAT).to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Markets <b>rally</b>\n as  rates fall</p><img src=\"x.jpg\">"),
            "Markets rally as rates fall"
        );
        assert_eq!(strip_html("plain text"), "plain text");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_format_pub_date() {
        assert_eq!(format_pub_date("2024-05-01 14:05:00"), "May 1, 2024, 02:05 PM");
        assert_eq!(
            format_pub_date("Wed, 01 May 2024 09:30:00 +0530"),
            "May 1, 2024, 09:30 AM"
        );
        assert_eq!(format_pub_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_article_deserialization() {
        let article: Article = serde_json::from_value(json!({
            "title": "Headline",
            "link": "https://news.example/1",
            "pubDate": "2024-05-01 14:05:00",
            "description": "<p>Body</p>",
            "thumbnail": "",
            "enclosure": {}
        }))
        .unwrap();

        assert_eq!(article.thumbnail, None);
        assert_eq!(article.content, None);
        assert_eq!(article.plain_description(), "Body");
    }

    #[test]
    fn test_headlines_are_capped() {
        let item = Article {
            title: "t".into(),
            link: String::new(),
            pub_date: String::new(),
            description: String::new(),
            thumbnail: None,
            content: None,
        };
        let response = NewsResponse {
            items: vec![item; 25],
            ..Default::default()
        };
        assert_eq!(response.headlines().len(), DISPLAYED_ARTICLES);
    }
}
