//! The fixed list of news feeds

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedCategory {
    #[serde(rename = "Indian News", alias = "indian")]
    IndianNews,
    #[serde(rename = "International", alias = "international")]
    International,
}

impl FeedCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FeedCategory::IndianNews => "Indian News",
            FeedCategory::International => "International",
        }
    }
}

impl fmt::Display for FeedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A selectable RSS feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsFeed {
    pub name: String,
    pub url: String,
    pub category: FeedCategory,
}

impl NewsFeed {
    pub fn new(name: impl Into<String>, url: impl Into<String>, category: FeedCategory) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            category,
        }
    }
}

const DEFAULT_FEEDS: &[(&str, &str, FeedCategory)] = &[
    (
        "NDTV",
        "https://feeds.feedburner.com/ndtvnews-top-stories",
        FeedCategory::IndianNews,
    ),
    (
        "India Today",
        "https://www.indiatoday.in/rss/home",
        FeedCategory::IndianNews,
    ),
    (
        "Times of India",
        "https://timesofindia.indiatimes.com/rssfeeds/-2128936835.cms",
        FeedCategory::IndianNews,
    ),
    (
        "Zee News Hindi",
        "https://zeenews.india.com/hindi/rss/india.xml",
        FeedCategory::IndianNews,
    ),
    (
        "BBC Hindi",
        "http://feeds.bbci.co.uk/hindi/rss.xml",
        FeedCategory::IndianNews,
    ),
    (
        "BBC World",
        "http://feeds.bbci.co.uk/news/world/rss.xml",
        FeedCategory::International,
    ),
    (
        "CNN Top Stories",
        "http://rss.cnn.com/rss/cnn_topstories.rss",
        FeedCategory::International,
    ),
    (
        "Reuters",
        "http://feeds.reuters.com/reuters/topNews",
        FeedCategory::International,
    ),
];

/// The eight built-in feeds, Indian first
pub fn default_feeds() -> Vec<NewsFeed> {
    DEFAULT_FEEDS
        .iter()
        .map(|(name, url, category)| NewsFeed::new(*name, *url, *category))
        .collect()
}

/// Feeds of one category, in list order
pub fn feeds_in(feeds: &[NewsFeed], category: FeedCategory) -> Vec<&NewsFeed> {
    feeds.iter().filter(|f| f.category == category).collect()
}

/// Case-insensitive lookup by feed name
pub fn find_feed<'a>(feeds: &'a [NewsFeed], name: &str) -> Option<&'a NewsFeed> {
    feeds.iter().find(|f| f.name.eq_ignore_ascii_case(name.trim()))
}
