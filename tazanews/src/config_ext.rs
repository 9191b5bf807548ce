//! Extension pour intégrer les flux d'actualités dans tazaconfig

use crate::client::DEFAULT_CONVERTER_URL;
use crate::feeds::{NewsFeed, default_feeds};
use crate::poller::DEFAULT_REFRESH_INTERVAL;
use anyhow::Result;
use serde_yaml::{Number, Value};
use std::time::Duration;
use tazaconfig::Config;

/// Extension trait adding news settings to `tazaconfig::Config`
pub trait NewsConfigExt {
    /// RSS-to-JSON converter endpoint
    fn get_news_converter_url(&self) -> Result<String>;

    fn set_news_converter_url(&self, url: String) -> Result<()>;

    /// Refresh interval of the active feed (default: 5 minutes)
    fn get_news_refresh_interval(&self) -> Result<Duration>;

    fn set_news_refresh_interval(&self, interval: Duration) -> Result<()>;

    /// Configured feeds, or the built-in list when none are configured
    fn get_news_feeds(&self) -> Result<Vec<NewsFeed>>;

    fn set_news_feeds(&self, feeds: &[NewsFeed]) -> Result<()>;
}

impl NewsConfigExt for Config {
    fn get_news_converter_url(&self) -> Result<String> {
        match self.get_value(&["news", "rss2json_url"]) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => {
                self.set_news_converter_url(DEFAULT_CONVERTER_URL.to_string())?;
                Ok(DEFAULT_CONVERTER_URL.to_string())
            }
        }
    }

    fn set_news_converter_url(&self, url: String) -> Result<()> {
        self.set_value(&["news", "rss2json_url"], Value::String(url))
    }

    fn get_news_refresh_interval(&self) -> Result<Duration> {
        match self.get_value(&["news", "refresh_interval_secs"]) {
            Ok(Value::Number(n)) if n.as_u64().is_some_and(|s| s > 0) => {
                Ok(Duration::from_secs(n.as_u64().unwrap_or(300)))
            }
            _ => {
                self.set_news_refresh_interval(DEFAULT_REFRESH_INTERVAL)?;
                Ok(DEFAULT_REFRESH_INTERVAL)
            }
        }
    }

    fn set_news_refresh_interval(&self, interval: Duration) -> Result<()> {
        self.set_value(
            &["news", "refresh_interval_secs"],
            Value::Number(Number::from(interval.as_secs())),
        )
    }

    fn get_news_feeds(&self) -> Result<Vec<NewsFeed>> {
        match self.get_typed::<Vec<NewsFeed>>(&["news", "feeds"]) {
            Ok(Some(feeds)) if !feeds.is_empty() => Ok(feeds),
            Ok(_) => Ok(default_feeds()),
            Err(err) => {
                tracing::warn!("Invalid news.feeds configuration, using built-in feeds: {}", err);
                Ok(default_feeds())
            }
        }
    }

    fn set_news_feeds(&self, feeds: &[NewsFeed]) -> Result<()> {
        self.set_value(&["news", "feeds"], serde_yaml::to_value(feeds)?)
    }
}
