//! HTTP client for the RSS-to-JSON converter
//!
//! Feeds are fetched through `GET {converter}?rss_url={feed}` which returns
//! the feed metadata and its items as JSON.

use crate::error::{Error, Result};
use crate::models::NewsResponse;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default converter endpoint
pub const DEFAULT_CONVERTER_URL: &str = "https://api.rss2json.com/v1/api.json";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "TazaTunes/0.1 (tazanews)";

/// News HTTP client
#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    converter_url: String,
    timeout: Duration,
}

impl NewsClient {
    /// Create a new client with default settings
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn converter_url(&self) -> &str {
        &self.converter_url
    }

    /// Converter URL for one feed, with the feed URL percent-encoded
    pub fn feed_url(&self, rss_url: &str) -> Result<Url> {
        let mut url = Url::parse(&self.converter_url)?;
        url.query_pairs_mut().append_pair("rss_url", rss_url);
        Ok(url)
    }

    /// Fetch and parse one feed
    pub async fn fetch(&self, rss_url: &str) -> Result<NewsResponse> {
        let url = self.feed_url(rss_url)?;
        tracing::debug!("Fetching feed: {}", url);

        let response = self.client.get(url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(Error::ApiError(format!(
                "API returned status: {}",
                response.status()
            )));
        }

        let text = response.text().await?;
        let news: NewsResponse = serde_json::from_str(&text)?;

        if news.status.eq_ignore_ascii_case("error") {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .unwrap_or_else(|| "conversion failed".to_string());
            return Err(Error::ApiError(message));
        }

        tracing::debug!(feed = %news.feed.title, "Received {} articles", news.items.len());
        Ok(news)
    }
}

/// Builder for configuring a NewsClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    converter_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            converter_url: DEFAULT_CONVERTER_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded from the configuration
    #[cfg(feature = "tazaconfig")]
    pub fn from_config(config: &tazaconfig::Config) -> Result<Self> {
        use crate::config_ext::NewsConfigExt;

        Ok(Self::default()
            .converter_url(config.get_news_converter_url()?)
            .timeout(Duration::from_secs(config.get_http_timeout_secs()?))
            .user_agent(config.get_http_user_agent()?))
    }

    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn converter_url(mut self, url: impl Into<String>) -> Self {
        self.converter_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub async fn build(self) -> Result<NewsClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(NewsClient {
            client,
            converter_url: self.converter_url,
            timeout: self.timeout,
        })
    }
}
