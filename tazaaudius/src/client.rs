//! HTTP client for the independent-artist catalog
//!
//! Tracks are searched with `GET {base}/tracks/search?query=..&limit=..`
//! and streamed from `{base}/tracks/{id}/stream`.

use crate::error::{AudiusError, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tazasource::{DEFAULT_INDEPENDENT_BASE_URL, IndependentTrack, independent_stream_url};
use tracing::{debug, warn};
use url::Url;

/// Default catalog base URL
pub const DEFAULT_BASE_URL: &str = DEFAULT_INDEPENDENT_BASE_URL;

/// Default page size of a search
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "TazaTunes/0.1 (tazaaudius)";

#[derive(Debug, Deserialize)]
struct TracksResponse {
    #[serde(default)]
    data: Vec<IndependentTrack>,
}

/// Independent catalog HTTP client
#[derive(Debug, Clone)]
pub struct AudiusClient {
    client: Client,
    base_url: String,
    search_limit: u32,
    timeout: Duration,
}

impl AudiusClient {
    /// Create a new client with default settings
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn search_limit(&self) -> u32 {
        self.search_limit
    }

    /// URL the audio output streams a track from
    pub fn stream_url(&self, track_id: &str) -> String {
        independent_stream_url(&self.base_url, track_id)
    }

    /// Searches tracks matching `query`, at most `search_limit` of them.
    ///
    /// A blank query returns an empty list without any request.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<IndependentTrack>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = Url::parse(&format!(
            "{}/tracks/search",
            self.base_url.trim_end_matches('/')
        ))?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("limit", &self.search_limit.to_string());
        debug!("GET {}", url);

        let response = self.client.get(url).timeout(self.timeout).send().await?;
        let tracks = Self::handle_response(response).await?.data;
        debug!(query, "Received {} tracks", tracks.len());
        Ok(tracks)
    }

    async fn handle_response(response: Response) -> Result<TracksResponse> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("API error ({}): {}", status.as_u16(), error_text);
            return Err(AudiusError::from_status_code(status.as_u16(), error_text));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            AudiusError::JsonParse(e)
        })
    }
}

/// Builder for configuring an AudiusClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    search_limit: u32,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
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
        use crate::config_ext::AudiusConfigExt;

        Ok(Self::default()
            .base_url(config.get_audius_base_url()?)
            .search_limit(config.get_audius_search_limit()?)
            .timeout(Duration::from_secs(config.get_http_timeout_secs()?))
            .user_agent(config.get_http_user_agent()?))
    }

    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the page size, at least 1
    pub fn search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit.max(1);
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

    pub async fn build(self) -> Result<AudiusClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(AudiusClient {
            client,
            base_url: self.base_url,
            search_limit: self.search_limit,
            timeout: self.timeout,
        })
    }
}
