//! HTTP client for the internet radio station directory
//!
//! The directory exposes station lists filtered by country and/or tag:
//!
//! - `{base}/stations/bycountry/{country}/bytag/{tag}`
//! - `{base}/stations/bycountry/{country}`
//! - `{base}/stations/bytag/{tag}`
//! - `{base}/stations`
//!
//! # Example
//!
//! ```no_run
//! use tazaradio::{RadioBrowserClient, StationQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RadioBrowserClient::new().await?;
//!
//!     let query = StationQuery::new(Some("India"), Some("bollywood"));
//!     for station in client.stations(&query).await?.iter().take(5) {
//!         println!("{} ({})", station.name, station.summary());
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{RadioStation, StationQuery};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default directory base URL
pub const DEFAULT_BASE_URL: &str = "https://de1.api.radio-browser.info/json";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "TazaTunes/0.1 (tazaradio)";

/// Station directory HTTP client
///
/// The client is stateless and does not cache responses.
#[derive(Debug, Clone)]
pub struct RadioBrowserClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl RadioBrowserClient {
    /// Create a new client with default settings
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client with a custom reqwest::Client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL for a query, percent-encoding each segment
    pub fn stations_url(&self, query: &StationQuery) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| Error::other(format!("Base URL cannot be a base: {}", self.base_url)))?;
            segments.pop_if_empty().push("stations");
            for segment in query.path_segments() {
                segments.push(segment);
            }
        }
        Ok(url)
    }

    /// Fetch the stations matching `query`, in directory order
    pub async fn stations(&self, query: &StationQuery) -> Result<Vec<RadioStation>> {
        let url = self.stations_url(query)?;
        tracing::debug!("Fetching stations: {}", url);

        let response = self.client.get(url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(Error::ApiError(format!(
                "API returned status: {}",
                response.status()
            )));
        }

        let stations: Vec<RadioStation> = response.json().await?;
        tracing::debug!(
            country = ?query.country,
            tag = ?query.tag,
            "Received {} stations",
            stations.len()
        );

        Ok(stations)
    }
}

/// Builder for configuring a RadioBrowserClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    proxy: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded with base URL, timeout and User-Agent from the configuration
    #[cfg(feature = "tazaconfig")]
    pub fn from_config(config: &tazaconfig::Config) -> Result<Self> {
        use crate::config_ext::RadioConfigExt;

        Ok(Self::default()
            .base_url(config.get_radio_base_url()?)
            .timeout(Duration::from_secs(config.get_http_timeout_secs()?))
            .user_agent(config.get_http_user_agent()?))
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the client
    pub async fn build(self) -> Result<RadioBrowserClient> {
        let client = if let Some(client) = self.client {
            client
        } else {
            let mut builder = Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout);

            if let Some(proxy_url) = &self.proxy {
                let proxy = reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::other(format!("Invalid proxy: {}", e)))?;
                builder = builder.proxy(proxy);
            }

            builder.build()?
        };

        Ok(RadioBrowserClient {
            client,
            base_url: self.base_url,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Unit Tests (no network)
    // ========================================================================

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.base_url, DEFAULT_BASE_URL);
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_stations_url() {
        let client = RadioBrowserClient::with_client(Client::new());

        let url = client
            .stations_url(&StationQuery::new(Some("India"), Some("bollywood")))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://de1.api.radio-browser.info/json/stations/bycountry/India/bytag/bollywood"
        );

        let url = client.stations_url(&StationQuery::default()).unwrap();
        assert_eq!(url.as_str(), "https://de1.api.radio-browser.info/json/stations");
    }

    #[test]
    fn test_stations_url_encodes_segments() {
        let client = RadioBrowserClient::with_client(Client::new());
        let url = client
            .stations_url(&StationQuery::new(Some("United States"), Some("hip-hop")))
            .unwrap();
        assert!(url.as_str().ends_with("/stations/bycountry/United%20States/bytag/hip-hop"));
    }

    // ========================================================================
    // Integration Tests (real API calls)
    //
    // Run with: cargo test -p tazaradio -- --ignored
    // ========================================================================

    #[tokio::test]
    #[ignore = "Integration test - calls real radio directory API"]
    async fn test_stations_india_bollywood() {
        let client = RadioBrowserClient::new().await.unwrap();
        let stations = client
            .stations(&StationQuery::new(Some("India"), Some("bollywood")))
            .await
            .unwrap();
        assert!(!stations.is_empty());
        assert!(stations.iter().all(|s| !s.id.is_empty()));
    }
}
