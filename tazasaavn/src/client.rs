//! HTTP client for the song-search proxy
//!
//! # Example
//!
//! ```no_run
//! use tazasaavn::SaavnClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SaavnClient::new().await?;
//!     for song in client.search_songs("Perfect").await? {
//!         println!("{} - {}", song.name, song.artist_label());
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::{Result, SaavnError};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tazasource::CatalogSong;
use tracing::{debug, warn};
use url::Url;

/// Default song-search proxy base URL
pub const DEFAULT_BASE_URL: &str = "https://saavn.dev/api";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "TazaTunes/0.1 (tazasaavn)";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<SearchData>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    results: Vec<CatalogSong>,
}

/// Song-search proxy HTTP client
#[derive(Debug, Clone)]
pub struct SaavnClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl SaavnClient {
    /// Create a new client with default settings
    pub async fn new() -> Result<Self> {
        Self::builder().build().await
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Searches songs matching `query`.
    ///
    /// A blank query returns an empty list without any request.
    pub async fn search_songs(&self, query: &str) -> Result<Vec<CatalogSong>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response: SearchResponse = self.get("search/songs", &[("query", query)]).await?;
        let songs = response.data.unwrap_or_default().results;
        debug!(query, "Received {} songs", songs.len());
        Ok(songs)
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint
        ))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    /// Effectue une requête GET à l'API
    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint_url(endpoint, params)?;
        debug!("GET {}", url);

        let response = self.client.get(url).timeout(self.timeout).send().await?;
        self.handle_response(response).await
    }

    /// Traite la réponse HTTP
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let status_code = status.as_u16();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("API error ({}): {}", status_code, error_text);
            return Err(SaavnError::from_status_code(status_code, error_text));
        }

        let text = response.text().await?;

        // Le proxy signale certaines erreurs avec un statut 200 et success=false
        if let Ok(json) = serde_json::from_str::<Value>(&text) {
            if json.get("success") == Some(&Value::Bool(false)) {
                let message = json
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("Unknown error");
                warn!("Search API error: {}", message);
                return Err(SaavnError::ApiError {
                    code: status_code,
                    message: message.to_string(),
                });
            }
        }

        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            SaavnError::JsonParse(e)
        })
    }
}

/// Builder for configuring a SaavnClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded with base URL, timeout and User-Agent from the configuration
    #[cfg(feature = "tazaconfig")]
    pub fn from_config(config: &tazaconfig::Config) -> Result<Self> {
        use crate::config_ext::SaavnConfigExt;

        Ok(Self::default()
            .base_url(config.get_saavn_base_url()?)
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

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub async fn build(self) -> Result<SaavnClient> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };

        Ok(SaavnClient {
            client,
            base_url: self.base_url,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_endpoint_url_encodes_query() {
        let client = SaavnClient::builder()
            .base_url("http://localhost/api/")
            .build()
            .await
            .unwrap();
        let url = client
            .endpoint_url("search/songs", &[("query", "tum hi ho")])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost/api/search/songs?query=tum+hi+ho");
    }

    #[tokio::test]
    async fn test_blank_query_skips_request() {
        // Unroutable base: any request would fail
        let client = SaavnClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .await
            .unwrap();
        assert!(client.search_songs("  ").await.unwrap().is_empty());
    }

    #[tokio::test]
    #[ignore = "Integration test - calls real song-search API"]
    async fn test_search_real_api() {
        let client = SaavnClient::new().await.unwrap();
        let songs = client.search_songs("Perfect").await.unwrap();
        assert!(!songs.is_empty());
    }
}
