//! Error types for the news client

/// Result type alias for news operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when fetching news feeds
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Converter returned an error status
    #[error("API error: {0}")]
    ApiError(String),

    /// Feed not in the configured list
    #[error("Unknown feed: {0}")]
    UnknownFeed(String),

    /// Configuration error (from tazaconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl Error {
    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::ApiError(msg.into())
    }
}
