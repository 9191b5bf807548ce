//! Error types for the station directory client

/// Result type alias for station directory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the station directory client
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

    /// API returned an error status
    #[error("API error: {0}")]
    ApiError(String),

    /// Station has neither a resolved nor a raw stream URL
    #[error("No stream URL for station: {0}")]
    NoStreamUrl(String),

    /// Configuration error (from tazaconfig/anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an API error
    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::ApiError(msg.into())
    }
}
