//! Gestion des erreurs pour le client de recherche de chansons

use thiserror::Error;

/// Result type for song-search operations
pub type Result<T> = std::result::Result<T, SaavnError>;

/// Errors returned by the song-search client
#[derive(Error, Debug)]
pub enum SaavnError {
    /// Ressource non trouvée
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Invalid base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Erreur de configuration (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// The proxy answered with an error status or `success: false`
    #[error("Search API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Quota dépassé (rate limiting)
    #[error("Rate limit exceeded, please try again later")]
    RateLimitExceeded,

    /// Erreur générique
    #[error("Search error: {0}")]
    Other(String),
}

impl SaavnError {
    /// Crée une erreur API depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            404 => Self::NotFound(message.into()),
            429 => Self::RateLimitExceeded,
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Vérifie si l'erreur est une erreur de rate limiting
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, SaavnError::RateLimitExceeded)
    }
}
