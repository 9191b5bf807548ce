//! Gestion des erreurs pour le client du catalogue indépendant

use thiserror::Error;

/// Result type for independent catalog operations
pub type Result<T> = std::result::Result<T, AudiusError>;

/// Errors returned by the independent catalog client
#[derive(Error, Debug)]
pub enum AudiusError {
    /// Ressource non trouvée
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Erreur de configuration (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Catalog API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Quota dépassé (rate limiting)
    #[error("Rate limit exceeded, please try again later")]
    RateLimitExceeded,

    /// Erreur générique
    #[error("Catalog error: {0}")]
    Other(String),
}

impl AudiusError {
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
}
