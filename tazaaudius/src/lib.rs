//! # TazaAudius - independent-artist catalog client
//!
//! Searches the independent-artist catalog and turns its records into
//! [`tazasource::PlayableItem::Independent`] items. Tracks are streamed from
//! the deterministic `{base}/tracks/{id}/stream` URL.

pub mod client;
#[cfg(feature = "tazaconfig")]
pub mod config_ext;
pub mod error;
pub mod source;

pub use client::{AudiusClient, ClientBuilder, DEFAULT_SEARCH_LIMIT};
#[cfg(feature = "tazaconfig")]
pub use config_ext::AudiusConfigExt;
pub use error::{AudiusError, Result};
pub use source::AudiusSource;
