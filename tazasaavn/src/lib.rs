//! # TazaSaavn - song-search proxy client
//!
//! Searches the public song-search proxy and turns its records into
//! [`tazasource::PlayableItem::Catalog`] items.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tazasaavn::{SaavnClient, SaavnSource};
//! use tazasource::CatalogSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = Arc::new(SaavnSource::new(SaavnClient::new().await?));
//!     for item in source.search("Perfect").await? {
//!         println!("{} by {}", item.display_name(), item.artist_label());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
#[cfg(feature = "tazaconfig")]
pub mod config_ext;
pub mod error;
pub mod source;

pub use client::{ClientBuilder, SaavnClient};
#[cfg(feature = "tazaconfig")]
pub use config_ext::SaavnConfigExt;
pub use error::{Result, SaavnError};
pub use source::SaavnSource;
