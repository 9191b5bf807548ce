//! Internet radio station directory client for TazaTunes
//!
//! This crate queries a public radio station directory by country and/or
//! genre tag and models the stations it returns.
//!
//! # Features
//!
//! - **Directory queries**: country and tag filters applied server side
//! - **Local filtering**: narrow an already fetched list by name or tag text
//! - **Stream selection**: resolved stream URL first, raw URL as fallback
//! - **Configuration Extension**: directory URL, default country and list size
//!
//! # Example
//!
//! ```no_run
//! use tazaradio::{RadioBrowserClient, StationQuery, filter_stations};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RadioBrowserClient::new().await?;
//!     let stations = client
//!         .stations(&StationQuery::new(Some("India"), Some("bollywood")))
//!         .await?;
//!
//!     for station in filter_stations(&stations, "fm").into_iter().take(50) {
//!         println!("{} -> {:?}", station.name, station.stream_url());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
#[cfg(feature = "tazaconfig")]
pub mod config_ext;
pub mod error;
pub mod models;

pub use client::{ClientBuilder, RadioBrowserClient};
#[cfg(feature = "tazaconfig")]
pub use config_ext::RadioConfigExt;
pub use error::{Error, Result};
pub use models::{
    ALL_TAGS, COUNTRIES, DEFAULT_COUNTRY, POPULAR_TAGS, RadioStation, StationQuery,
    filter_stations,
};
