//! # TazaNews - RSS news aggregation
//!
//! Fetches a fixed list of RSS feeds through an RSS-to-JSON converter and
//! keeps the selected feed fresh with a [`FeedPoller`].
//!
//! ```no_run
//! use std::time::Duration;
//! use tazanews::{FeedPoller, FeedUpdate, NewsClient, default_feeds};
//! use tazasource::Notifier;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NewsClient::new().await?;
//!     let mut poller = FeedPoller::new(client, Duration::from_secs(300), Notifier::default());
//!
//!     let mut updates = poller.activate(default_feeds().remove(0));
//!     if let Some(FeedUpdate::Loaded { news, .. }) = updates.recv().await {
//!         for article in news.headlines() {
//!             println!("{} ({})", article.title, article.formatted_date());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
#[cfg(feature = "tazaconfig")]
pub mod config_ext;
pub mod error;
pub mod feeds;
pub mod models;
pub mod poller;

pub use client::{ClientBuilder, NewsClient};
#[cfg(feature = "tazaconfig")]
pub use config_ext::NewsConfigExt;
pub use error::{Error, Result};
pub use feeds::{FeedCategory, NewsFeed, default_feeds, feeds_in, find_feed};
pub use models::{Article, FeedInfo, NewsResponse, format_pub_date, strip_html};
pub use poller::{DEFAULT_REFRESH_INTERVAL, FeedPoller, FeedUpdate};
