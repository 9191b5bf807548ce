//! Periodic refresh of the selected feed
//!
//! While a feed is active it is fetched once immediately and then on every
//! refresh interval. Selecting another feed cancels the previous poll, so an
//! update can only ever come from the feed currently shown.

use crate::client::NewsClient;
use crate::feeds::NewsFeed;
use crate::models::NewsResponse;
use std::sync::Arc;
use std::time::Duration;
use tazasource::Notifier;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Default refresh interval (5 minutes)
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(10);
const UPDATE_CHANNEL_CAPACITY: usize = 8;

const LOAD_ERROR_TITLE: &str = "News Loading Error";
const LOAD_ERROR_DESCRIPTION: &str = "Failed to load news. Please try again.";

#[derive(Debug, Clone)]
pub enum FeedUpdate {
    Loaded { feed: NewsFeed, news: NewsResponse },
    Failed { feed: NewsFeed, error: String },
}

impl FeedUpdate {
    pub fn feed(&self) -> &NewsFeed {
        match self {
            FeedUpdate::Loaded { feed, .. } | FeedUpdate::Failed { feed, .. } => feed,
        }
    }
}

#[derive(Debug)]
struct ActivePoll {
    feed: NewsFeed,
    token: CancellationToken,
    refresh: Arc<Notify>,
    handle: JoinHandle<()>,
}

/// Polls one feed at a time
#[derive(Debug)]
pub struct FeedPoller {
    client: NewsClient,
    interval: Duration,
    notifier: Notifier,
    active: Option<ActivePoll>,
}

impl FeedPoller {
    pub fn new(client: NewsClient, interval: Duration, notifier: Notifier) -> Self {
        Self {
            client,
            interval: interval.max(MIN_REFRESH_INTERVAL),
            notifier,
            active: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn active_feed(&self) -> Option<&NewsFeed> {
        self.active.as_ref().map(|a| &a.feed)
    }

    /// Starts polling `feed`, cancelling any previous poll.
    ///
    /// Must be called from within a Tokio runtime. The returned channel
    /// closes when the poll is cancelled.
    pub fn activate(&mut self, feed: NewsFeed) -> mpsc::Receiver<FeedUpdate> {
        self.deactivate();

        let (tx, rx) = mpsc::channel(UPDATE_CHANNEL_CAPACITY);
        let token = CancellationToken::new();
        let refresh = Arc::new(Notify::new());

        let handle = tokio::spawn(poll_feed(
            self.client.clone(),
            feed.clone(),
            self.interval,
            self.notifier.clone(),
            token.clone(),
            refresh.clone(),
            tx,
        ));

        debug!(feed = %feed.name, interval = ?self.interval, "Feed poll started");
        self.active = Some(ActivePoll {
            feed,
            token,
            refresh,
            handle,
        });
        rx
    }

    /// Fetches the active feed now instead of waiting for the next tick
    pub fn refresh(&self) {
        if let Some(active) = &self.active {
            active.refresh.notify_one();
        }
    }

    /// Stops the active poll, if any
    pub fn deactivate(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
            debug!(feed = %active.feed.name, "Feed poll stopped");
            drop(active.handle);
        }
    }
}

impl Drop for FeedPoller {
    fn drop(&mut self) {
        self.deactivate();
    }
}

async fn poll_feed(
    client: NewsClient,
    feed: NewsFeed,
    interval: Duration,
    notifier: Notifier,
    token: CancellationToken,
    refresh: Arc<Notify>,
    tx: mpsc::Sender<FeedUpdate>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
            _ = refresh.notified() => ticker.reset(),
        }

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = client.fetch(&feed.url) => result,
        };

        let update = match result {
            Ok(news) => FeedUpdate::Loaded {
                feed: feed.clone(),
                news,
            },
            Err(err) => {
                warn!(feed = %feed.name, "Feed fetch failed: {}", err);
                notifier.error(LOAD_ERROR_TITLE, LOAD_ERROR_DESCRIPTION);
                FeedUpdate::Failed {
                    feed: feed.clone(),
                    error: err.to_string(),
                }
            }
        };

        if tx.send(update).await.is_err() {
            break;
        }
    }
}
