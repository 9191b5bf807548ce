//! Subcommand implementations

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tazaaudius::{AudiusConfigExt, AudiusSource};
use tazacontrol::{
    DeviceEvent, EventOutcome, LibraryPlayer, LocalLibrary, ObjectUrls, PlaybackCoordinator,
    RadioPlayer, SessionState, SimulatedOutput, Volume,
};
use tazaconfig::Config;
use tazanews::{FeedCategory, FeedPoller, FeedUpdate, NewsConfigExt, NewsResponse};
use tazaradio::{RadioConfigExt, StationQuery, filter_stations};
use tazasaavn::{SaavnConfigExt, SaavnSource};
use tazasource::{
    CatalogSource, Notifier, PlayableItem, SearchCoordinator, SearchOutcome, SourceError,
    SourceTag, StreamResolver, format_time,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

/// Simulated seconds of audio played per tick
const TICK: Duration = Duration::from_millis(250);
const SECONDS_PER_TICK: f64 = 1.0;

/// Duration reported for items whose length is unknown
const FALLBACK_DURATION_SECS: f64 = 180.0;

/// Duration reported for local files
const LOCAL_TRACK_SECS: f64 = 3.0;

// ============================================================================
// Search
// ============================================================================

/// Stands in for a source turned off in the configuration
#[derive(Debug)]
struct DisabledSource(SourceTag);

#[async_trait]
impl CatalogSource for DisabledSource {
    fn tag(&self) -> SourceTag {
        self.0
    }

    async fn search(&self, _query: &str) -> tazasource::Result<Vec<PlayableItem>> {
        debug!(source = %self.0, "Source disabled, skipping");
        Ok(Vec::new())
    }
}

pub async fn search(
    config: &Config,
    notifier: Notifier,
    query: Option<&str>,
    play: Option<usize>,
    listen: u64,
) -> Result<()> {
    let audius_client = tazaaudius::ClientBuilder::from_config(config)?.build().await?;
    let resolver = StreamResolver::new(audius_client.base_url());

    let catalog: Arc<dyn CatalogSource> = if config.get_saavn_enabled()? {
        let client = tazasaavn::ClientBuilder::from_config(config)?.build().await?;
        Arc::new(SaavnSource::new(client))
    } else {
        Arc::new(DisabledSource(SourceTag::Saavn))
    };
    let independent: Arc<dyn CatalogSource> = if config.get_audius_enabled()? {
        Arc::new(AudiusSource::new(audius_client))
    } else {
        Arc::new(DisabledSource(SourceTag::Audius))
    };

    let coordinator = SearchCoordinator::new(catalog, independent, notifier.clone());
    let Some(query) = query else {
        let shelves = coordinator.browse_genres().await;
        let items: Vec<PlayableItem> = shelves
            .iter()
            .flat_map(|(_, items)| items.iter().cloned())
            .collect();
        let mut number = 0;
        for (shelf, items) in &shelves {
            println!("{}", shelf.title);
            for item in items {
                number += 1;
                print_item(number, item);
            }
        }
        return play_numbered(config, notifier, resolver, &items, play, listen).await;
    };
    let results = match coordinator.search(query).await {
        Ok(SearchOutcome::Settled(results)) => results,
        Ok(SearchOutcome::Stale { generation, latest }) => {
            bail!("Search #{} superseded by #{}", generation, latest)
        }
        Err(SourceError::EmptyQuery) => bail!("Please enter a search query"),
        Err(err) => return Err(err.into()),
    };

    if results.is_empty() {
        println!("No songs found for \"{}\"", results.query);
        return Ok(());
    }

    let mut number = 0;
    for section in results.sections() {
        println!("{}", section.header());
        for item in section.items {
            number += 1;
            print_item(number, item);
        }
    }

    let items: Vec<PlayableItem> = results.iter().cloned().collect();
    play_numbered(config, notifier, resolver, &items, play, listen).await
}

fn print_item(number: usize, item: &PlayableItem) {
    let duration = item
        .duration_secs()
        .map(|d| format_time(d as f64))
        .unwrap_or_default();
    println!(
        "  {:>2}. {} - {} [{}] {}",
        number,
        item.display_name(),
        item.artist_label(),
        item.album_label(),
        duration
    );
}

/// Plays entry `play` (1-based) of a numbered listing
async fn play_numbered(
    config: &Config,
    notifier: Notifier,
    resolver: StreamResolver,
    items: &[PlayableItem],
    play: Option<usize>,
    listen: u64,
) -> Result<()> {
    let Some(n) = play else {
        return Ok(());
    };
    let item = n
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .cloned()
        .with_context(|| format!("No result #{}", n))?;

    let duration = item
        .duration_secs()
        .map(|d| d as f64)
        .unwrap_or(FALLBACK_DURATION_SECS);
    let (output, events) = SimulatedOutput::new();
    let mut player = PlaybackCoordinator::new(output.with_auto_load(duration), resolver, notifier)
        .with_volume(Volume::new(config.get_player_default_volume()?));

    if let Err(err) = player.select(item) {
        warn!("Cannot play: {}", err);
        return Ok(());
    }
    listen_to(&mut player, events, listen).await;
    player.close();
    Ok(())
}

async fn listen_to(
    player: &mut PlaybackCoordinator<SimulatedOutput>,
    mut events: UnboundedReceiver<DeviceEvent>,
    listen: u64,
) {
    let ticks = (listen as f64 / SECONDS_PER_TICK).ceil() as u64;
    for _ in 0..ticks {
        while let Ok(event) = events.try_recv() {
            if player.handle_event(&event) == EventOutcome::Ended {
                return;
            }
        }
        if player.state() == SessionState::Errored {
            return;
        }
        let progress = player.progress();
        info!(
            state = player.state().as_str(),
            "{} / {}", progress.elapsed_label, progress.duration_label
        );
        player.output_mut().advance(SECONDS_PER_TICK);
        tokio::time::sleep(TICK).await;
    }
}

// ============================================================================
// Radio
// ============================================================================

pub struct RadioOptions {
    pub country: Option<String>,
    pub tag: Option<String>,
    pub filter: Option<String>,
    pub play: Option<usize>,
    pub listen: u64,
}

pub async fn radio(config: &Config, notifier: Notifier, options: RadioOptions) -> Result<()> {
    let client = tazaradio::ClientBuilder::from_config(config)?.build().await?;

    let country = match options.country {
        Some(country) => country,
        None => config.get_radio_default_country()?,
    };
    let query = StationQuery::new(Some(&country), options.tag.as_deref());
    let mut stations = client
        .stations(&query)
        .await
        .context("Failed to fetch radio stations")?;
    stations.truncate(config.get_radio_display_limit()?);

    let shown = filter_stations(&stations, options.filter.as_deref().unwrap_or_default());
    if shown.is_empty() {
        println!("No stations found");
        return Ok(());
    }
    for (i, station) in shown.iter().enumerate() {
        println!(
            "  {:>2}. {} ({}) [{}]",
            i + 1,
            station.name,
            station.summary(),
            station.display_tags().join(", ")
        );
    }

    let Some(n) = options.play else {
        return Ok(());
    };
    let station = n
        .checked_sub(1)
        .and_then(|i| shown.get(i))
        .copied()
        .with_context(|| format!("No station #{}", n))?;

    let (output, _events) = SimulatedOutput::new();
    let mut player = RadioPlayer::new(output, notifier);
    player.set_volume(config.get_player_default_volume()?);
    if let Err(err) = player.select_station(station) {
        warn!("Cannot tune in: {}", err);
        return Ok(());
    }
    tokio::time::sleep(Duration::from_secs(options.listen)).await;
    player.stop();
    Ok(())
}

// ============================================================================
// News
// ============================================================================

fn print_headlines(news: &NewsResponse) {
    println!("{}", news.feed.title);
    for article in news.headlines() {
        println!("  - {} ({})", article.title, article.formatted_date());
        let summary = article.plain_description();
        if !summary.is_empty() {
            println!("    {}", summary);
        }
    }
}

pub async fn news(config: &Config, notifier: Notifier, feed: Option<&str>, watch: bool) -> Result<()> {
    let feeds = config.get_news_feeds()?;
    let feed = match feed {
        Some(name) => tazanews::find_feed(&feeds, name)
            .cloned()
            .ok_or_else(|| tazanews::Error::UnknownFeed(name.to_string()))?,
        None => feeds.first().cloned().context("No news feed configured")?,
    };
    let client = tazanews::ClientBuilder::from_config(config)?.build().await?;

    if !watch {
        return match client.fetch(&feed.url).await {
            Ok(news) => {
                print_headlines(&news);
                Ok(())
            }
            Err(err) => {
                notifier.error("News Loading Error", "Failed to load news. Please try again.");
                Err(err).with_context(|| format!("Cannot load {}", feed.name))
            }
        };
    }

    let interval = config.get_news_refresh_interval()?;
    let mut poller = FeedPoller::new(client, interval, notifier);
    let mut updates = poller.activate(feed);
    info!("Watching feed, refreshing every {:?} (Ctrl+C to stop)", interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            update = updates.recv() => match update {
                Some(FeedUpdate::Loaded { news, .. }) => print_headlines(&news),
                Some(FeedUpdate::Failed { feed, error }) => {
                    debug!(feed = %feed.name, "Update failed: {}", error)
                }
                None => break,
            },
        }
    }
    poller.deactivate();
    Ok(())
}

pub fn feeds(config: &Config) -> Result<()> {
    let feeds = config.get_news_feeds()?;
    for category in [FeedCategory::IndianNews, FeedCategory::International] {
        println!("{}", category);
        for feed in tazanews::feeds_in(&feeds, category) {
            println!("  - {} <{}>", feed.name, feed.url);
        }
    }
    Ok(())
}

// ============================================================================
// Local library
// ============================================================================

pub async fn library(config: &Config, notifier: Notifier, files: &[PathBuf]) -> Result<()> {
    let urls = ObjectUrls::new();
    let mut library = LocalLibrary::new(urls.clone(), notifier.clone());
    for result in library.add_files(files) {
        if let Err(err) = result {
            warn!("{}", err);
        }
    }
    if library.is_empty() {
        bail!("No audio file to play");
    }
    for (i, track) in library.tracks().iter().enumerate() {
        println!("  {:>2}. {} ({})", i + 1, track.name, track.path.display());
    }

    let (output, mut events) = SimulatedOutput::new();
    let output = output
        .with_object_urls(urls)
        .with_auto_load(LOCAL_TRACK_SECS);
    let track_count = library.len();
    let mut player = LibraryPlayer::new(library, output, notifier);
    player.set_volume(config.get_player_default_volume()?);
    player.toggle()?;

    let mut finished = 0;
    while finished < track_count {
        while let Ok(event) = events.try_recv() {
            if player.handle_event(&event)? == EventOutcome::Ended {
                finished += 1;
            }
        }
        if player.state() == SessionState::Errored {
            player.next()?;
            finished += 1;
            continue;
        }
        player.output_mut().advance(SECONDS_PER_TICK);
        tokio::time::sleep(TICK).await;
    }
    player.close();
    Ok(())
}
