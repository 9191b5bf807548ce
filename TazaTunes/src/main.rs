//! TazaTunes command-line front-end
//!
//! Wires the catalog clients, the station directory, the news feeds and the
//! local library to a simulated audio output.

mod commands;
mod logging;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tazaconfig::{Config, get_config};
use tazasource::{Notification, Notifier};
use tokio::sync::broadcast;
use tracing::debug;

#[derive(Parser)]
#[command(name = "tazatunes", version, about)]
struct Flags {
    /// Configuration directory
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log level (ERROR, WARN, INFO, DEBUG, TRACE)
    #[arg(long)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search both music catalogs, or browse genre shelves without a query
    Search {
        query: Option<String>,
        /// Play result number N
        #[arg(long)]
        play: Option<usize>,
        /// Simulated listening time in seconds
        #[arg(long, default_value_t = 5)]
        listen: u64,
    },
    /// Browse internet radio stations
    Radio {
        #[arg(long)]
        country: Option<String>,
        /// Genre tag, "all" for none
        #[arg(long)]
        tag: Option<String>,
        /// Keep stations whose name or tags contain TEXT
        #[arg(long)]
        filter: Option<String>,
        /// Tune to station number N
        #[arg(long)]
        play: Option<usize>,
        #[arg(long, default_value_t = 5)]
        listen: u64,
    },
    /// Show the headlines of a feed
    News {
        /// Feed name, the first feed when omitted
        #[arg(long)]
        feed: Option<String>,
        /// Keep refreshing until Ctrl+C
        #[arg(long)]
        watch: bool,
    },
    /// List the news feeds
    Feeds,
    /// Add local files to a library and play it through
    Library {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn load_config(dir: Option<&PathBuf>) -> anyhow::Result<Arc<Config>> {
    match dir {
        Some(dir) => {
            let dir = dir.to_str().context("Configuration path is not valid UTF-8")?;
            let config = Config::load_config(dir)
                .with_context(|| format!("Cannot load configuration from {}", dir))?;
            Ok(Arc::new(config))
        }
        None => Ok(get_config()),
    }
}

async fn print_notifications(mut rx: broadcast::Receiver<Notification>) {
    loop {
        match rx.recv().await {
            Ok(notice) if notice.is_error() => {
                eprintln!("!! {}: {}", notice.title, notice.description)
            }
            Ok(notice) => println!("** {}: {}", notice.title, notice.description),
            Err(broadcast::error::RecvError::Lagged(n)) => debug!("{} notifications lost", n),
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let flags = Flags::parse();

    let config = load_config(flags.config.as_ref())?;
    logging::init_logging(&config, flags.log_level.as_deref());
    debug!("Configuration loaded from {}", config.directory());

    let notifier = Notifier::default();
    let printer = tokio::spawn(print_notifications(notifier.subscribe()));

    let result = match flags.command {
        Command::Search {
            query,
            play,
            listen,
        } => commands::search(&config, notifier, query.as_deref(), play, listen).await,
        Command::Radio {
            country,
            tag,
            filter,
            play,
            listen,
        } => {
            let options = commands::RadioOptions {
                country,
                tag,
                filter,
                play,
                listen,
            };
            commands::radio(&config, notifier, options).await
        }
        Command::News { feed, watch } => {
            commands::news(&config, notifier, feed.as_deref(), watch).await
        }
        Command::Feeds => {
            drop(notifier);
            commands::feeds(&config)
        }
        Command::Library { files } => commands::library(&config, notifier, &files).await,
    };

    // The printer ends once every notifier clone is gone
    let _ = tokio::time::timeout(Duration::from_secs(1), printer).await;
    result
}
