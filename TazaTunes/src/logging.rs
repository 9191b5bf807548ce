//! Console logging
//!
//! Level precedence: `--log-level`, then `RUST_LOG`, then the configured
//! `host.logger.min_level`.

use tazaconfig::Config;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt, util::SubscriberInitExt};

pub fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

fn level_filter(level: Level) -> EnvFilter {
    EnvFilter::new(level.as_str().to_lowercase())
}

pub fn init_logging(config: &Config, cli_level: Option<&str>) {
    let filter = match cli_level.and_then(string_to_level) {
        Some(level) => level_filter(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let level = config
                .get_log_min_level()
                .ok()
                .and_then(|l| string_to_level(&l))
                .unwrap_or(Level::INFO);
            level_filter(level)
        }),
    };

    let enable_console = config.get_log_enable_console().unwrap_or(true);
    let subscriber = Registry::default().with(filter);

    if enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .init();
    } else {
        subscriber.init();
    }
}
