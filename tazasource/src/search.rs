//! Dual catalog search
//!
//! A query is sent to the catalog-song source and to the independent-track
//! source at the same time. Both requests are awaited before the result set
//! is considered settled; a failure on one side is reported without
//! discarding what the other side returned.
//!
//! Every query takes a fresh generation number. When a response settles
//! after a newer query has been issued it comes back as
//! [`SearchOutcome::Stale`] and must not be displayed.
//!
//! Before anything is searched, [`SearchCoordinator::browse_genres`] fills a
//! few genre shelves from the catalog-song source.

use crate::{CatalogSource, Notifier, PlayableItem, Result, SourceError, SourceTag};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

const SEARCH_ERROR_TITLE: &str = "Search Error";
const SEARCH_ERROR_DESCRIPTION: &str = "Failed to search songs. Please try again.";

/// Songs shown per genre shelf
pub const SHELF_SIZE: usize = 5;

/// A genre shelf and the catalog query that fills it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenreShelf {
    pub title: &'static str,
    pub query: &'static str,
}

pub const GENRE_SHELVES: [GenreShelf; 3] = [
    GenreShelf {
        title: "Bollywood Hits",
        query: "bollywood hits",
    },
    GenreShelf {
        title: "Pop Favorites",
        query: "pop hits",
    },
    GenreShelf {
        title: "Rock Classics",
        query: "rock classics",
    },
];

/// A source that failed while answering a query
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub source: SourceTag,
    pub error: SourceError,
}

/// One titled block of results
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSection<'a> {
    pub source: SourceTag,
    pub items: &'a [PlayableItem],
}

impl ResultSection<'_> {
    /// `"{label} - {count}"`
    pub fn header(&self) -> String {
        format!("{} - {}", self.source.section_label(), self.items.len())
    }
}

/// Settled results of both sources for one query
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedResults {
    pub query: String,
    pub generation: u64,
    pub catalog: Vec<PlayableItem>,
    pub independent: Vec<PlayableItem>,
    pub failures: Vec<SourceFailure>,
}

impl CombinedResults {
    /// Non-empty sections, independent artists first
    pub fn sections(&self) -> Vec<ResultSection<'_>> {
        [
            (SourceTag::Audius, self.independent.as_slice()),
            (SourceTag::Saavn, self.catalog.as_slice()),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(source, items)| ResultSection { source, items })
        .collect()
    }

    pub fn total(&self) -> usize {
        self.catalog.len() + self.independent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Items in display order, matching [`CombinedResults::sections`]
    pub fn iter(&self) -> impl Iterator<Item = &PlayableItem> {
        self.independent.iter().chain(self.catalog.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Latest query; safe to display
    Settled(CombinedResults),
    /// A newer query was issued while this one was in flight
    Stale { generation: u64, latest: u64 },
}

/// Runs both catalog searches and discards stale responses
#[derive(Debug)]
pub struct SearchCoordinator {
    catalog: Arc<dyn CatalogSource>,
    independent: Arc<dyn CatalogSource>,
    latest: AtomicU64,
    notifier: Notifier,
}

impl SearchCoordinator {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        independent: Arc<dyn CatalogSource>,
        notifier: Notifier,
    ) -> Self {
        Self {
            catalog,
            independent,
            latest: AtomicU64::new(0),
            notifier,
        }
    }

    /// Generation of the most recently issued query
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Searches both sources for `query`.
    ///
    /// A blank query is rejected with [`SourceError::EmptyQuery`] before any
    /// request is sent and does not consume a generation.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SourceError::EmptyQuery);
        }

        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, query, "Issuing catalog search");

        let (catalog, independent) =
            tokio::join!(self.catalog.search(query), self.independent.search(query));

        let mut failures = Vec::new();
        let catalog = self.collect(self.catalog.tag(), catalog, &mut failures);
        let independent = self.collect(self.independent.tag(), independent, &mut failures);

        let latest = self.latest_generation();
        if generation != latest {
            debug!(generation, latest, "Discarding stale search response");
            return Ok(SearchOutcome::Stale { generation, latest });
        }

        if !failures.is_empty() {
            self.notifier.error(SEARCH_ERROR_TITLE, SEARCH_ERROR_DESCRIPTION);
        }

        Ok(SearchOutcome::Settled(CombinedResults {
            query: query.to_string(),
            generation,
            catalog,
            independent,
            failures,
        }))
    }

    /// Fills every [`GENRE_SHELVES`] entry with at most [`SHELF_SIZE`] catalog songs.
    ///
    /// Shelves do not take a generation. A failed shelf is logged and left
    /// empty.
    pub async fn browse_genres(&self) -> Vec<(GenreShelf, Vec<PlayableItem>)> {
        let mut shelves = Vec::with_capacity(GENRE_SHELVES.len());
        for shelf in GENRE_SHELVES {
            let items = match self.catalog.search(shelf.query).await {
                Ok(mut items) => {
                    items.truncate(SHELF_SIZE);
                    items
                }
                Err(err) => {
                    warn!(shelf = shelf.title, "Genre shelf failed: {}", err);
                    Vec::new()
                }
            };
            shelves.push((shelf, items));
        }
        shelves
    }

    fn collect(
        &self,
        source: SourceTag,
        result: Result<Vec<PlayableItem>>,
        failures: &mut Vec<SourceFailure>,
    ) -> Vec<PlayableItem> {
        match result {
            Ok(items) => items,
            Err(error) => {
                warn!(%source, "Search failed: {}", error);
                failures.push(SourceFailure { source, error });
                Vec::new()
            }
        }
    }
}
