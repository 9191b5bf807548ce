//! `CatalogSource` implementation for the song-search proxy

use crate::client::SaavnClient;
use tazasource::{CatalogSource, PlayableItem, SourceError, SourceTag};

/// Catalog songs, tagged [`SourceTag::Saavn`] at ingestion
#[derive(Debug, Clone)]
pub struct SaavnSource {
    client: SaavnClient,
}

impl SaavnSource {
    pub fn new(client: SaavnClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SaavnClient {
        &self.client
    }
}

#[async_trait::async_trait]
impl CatalogSource for SaavnSource {
    fn tag(&self) -> SourceTag {
        SourceTag::Saavn
    }

    async fn search(&self, query: &str) -> tazasource::Result<Vec<PlayableItem>> {
        let songs = self
            .client
            .search_songs(query)
            .await
            .map_err(|e| SourceError::network(SourceTag::Saavn, e))?;
        Ok(songs.into_iter().map(PlayableItem::Catalog).collect())
    }
}
