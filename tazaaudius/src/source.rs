//! `CatalogSource` implementation for the independent-artist catalog

use crate::client::AudiusClient;
use tazasource::{CatalogSource, PlayableItem, SourceError, SourceTag, StreamResolver};

/// Independent tracks, tagged [`SourceTag::Audius`] at ingestion
#[derive(Debug, Clone)]
pub struct AudiusSource {
    client: AudiusClient,
}

impl AudiusSource {
    pub fn new(client: AudiusClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &AudiusClient {
        &self.client
    }

    /// Resolver streaming independent tracks from this client's node
    pub fn stream_resolver(&self) -> StreamResolver {
        StreamResolver::new(self.client.base_url())
    }
}

#[async_trait::async_trait]
impl CatalogSource for AudiusSource {
    fn tag(&self) -> SourceTag {
        SourceTag::Audius
    }

    async fn search(&self, query: &str) -> tazasource::Result<Vec<PlayableItem>> {
        let tracks = self
            .client
            .search_tracks(query)
            .await
            .map_err(|e| SourceError::network(SourceTag::Audius, e))?;
        Ok(tracks.into_iter().map(PlayableItem::Independent).collect())
    }
}
