use async_trait::async_trait;

use super::episode::TitleOverrides;
use crate::extractor::error::ExtractorError;
use crate::media::{CatalogEntry, EpisodeRecord};

/// A streaming site: searchable catalog, per-series episode lists and the
/// embed players behind each episode.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_catalog(&self, query: &str) -> Result<Vec<CatalogEntry>, ExtractorError>;

    async fn fetch_episode_list(&self, id: &str) -> Result<Vec<EpisodeRecord>, ExtractorError>;

    async fn fetch_page_text(&self, url: &str) -> Result<String, ExtractorError>;

    /// Embed-player URL of the episode page at `episode_url`.
    async fn resolve_player_url(&self, episode_url: &str) -> Result<String, ExtractorError>;
}

/// Authoritative series metadata, keyed by the provider's own id.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_media(&self, id: &str) -> Result<CatalogEntry, ExtractorError>;

    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CatalogEntry>, ExtractorError>;
}

#[async_trait]
pub trait EpisodeTitleProvider: Send + Sync {
    async fn fetch_episode_titles(
        &self,
        id_mal: u64,
        title: &str,
    ) -> Result<TitleOverrides, ExtractorError>;
}
