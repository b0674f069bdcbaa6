use std::sync::Arc;

use futures::future::try_join;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::episode::{TitleOverrides, merge_episode_lists, sort_by_number};
use super::provider::{CatalogProvider, EpisodeTitleProvider, MetadataProvider};
use super::title::{resolve, resolve_dub, sanitize};
use crate::extractor::{error::ExtractorError, factory::ExtractorFactory};
use crate::media::{CatalogEntry, EpisodeRecord, Title};

/// Header stamped on every descriptor handed out by [`MappingService::watch`],
/// naming the release the stream came from.
pub const VERSION_HEADER: &str = "Version";
pub const SUB_VERSION: &str = "sub";
pub const DUB_VERSION: &str = "dub";

/// Catalog search text: the sanitized English title, else the sanitized romaji.
pub fn search_query(title: &Title) -> String {
    [&title.english, &title.romaji, &title.native]
        .into_iter()
        .map(|t| sanitize(t))
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

/// A metadata entry together with its sub and dub counterparts on the catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProviderMapping {
    pub media: CatalogEntry,
    pub sub: Option<CatalogEntry>,
    pub dub: Option<CatalogEntry>,
}

/// Ties a metadata provider, a streaming catalog and the player extractors
/// together.
pub struct MappingService {
    metadata: Arc<dyn MetadataProvider>,
    catalog: Arc<dyn CatalogProvider>,
    titles: Option<Arc<dyn EpisodeTitleProvider>>,
    extractors: Arc<ExtractorFactory>,
}

impl MappingService {
    pub fn new(
        metadata: Arc<dyn MetadataProvider>,
        catalog: Arc<dyn CatalogProvider>,
        extractors: Arc<ExtractorFactory>,
    ) -> Self {
        Self {
            metadata,
            catalog,
            titles: None,
            extractors,
        }
    }

    pub fn with_title_provider(mut self, titles: Arc<dyn EpisodeTitleProvider>) -> Self {
        self.titles = Some(titles);
        self
    }

    /// Resolves `media_id` onto the catalog's subbed and dubbed entries.
    ///
    /// Fails with [`ExtractorError::NoMatchFound`] only when neither side
    /// matches.
    pub async fn map_providers(&self, media_id: &str) -> Result<ProviderMapping, ExtractorError> {
        let media = self.metadata.fetch_media(media_id).await?;
        let query = search_query(&media.title);
        if query.is_empty() {
            return Err(ExtractorError::NoMatchFound(format!("media {media_id} has no title")));
        }

        let candidates = self.catalog.fetch_catalog(&query).await?;
        let names: Vec<&str> = candidates.iter().map(|c| c.title.display()).collect();

        let sub = match resolve(&media.title, &names) {
            Ok(found) => Some(candidates[found.index].clone()),
            Err(ExtractorError::NoMatchFound(_)) => None,
            Err(e) => return Err(e),
        };
        let dub = match resolve_dub(&media.title, &names) {
            Ok(found) => Some(candidates[found.index].clone()),
            Err(ExtractorError::NoMatchFound(_)) => None,
            Err(e) => return Err(e),
        };

        if sub.is_none() && dub.is_none() {
            return Err(ExtractorError::NoMatchFound(format!(
                "{query} on {}",
                self.catalog.name()
            )));
        }

        debug!(
            media_id,
            sub = sub.as_ref().map(|e| e.id.as_str()),
            dub = dub.as_ref().map(|e| e.id.as_str()),
            "mapped providers"
        );
        Ok(ProviderMapping { media, sub, dub })
    }

    async fn episode_list(&self, entry: Option<&CatalogEntry>) -> Result<Vec<EpisodeRecord>, ExtractorError> {
        match entry {
            Some(entry) => self.catalog.fetch_episode_list(&entry.id).await,
            None => Ok(Vec::new()),
        }
    }

    async fn title_overrides(&self, media: &CatalogEntry) -> TitleOverrides {
        let (Some(titles), Some(id_mal)) = (&self.titles, media.id_mal) else {
            return TitleOverrides::default();
        };
        let title = if media.title.romaji.is_empty() {
            media.title.display()
        } else {
            &media.title.romaji
        };

        match titles.fetch_episode_titles(id_mal, title).await {
            Ok(overrides) => overrides,
            Err(e) => {
                warn!(id_mal, error = %e, "episode titles unavailable");
                TitleOverrides::default()
            }
        }
    }

    /// Merged episode list of `media_id`, sorted by number.
    pub async fn episodes(&self, media_id: &str) -> Result<Vec<EpisodeRecord>, ExtractorError> {
        let mapping = self.map_providers(media_id).await?;

        let (sub, dub) = try_join(
            self.episode_list(mapping.sub.as_ref()),
            self.episode_list(mapping.dub.as_ref()),
        )
        .await?;
        let overrides = self.title_overrides(&mapping.media).await;

        let mut episodes = merge_episode_lists(sub, dub, &overrides);
        sort_by_number(&mut episodes);
        info!(media_id, count = episodes.len(), "episodes merged");
        Ok(episodes)
    }

    /// Episode `number` of `media_id` with its extracted stream attached,
    /// taken from the subbed release when there is one.
    pub async fn watch(&self, media_id: &str, number: i64) -> Result<EpisodeRecord, ExtractorError> {
        let mapping = self.map_providers(media_id).await?;
        // The sub resolver also scores dubbed entries, so it can land on the dub match.
        let (entry, version) = match (&mapping.sub, &mapping.dub) {
            (Some(sub), Some(dub)) if sub.id == dub.id => (dub, DUB_VERSION),
            (Some(sub), _) => (sub, SUB_VERSION),
            (None, Some(dub)) => (dub, DUB_VERSION),
            (None, None) => return Err(ExtractorError::NoMatchFound(media_id.to_string())),
        };
        debug!(entry = %entry.id, version, "selected release");

        let episodes = self.catalog.fetch_episode_list(&entry.id).await?;
        let mut episode = episodes
            .into_iter()
            .find(|e| e.number == Some(number))
            .ok_or_else(|| ExtractorError::NoMatchFound(format!("{} episode {number}", entry.id)))?;

        let player_url = self.catalog.resolve_player_url(&episode.id).await?;
        debug!(episode = %episode.id, player = %player_url, "extracting episode");

        let extractor = self.extractors.create_extractor(&player_url)?;
        let descriptor = extractor.extract(&player_url).await?;
        episode.source = Some(descriptor.with_header(VERSION_HEADER, version));

        if let Some(title) = self.title_overrides(&mapping.media).await.remove(&number) {
            episode.title = Some(title);
        }
        Ok(episode)
    }
}
