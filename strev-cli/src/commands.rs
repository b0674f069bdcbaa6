use crate::{
    cli::OutputFormat,
    config::AppConfig,
    error::Result,
    output::{OutputManager, write_output},
};
use hls::{PlaylistKind, classify, estimate_timing_with, parse_master};
use platforms_parser::{
    extractor::{
        client_with_timeout,
        factory::ExtractorFactory,
        platform_extractor::{Extractor, PageFetcher},
        platforms::{anilist::AniList, gogoanime::GogoAnime, myanimelist::MyAnimeList},
    },
    mapping::{MappingService, MetadataProvider},
    media::QualityVariant,
};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

pub struct CommandExecutor {
    config: AppConfig,
    output_manager: OutputManager,
}

impl CommandExecutor {
    pub fn new(config: AppConfig) -> Self {
        #[cfg(feature = "colored-output")]
        let colored = true;
        #[cfg(not(feature = "colored-output"))]
        let colored = false;

        Self {
            config,
            output_manager: OutputManager::new(colored),
        }
    }

    fn fetcher(&self, client: &Client) -> Arc<dyn PageFetcher> {
        let mut extractor = Extractor::new("anistrev", client.clone());
        if let Some(user_agent) = &self.config.user_agent {
            extractor.set_user_agent(user_agent);
        }
        Arc::new(extractor)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout)
    }

    fn metadata(&self) -> Result<AniList> {
        let client = client_with_timeout(self.timeout())?;
        Ok(AniList::new(client, self.config.platforms.anilist.clone()))
    }

    fn mapping_service(&self) -> Result<MappingService> {
        let platforms = &self.config.platforms;
        let client = client_with_timeout(self.timeout())?;
        let fetcher = self.fetcher(&client);

        let metadata = Arc::new(AniList::new(client, platforms.anilist.clone()));
        let catalog = Arc::new(GogoAnime::new(fetcher.clone(), platforms.gogoanime.clone()));
        let titles = Arc::new(MyAnimeList::new(fetcher.clone(), platforms.myanimelist.clone()));
        let factory = Arc::new(ExtractorFactory::new(fetcher, platforms.clone()));

        Ok(MappingService::new(metadata, catalog, factory).with_title_provider(titles))
    }

    pub async fn search(&self, query: &str, page: u32, per_page: u32, format: OutputFormat) -> Result<()> {
        let results = self.metadata()?.search(query, page, per_page).await?;
        info!(query, count = results.len(), "search finished");
        write_output(&self.output_manager.format_catalog(&results, format)?)
    }

    pub async fn info(&self, id: &str, format: OutputFormat) -> Result<()> {
        let mapping = self.mapping_service()?.map_providers(id).await?;
        write_output(&self.output_manager.format_mapping(&mapping, format)?)
    }

    pub async fn episodes(&self, id: &str, format: OutputFormat) -> Result<()> {
        let episodes = self.mapping_service()?.episodes(id).await?;
        write_output(&self.output_manager.format_episodes(&episodes, format)?)
    }

    pub async fn watch(&self, id: &str, episode: i64, format: OutputFormat) -> Result<()> {
        let record = self.mapping_service()?.watch(id, episode).await?;
        let qualities = record.source.as_ref().map_or(0, |s| s.qualities().len());
        info!(id, episode, qualities, "stream extracted");
        write_output(&self.output_manager.format_watch(&record, format)?)
    }

    pub fn encrypt(&self, plaintext: &str, key: &str, iv: &str) -> Result<()> {
        let ciphertext = cbc_codec::encrypt(plaintext.as_bytes(), key.as_bytes(), iv.as_bytes())?;
        write_output(&format!("{ciphertext}\n"))
    }

    pub fn decrypt(&self, ciphertext: &str, key: &str, iv: &str) -> Result<()> {
        let plaintext = cbc_codec::decrypt(ciphertext.trim(), key.as_bytes(), iv.as_bytes())?;
        write_output(&format!("{}\n", String::from_utf8_lossy(&plaintext)))
    }

    pub async fn manifest(&self, source: &str, base: Option<&str>, format: OutputFormat) -> Result<()> {
        let (text, base_url) = if source.starts_with("http://") || source.starts_with("https://") {
            let client = client_with_timeout(self.timeout())?;
            let text = self.fetcher(&client).fetch_page_text(source, &[]).await?;
            (text, base.unwrap_or(source).to_string())
        } else {
            (std::fs::read_to_string(source)?, base.unwrap_or_default().to_string())
        };
        debug!(source, bytes = text.len(), "manifest loaded");

        let content = match classify(&text)? {
            PlaylistKind::Master => {
                let variants: Vec<QualityVariant> = parse_master(&text, &base_url)?
                    .into_iter()
                    .map(QualityVariant::from)
                    .collect();
                self.output_manager.format_variants(&variants, format)?
            }
            PlaylistKind::Media => {
                let timing = estimate_timing_with(&text, &self.config.platforms.gogocdn.timing)?;
                self.output_manager.format_timing(&timing, format)?
            }
        };
        write_output(&content)
    }
}
