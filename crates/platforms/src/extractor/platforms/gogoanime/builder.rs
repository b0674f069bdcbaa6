use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::{
    extractor::{
        error::ExtractorError,
        platform_configs::GogoAnimeConfig,
        platform_extractor::PageFetcher,
        utils::{capture_group_1, capture_group_1_or_no_content, html_text},
    },
    mapping::CatalogProvider,
    media::{CatalogEntry, EpisodeRecord, MediaFormat, Title},
};

static ITEMS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<ul class="items">(.*?)</ul>"#).unwrap());
static CATEGORY_HREF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="/category/([^"]+)""#).unwrap());
static IMG_SRC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img[^>]+src="([^"]*)""#).unwrap());
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<p class="name">\s*<a[^>]*>(.*?)</a>"#).unwrap());
static RELEASED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<p class="released">(.*?)</p>"#).unwrap());

static EP_START_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ep_start\s*=\s*['"]([^'"]*)['"]"#).unwrap());
static EP_END_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ep_end\s*=\s*['"]([^'"]*)['"]"#).unwrap());
static INPUT_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"<input[^>]*>"#).unwrap());
static VALUE_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bvalue="([^"]*)""#).unwrap());

static EPISODE_ITEM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<li>\s*<a href="\s*([^"]+?)\s*"[^>]*>.*?<div class="name">(.*?)</div>"#)
        .unwrap()
});
static IFRAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<iframe[^>]+src="([^"]+)""#).unwrap());

const DUB_SUFFIX: &str = "-dub";

/// GogoAnime catalog: search page, episode list endpoint and episode pages.
pub struct GogoAnime {
    fetcher: Arc<dyn PageFetcher>,
    config: GogoAnimeConfig,
}

impl GogoAnime {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: GogoAnimeConfig) -> Self {
        Self { fetcher, config }
    }

    fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    fn parse_search_results(html: &str) -> Vec<CatalogEntry> {
        let Some(items) = capture_group_1(&ITEMS_REGEX, html) else {
            return Vec::new();
        };

        items
            .split("<li")
            .skip(1)
            .filter_map(|item| {
                let id = capture_group_1(&CATEGORY_HREF_REGEX, item)?;
                let name = capture_group_1(&NAME_REGEX, item)
                    .map(html_text)
                    .unwrap_or_default();

                let mut entry = CatalogEntry::new(id, Title::single(name));
                entry.format = MediaFormat::Tv;
                entry.cover_image = capture_group_1(&IMG_SRC_REGEX, item)
                    .filter(|src| !src.is_empty())
                    .map(ToOwned::to_owned);
                entry.year = capture_group_1(&RELEASED_REGEX, item)
                    .map(html_text)
                    .and_then(|released| Self::parse_year(&released));
                Some(entry)
            })
            .collect()
    }

    /// `"Released: 2002"` -> `2002`.
    fn parse_year(released: &str) -> Option<i32> {
        released
            .split_whitespace()
            .nth(1)
            .and_then(|year| year.parse().ok())
            .filter(|year| *year > 0)
    }

    /// `value` of the `<input>` whose id is `id`, in any attribute order.
    fn input_value<'a>(html: &'a str, id: &str) -> Option<&'a str> {
        let id_attr = format!(r#"id="{id}""#);
        INPUT_TAG_REGEX
            .find_iter(html)
            .map(|tag| tag.as_str())
            .find(|tag| tag.contains(&id_attr))
            .and_then(|tag| capture_group_1(&VALUE_ATTR_REGEX, tag))
    }

    fn episode_list_url(&self, html: &str) -> Result<String, ExtractorError> {
        let ep_start = capture_group_1(&EP_START_REGEX, html).unwrap_or("0");
        let ep_end = EP_END_REGEX
            .captures_iter(html)
            .last()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or("0");
        let movie_id = Self::input_value(html, "movie_id")
            .ok_or_else(|| ExtractorError::NoContent("movie_id".to_string()))?;
        let alias = Self::input_value(html, "alias_anime").unwrap_or_default();

        Ok(format!(
            "{}/ajax/load-list-episode?ep_start={ep_start}&ep_end={ep_end}&id={movie_id}&default_ep=0&alias={}",
            self.config.ajax_url.trim_end_matches('/'),
            urlencoding::encode(alias),
        ))
    }

    /// The endpoint lists newest first; the result is oldest first.
    fn parse_episode_list(html: &str, has_dub: bool) -> Vec<EpisodeRecord> {
        let mut episodes: Vec<EpisodeRecord> = EPISODE_ITEM_REGEX
            .captures_iter(html)
            .map(|caps| {
                let id = caps[1].trim().to_string();
                let label = html_text(&caps[2]);
                let number = label
                    .trim_start_matches("EP")
                    .trim()
                    .parse::<i64>()
                    .ok();
                if number.is_none() {
                    debug!(id = %id, label = %label, "episode label has no usable number");
                }

                let mut episode = EpisodeRecord::new(id, number);
                episode.has_dub = has_dub;
                episode
            })
            .collect();
        episodes.reverse();
        episodes
    }
}

#[async_trait]
impl CatalogProvider for GogoAnime {
    fn name(&self) -> &str {
        "gogoanime"
    }

    async fn fetch_catalog(&self, query: &str) -> Result<Vec<CatalogEntry>, ExtractorError> {
        let url = format!(
            "{}/search.html?keyword={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(query)
        );
        debug!(url = %url, "searching catalog");

        let html = self.fetch_page_text(&url).await?;
        let results = Self::parse_search_results(&html);
        if results.is_empty() {
            warn!(query, "catalog search returned no results");
        }
        Ok(results)
    }

    async fn fetch_episode_list(&self, id: &str) -> Result<Vec<EpisodeRecord>, ExtractorError> {
        let path = if id.starts_with('/') {
            id.to_string()
        } else {
            format!("/category/{id}")
        };

        let html = self.fetch_page_text(&self.absolute(&path)).await?;
        let list_url = self.episode_list_url(&html)?;
        debug!(url = %list_url, "fetching episode list");

        let list = self.fetch_page_text(&list_url).await?;
        Ok(Self::parse_episode_list(&list, id.contains(DUB_SUFFIX)))
    }

    async fn fetch_page_text(&self, url: &str) -> Result<String, ExtractorError> {
        self.fetcher.fetch_page_text(url, &[]).await
    }

    async fn resolve_player_url(&self, episode_url: &str) -> Result<String, ExtractorError> {
        let html = self.fetch_page_text(&self.absolute(episode_url)).await?;
        let src = capture_group_1_or_no_content(&IFRAME_REGEX, &html, "player iframe")?;
        Ok(match src.strip_prefix("//") {
            Some(rest) => format!("https://{rest}"),
            None => src.to_string(),
        })
    }
}
