use async_trait::async_trait;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

use crate::{
    extractor::{
        error::ExtractorError,
        platform_configs::MyAnimeListConfig,
        platform_extractor::PageFetcher,
        utils::{capture_group_1, html_text},
    },
    mapping::{EpisodeTitleProvider, TitleOverrides},
};

static ROW_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<tr class="episode-list-data[^"]*"[^>]*>(.*?)</tr>"#).unwrap()
});
static NUMBER_CELL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<td class="episode-number[^"]*"[^>]*>(.*?)</td>"#).unwrap()
});
static TITLE_CELL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<td class="episode-title[^"]*"[^>]*>.*?<a[^>]*>(.*?)</a>"#).unwrap()
});
static DIGITS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

/// Scrapes per-episode titles from MyAnimeList's episode listing.
pub struct MyAnimeList {
    fetcher: Arc<dyn PageFetcher>,
    config: MyAnimeListConfig,
}

impl MyAnimeList {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: MyAnimeListConfig) -> Self {
        Self { fetcher, config }
    }

    /// MAL slugs are the lowercased title with underscores for spaces.
    fn slug(title: &str) -> String {
        title
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("_")
    }

    fn parse_titles(html: &str) -> TitleOverrides {
        let mut titles = TitleOverrides::default();
        for row in ROW_REGEX.captures_iter(html) {
            let row = &row[1];
            let number = capture_group_1(&NUMBER_CELL_REGEX, row)
                .and_then(|cell| DIGITS_REGEX.find(cell))
                .and_then(|digits| digits.as_str().parse::<i64>().ok());
            let Some(number) = number else {
                warn!("skipping episode row without a number");
                continue;
            };

            let title = capture_group_1(&TITLE_CELL_REGEX, row)
                .map(html_text)
                .unwrap_or_default();
            if !title.is_empty() {
                titles.insert(number, title);
            }
        }
        titles
    }
}

#[async_trait]
impl EpisodeTitleProvider for MyAnimeList {
    async fn fetch_episode_titles(
        &self,
        id_mal: u64,
        title: &str,
    ) -> Result<TitleOverrides, ExtractorError> {
        let url = format!(
            "{}/anime/{id_mal}/{}/episode",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&Self::slug(title))
        );
        debug!(url = %url, "fetching episode titles");

        let html = self.fetcher.fetch_page_text(&url, &[]).await?;
        let titles = Self::parse_titles(&html);
        if titles.is_empty() {
            return Err(ExtractorError::NoContent(format!(
                "episode titles for mal id {id_mal}"
            )));
        }
        Ok(titles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixtureFetcher;

    const EPISODES_HTML: &str = r##"
<table class="mt8 episode_list js-watch-episode-list ascend">
  <tr class="episode-list-data">
    <td class="episode-number nowrap" data-raw="1">1</td>
    <td class="episode-title fs12">
      <a href="https://myanimelist.net/anime/20/Naruto/episode/1" class="fl-l fw-b ">Enter: Naruto Uzumaki!</a>
    </td>
  </tr>
  <tr class="episode-list-data">
    <td class="episode-number nowrap" data-raw="2">2</td>
    <td class="episode-title fs12">
      <a href="https://myanimelist.net/anime/20/Naruto/episode/2" class="fl-l fw-b ">My Name is Konohamaru!</a>
    </td>
  </tr>
  <tr class="episode-list-data">
    <td class="episode-number nowrap">Recap</td>
    <td class="episode-title fs12"><a href="#">Recap &amp; More</a></td>
  </tr>
</table>"##;

    #[test]
    fn test_slug() {
        assert_eq!(MyAnimeList::slug("Naruto  Shippuden"), "naruto_shippuden");
    }

    #[test]
    fn test_parse_titles() {
        let titles = MyAnimeList::parse_titles(EPISODES_HTML);
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[&1], "Enter: Naruto Uzumaki!");
        assert_eq!(titles[&2], "My Name is Konohamaru!");
    }

    #[tokio::test]
    async fn test_fetch_episode_titles() {
        let fetcher = FixtureFetcher::default().with_page(
            "https://myanimelist.net/anime/20/naruto/episode",
            EPISODES_HTML,
        );
        let mal = MyAnimeList::new(Arc::new(fetcher), MyAnimeListConfig::default());
        let titles = mal.fetch_episode_titles(20, "Naruto").await.unwrap();
        assert_eq!(titles.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_episode_titles_empty_page() {
        let fetcher = FixtureFetcher::default()
            .with_page("https://myanimelist.net/anime/20/naruto/episode", "<table></table>");
        let mal = MyAnimeList::new(Arc::new(fetcher), MyAnimeListConfig::default());
        let err = mal.fetch_episode_titles(20, "Naruto").await.unwrap_err();
        assert!(matches!(err, ExtractorError::NoContent(_)));
    }
}
