use serde::Deserialize;

use crate::extractor::utils::html_text;
use crate::media::{CatalogEntry, MediaFormat, ReleaseStatus, Title};

#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub struct MediaData {
    #[serde(rename = "Media")]
    pub media: Option<AniListMedia>,
}

#[derive(Debug, Deserialize)]
pub struct PageData {
    #[serde(rename = "Page")]
    pub page: MediaPage,
}

#[derive(Debug, Deserialize)]
pub struct MediaPage {
    #[serde(default)]
    pub media: Vec<AniListMedia>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AniListTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AniListMedia {
    pub id: u64,
    pub id_mal: Option<u64>,
    #[serde(default)]
    pub title: AniListTitle,
    pub cover_image: Option<CoverImage>,
    pub banner_image: Option<String>,
    pub description: Option<String>,
    pub season_year: Option<i32>,
    pub format: Option<MediaFormat>,
    pub status: Option<ReleaseStatus>,
    pub episodes: Option<u32>,
    pub duration: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    pub mean_score: Option<u32>,
    pub popularity: Option<u32>,
}

impl From<AniListMedia> for CatalogEntry {
    fn from(media: AniListMedia) -> Self {
        let title = Title::new(
            media.title.romaji.unwrap_or_default(),
            media.title.english.unwrap_or_default(),
            media.title.native.unwrap_or_default(),
        );

        CatalogEntry {
            id: media.id.to_string(),
            title,
            id_mal: media.id_mal,
            format: media.format.unwrap_or_default(),
            status: media.status.unwrap_or_default(),
            year: media.season_year,
            total_episodes: media.episodes,
            duration: media.duration,
            cover_image: media
                .cover_image
                .and_then(|cover| cover.extra_large.or(cover.large)),
            banner_image: media.banner_image,
            description: media
                .description
                .map(|d| html_text(&d.replace("<br>", " ")))
                .filter(|d| !d.is_empty()),
            genres: media.genres,
            synonyms: media.synonyms,
            mean_score: media.mean_score,
            popularity: media.popularity,
        }
    }
}
