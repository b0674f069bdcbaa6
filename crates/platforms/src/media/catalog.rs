use serde::{Deserialize, Serialize};

/// Titles of a series in its three common scripts. Any of them may be empty.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Title {
    #[serde(default)]
    pub romaji: String,
    #[serde(default)]
    pub english: String,
    #[serde(default)]
    pub native: String,
}

impl Title {
    pub fn new(
        romaji: impl Into<String>,
        english: impl Into<String>,
        native: impl Into<String>,
    ) -> Self {
        Self {
            romaji: romaji.into(),
            english: english.into(),
            native: native.into(),
        }
    }

    /// A title known under a single name, as scraped catalogs report it.
    pub fn single(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            romaji: name.clone(),
            english: name.clone(),
            native: name,
        }
    }

    /// First non-empty of english, romaji and native.
    pub fn display(&self) -> &str {
        [&self.english, &self.romaji, &self.native]
            .into_iter()
            .find(|t| !t.is_empty())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.romaji.is_empty() && self.english.is_empty() && self.native.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    Tv,
    TvShort,
    Movie,
    Special,
    Ova,
    Ona,
    Music,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatus {
    Finished,
    Releasing,
    NotYetReleased,
    Cancelled,
    Hiatus,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A series as listed by a metadata source or a streaming catalog.
///
/// `id` is only meaningful to the provider that produced the entry.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub title: Title,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_mal: Option<u64>,
    #[serde(default)]
    pub format: MediaFormat,
    #[serde(default)]
    pub status: ReleaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, title: Title) -> Self {
        Self {
            id: id.into(),
            title,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefers_english() {
        let title = Title::new("Shingeki no Kyojin", "Attack on Titan", "進撃の巨人");
        assert_eq!(title.display(), "Attack on Titan");

        let title = Title::new("Shingeki no Kyojin", "", "進撃の巨人");
        assert_eq!(title.display(), "Shingeki no Kyojin");

        assert_eq!(Title::default().display(), "");
        assert!(Title::default().is_empty());
    }

    #[test]
    fn test_unknown_format_and_status() {
        let format: MediaFormat = serde_json::from_str("\"TV_SHORT\"").unwrap();
        assert_eq!(format, MediaFormat::TvShort);

        let format: MediaFormat = serde_json::from_str("\"SOMETHING_NEW\"").unwrap();
        assert_eq!(format, MediaFormat::Unknown);

        let status: ReleaseStatus = serde_json::from_str("\"NOT_YET_RELEASED\"").unwrap();
        assert_eq!(status, ReleaseStatus::NotYetReleased);
    }
}
