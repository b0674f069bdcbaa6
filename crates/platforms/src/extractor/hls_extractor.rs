use async_trait::async_trait;
use hls::{PlaybackTiming, PlaylistKind, TimingHeuristic};
use tracing::debug;

use super::error::ExtractorError;
use super::platform_extractor::PageFetcher;
use crate::media::QualityVariant;

const DEFAULT_VARIANT: &str = "default";

/// A fetched and classified playlist.
#[derive(Debug, Clone)]
pub struct LoadedPlaylist {
    pub url: String,
    pub kind: PlaylistKind,
    pub text: String,
    pub variants: Vec<QualityVariant>,
}

impl LoadedPlaylist {
    fn parse(url: &str, text: String) -> Result<Self, ExtractorError> {
        let parse_failure = |source| ExtractorError::ParseFailure {
            url: url.to_string(),
            source,
        };

        let kind = hls::classify(&text).map_err(parse_failure)?;
        let variants = match kind {
            PlaylistKind::Master => hls::parse_master(&text, url)
                .map_err(parse_failure)?
                .into_iter()
                .map(QualityVariant::from)
                .collect(),
            PlaylistKind::Media => vec![QualityVariant::new(DEFAULT_VARIANT, url)],
        };

        Ok(Self {
            url: url.to_string(),
            kind,
            text,
            variants,
        })
    }
}

/// Manifest helpers for extractors that serve HLS.
#[async_trait]
pub trait HlsExtractor {
    fn page_fetcher(&self) -> &dyn PageFetcher;

    /// Fetches `m3u8_url` and lists its variants.
    ///
    /// A media playlist is reported as a single `"default"` variant pointing
    /// at itself.
    async fn load_playlist(
        &self,
        m3u8_url: &str,
        headers: &[(&str, &str)],
    ) -> Result<LoadedPlaylist, ExtractorError> {
        let text = self
            .page_fetcher()
            .fetch_page_text(m3u8_url, headers)
            .await?;
        let playlist = LoadedPlaylist::parse(m3u8_url, text)?;
        debug!(
            url = m3u8_url,
            kind = ?playlist.kind,
            variants = playlist.variants.len(),
            "loaded playlist"
        );
        Ok(playlist)
    }

    /// Estimates intro/outro windows for `playlist`.
    ///
    /// Master playlists are followed to the media playlist of their first
    /// variant.
    async fn playlist_timing(
        &self,
        playlist: &LoadedPlaylist,
        headers: &[(&str, &str)],
        heuristic: &TimingHeuristic,
    ) -> Result<PlaybackTiming, ExtractorError> {
        let (url, text) = match playlist.kind {
            PlaylistKind::Media => (playlist.url.clone(), playlist.text.clone()),
            PlaylistKind::Master => {
                let Some(first) = playlist.variants.first() else {
                    return Ok(PlaybackTiming::default());
                };
                let text = self
                    .page_fetcher()
                    .fetch_page_text(&first.url, headers)
                    .await?;
                (first.url.clone(), text)
            }
        };

        hls::estimate_timing_with(&text, heuristic)
            .map_err(|source| ExtractorError::ParseFailure { url, source })
    }
}
