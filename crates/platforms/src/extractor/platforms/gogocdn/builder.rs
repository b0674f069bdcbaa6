use async_trait::async_trait;
use cbc_codec::Cipher;
use hls::{PlaybackTiming, TimingHeuristic};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::debug;
use url::Url;

use crate::{
    extractor::{
        error::ExtractorError,
        hls_extractor::HlsExtractor,
        platform_configs::GogoCdnConfig,
        platform_extractor::{PageFetcher, StreamExtractor},
        platforms::gogocdn::models::{CallbackEnvelope, SourcePayload},
        utils::{capture_group_1_or_no_content, parse_page_url, query_param},
    },
    media::{QualityVariant, StreamDescriptor},
};

pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?:)?//[^/]+/(?:streaming|embedplus|load)\.php\?").unwrap()
});
static ENCRYPTED_DATA_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-value="(.+?)""#).unwrap());

const CALLBACK_PATH: &str = "encrypt-ajax.php";
const AJAX_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// Extractor for the GogoCDN embed player.
///
/// The player page carries an encrypted blob of query parameters. Together
/// with the encrypted content id it unlocks a callback endpoint whose
/// response, once decrypted, lists the HLS sources of the episode.
pub struct GogoCdn {
    fetcher: Arc<dyn PageFetcher>,
    page_cipher: Cipher,
    response_cipher: Cipher,
    timing: TimingHeuristic,
}

impl GogoCdn {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &GogoCdnConfig) -> Result<Self, ExtractorError> {
        let page_cipher = Cipher::new(&config.page_key, &config.iv)
            .map_err(|e| ExtractorError::crypto("loading page secret", e))?;
        let response_cipher = Cipher::new(&config.response_key, &config.iv)
            .map_err(|e| ExtractorError::crypto("loading response secret", e))?;

        Ok(Self {
            fetcher,
            page_cipher,
            response_cipher,
            timing: config.timing,
        })
    }

    /// Splits `page_url` into the parsed URL and its `id` query parameter.
    fn content_id(page_url: &str) -> Result<(Url, String), ExtractorError> {
        let url = parse_page_url(page_url)?;
        let id = query_param(&url, "id")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ExtractorError::InvalidArgument(format!("{page_url}: missing 'id' query parameter"))
            })?;
        Ok((url, id))
    }

    /// Builds the callback query: `id=<enc(id)>&alias=<id>&<decrypted page blob>`.
    async fn callback_query(&self, page: &Url, content_id: &str) -> Result<String, ExtractorError> {
        let html = self.fetcher.fetch_page_text(page.as_str(), &[]).await?;
        let blob = capture_group_1_or_no_content(
            &ENCRYPTED_DATA_REGEX,
            &html,
            "encrypted data-value attribute",
        )?;

        let params = self
            .page_cipher
            .decrypt(blob)
            .map_err(|e| ExtractorError::crypto("decrypting page parameters", e))?;
        let params = String::from_utf8(params)
            .map_err(|e| ExtractorError::decode("page parameters", e))?;

        let encrypted_id = self
            .page_cipher
            .encrypt(content_id.as_bytes())
            .map_err(|e| ExtractorError::crypto("encrypting content id", e))?;

        Ok(format!(
            "id={}&alias={content_id}&{params}",
            urlencoding::encode(&encrypted_id)
        ))
    }

    async fn fetch_payload(&self, page: &Url, query: &str) -> Result<SourcePayload, ExtractorError> {
        let host = page.host_str().ok_or_else(|| {
            ExtractorError::InvalidArgument(format!("{page}: page url has no host"))
        })?;
        let authority = match page.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let callback_url = format!("{}://{authority}/{CALLBACK_PATH}?{query}", page.scheme());
        debug!(url = %callback_url, "requesting source callback");

        let body = self
            .fetcher
            .fetch_page_text(&callback_url, &[AJAX_HEADER])
            .await?;
        let envelope: CallbackEnvelope =
            serde_json::from_str(&body).map_err(|e| ExtractorError::decode("callback envelope", e))?;

        let decrypted = self
            .response_cipher
            .decrypt(&envelope.data)
            .map_err(|e| ExtractorError::crypto("decrypting callback payload", e))?;
        serde_json::from_slice(&decrypted).map_err(|e| ExtractorError::decode("callback payload", e))
    }

    /// Turns a decoded payload into the final descriptor.
    async fn assemble(&self, payload: SourcePayload) -> Result<StreamDescriptor, ExtractorError> {
        let mut qualities: Vec<QualityVariant> = Vec::new();
        let mut timing: Option<PlaybackTiming> = None;

        for file in payload.source.iter().filter_map(|s| s.file()) {
            let playlist = self.load_playlist(file, &[]).await?;
            if timing.is_none() {
                timing = Some(self.playlist_timing(&playlist, &[], &self.timing).await?);
            }
            qualities.extend(playlist.variants);
        }

        let mut builder = StreamDescriptor::builder()
            .is_m3u8(!qualities.is_empty())
            .qualities(qualities)
            .thumbnail(payload.track.thumbnail());

        if let Some(timing) = timing {
            builder = builder.intro(timing.intro).outro(timing.outro);
        }

        for backup in &payload.source_bk {
            let Some(file) = backup.file() else {
                continue;
            };
            if backup.kind_contains("subtitle") {
                builder = builder.subtitle(file);
            } else if backup.kind_contains("audio") {
                builder = builder.audio(file);
            }
        }

        Ok(builder.build())
    }
}

impl HlsExtractor for GogoCdn {
    fn page_fetcher(&self) -> &dyn PageFetcher {
        self.fetcher.as_ref()
    }
}

#[async_trait]
impl StreamExtractor for GogoCdn {
    fn name(&self) -> &str {
        "gogocdn"
    }

    async fn extract(&self, page_url: &str) -> Result<StreamDescriptor, ExtractorError> {
        let (page, content_id) = Self::content_id(page_url)?;
        debug!(content_id = %content_id, "extracting gogocdn sources");

        let query = self.callback_query(&page, &content_id).await?;
        let payload = self.fetch_payload(&page, &query).await?;
        debug!(
            sources = payload.source.len(),
            backups = payload.source_bk.len(),
            "decoded source payload"
        );

        self.assemble(payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FixtureFetcher, PAGE_URL, fixture_site};
    use hls::TimingWindow;

    fn extractor(fetcher: FixtureFetcher) -> GogoCdn {
        GogoCdn::new(Arc::new(fetcher), &GogoCdnConfig::default()).unwrap()
    }

    #[test]
    fn test_url_regex() {
        assert!(URL_REGEX.is_match("//embtaku.pro/streaming.php?id=MTgxNDkx&title=x"));
        assert!(URL_REGEX.is_match("https://embtaku.pro/embedplus.php?id=MTgxNDkx"));
        assert!(!URL_REGEX.is_match("https://gogoanime3.co/naruto-episode-1"));
    }

    #[test]
    fn test_content_id() {
        let (url, id) = GogoCdn::content_id("//embtaku.pro/streaming.php?id=MTgxNDkx").unwrap();
        assert_eq!(id, "MTgxNDkx");
        assert_eq!(url.host_str(), Some("embtaku.pro"));

        assert!(matches!(
            GogoCdn::content_id("https://embtaku.pro/streaming.php?title=x"),
            Err(ExtractorError::InvalidArgument(_))
        ));
        assert!(matches!(
            GogoCdn::content_id("https://embtaku.pro/streaming.php?id="),
            Err(ExtractorError::InvalidArgument(_))
        ));
        assert!(matches!(
            GogoCdn::content_id("::not a url::"),
            Err(ExtractorError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_new_rejects_bad_secret() {
        let config = GogoCdnConfig {
            page_key: "short".to_string(),
            ..GogoCdnConfig::default()
        };
        let result = GogoCdn::new(Arc::new(FixtureFetcher::default()), &config);
        assert!(matches!(result, Err(ExtractorError::CryptoFailure { .. })));
    }

    #[tokio::test]
    async fn test_extract_end_to_end() {
        let site = fixture_site();
        let descriptor = extractor(site.clone()).extract(PAGE_URL).await.unwrap();

        assert!(descriptor.is_m3u8());
        let names: Vec<_> = descriptor.qualities().iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, ["360p", "720p", "default"]);
        assert_eq!(
            descriptor.qualities()[1].url,
            "https://cdn.example/ep1/720/index.m3u8"
        );
        assert_eq!(descriptor.subtitles(), ["https://cdn.example/ep1/en.vtt"]);
        assert_eq!(descriptor.audio(), ["https://cdn.example/ep1/jp.m3u8"]);

        // 100 segments of 10 s from the first variant of the first source
        assert_eq!(descriptor.intro(), TimingWindow::new(0.0, 90.0));
        assert_eq!(descriptor.outro(), TimingWindow::new(850.0, 910.0));

        let thumbnail = descriptor.thumbnail().unwrap();
        assert_eq!(thumbnail.url, "https://cdn.example/ep1/sprite.vtt");
        assert_eq!(thumbnail.kind, "Sprite");

        let requests = site.requests();
        let callback = requests
            .iter()
            .find(|(url, _)| url.contains("encrypt-ajax.php"))
            .unwrap();
        assert!(callback.0.starts_with("https://embtaku.pro/encrypt-ajax.php?id="));
        assert!(callback.0.contains("&alias=MTgxNDkx&token=abc&expires=1700000000"));
        assert_eq!(
            callback.1,
            vec![("X-Requested-With".to_string(), "XMLHttpRequest".to_string())]
        );
    }

    #[tokio::test]
    async fn test_extract_missing_blob_is_no_content() {
        let site = fixture_site().with_page(PAGE_URL, "<html><body>removed</body></html>");
        let err = extractor(site).extract(PAGE_URL).await.unwrap_err();
        assert!(matches!(err, ExtractorError::NoContent(_)));
    }

    #[tokio::test]
    async fn test_extract_tampered_blob_is_crypto_failure() {
        let site = fixture_site().with_page(
            PAGE_URL,
            r#"<div class="wrapper" data-value="bm90IGEgY2lwaGVydGV4dA=="></div>"#,
        );
        let err = extractor(site).extract(PAGE_URL).await.unwrap_err();
        assert!(matches!(err, ExtractorError::CryptoFailure { .. }));
    }

    #[tokio::test]
    async fn test_extract_bad_envelope_is_decode_failure() {
        let site = fixture_site().with_callback_body("<html>blocked</html>");
        let err = extractor(site).extract(PAGE_URL).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractorError::DecodeFailure {
                stage: "callback envelope",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_extract_without_primary_sources() {
        let site = fixture_site().with_payload(serde_json::json!({
            "source": [{"file": "", "type": "hls"}],
            "source_bk": [{"file": "https://cdn.example/ep1/en.vtt", "type": "subtitles"}]
        }));
        let descriptor = extractor(site).extract(PAGE_URL).await.unwrap();

        assert!(!descriptor.is_m3u8());
        assert!(descriptor.qualities().is_empty());
        assert_eq!(descriptor.intro(), TimingWindow::default());
        assert_eq!(descriptor.subtitles().len(), 1);
        assert!(descriptor.thumbnail().is_none());
    }

    #[tokio::test]
    async fn test_extract_broken_manifest_is_parse_failure() {
        let site = fixture_site().with_page(
            "https://cdn.example/ep1/master.m3u8",
            "#EXTM3U\n#EXT-X-STREAM-INF:RESOLUTION=640x360\n360/index.m3u8\n",
        );
        let err = extractor(site).extract(PAGE_URL).await.unwrap_err();
        assert!(matches!(err, ExtractorError::ParseFailure { .. }));
    }

    #[tokio::test]
    #[ignore]
    async fn test_extract_live() {
        let url = "https://embtaku.pro/streaming.php?id=MTgxNDkx";
        let extractor = crate::extractor::default_factory()
            .unwrap()
            .create_extractor(url)
            .unwrap();
        let descriptor = extractor.extract(url).await.unwrap();
        println!("{descriptor:?}");
    }
}
