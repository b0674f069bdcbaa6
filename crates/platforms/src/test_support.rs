//! In-memory collaborators for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::{Value, json};

use crate::extractor::{
    error::ExtractorError, platform_configs::GogoCdnConfig, platform_extractor::PageFetcher,
};

pub(crate) const PAGE_URL: &str =
    "https://embtaku.pro/streaming.php?id=MTgxNDkx&title=Naruto+Episode+1";
pub(crate) const CALLBACK_PREFIX: &str = "https://embtaku.pro/encrypt-ajax.php?";

type RecordedRequest = (String, Vec<(String, String)>);

/// Serves canned bodies by exact URL, or by URL prefix, and records every
/// request it receives.
#[derive(Clone, Default)]
pub(crate) struct FixtureFetcher {
    pages: Arc<Mutex<FxHashMap<String, String>>>,
    prefixes: Arc<Mutex<Vec<(String, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FixtureFetcher {
    pub(crate) fn with_page(self, url: &str, body: impl Into<String>) -> Self {
        self.pages.lock().insert(url.to_string(), body.into());
        self
    }

    pub(crate) fn with_prefix(self, prefix: &str, body: impl Into<String>) -> Self {
        let body = body.into();
        let mut prefixes = self.prefixes.lock();
        prefixes.retain(|(p, _)| p != prefix);
        prefixes.push((prefix.to_string(), body));
        drop(prefixes);
        self
    }

    pub(crate) fn with_callback_body(self, body: impl Into<String>) -> Self {
        self.with_prefix(CALLBACK_PREFIX, body)
    }

    /// Serves `payload` from the callback endpoint, encrypted with the
    /// default response secret.
    pub(crate) fn with_payload(self, payload: Value) -> Self {
        let config = GogoCdnConfig::default();
        let data = cbc_codec::encrypt(
            payload.to_string().as_bytes(),
            config.response_key.as_bytes(),
            config.iv.as_bytes(),
        )
        .unwrap();
        self.with_callback_body(json!({ "data": data }).to_string())
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch_page_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, ExtractorError> {
        self.requests.lock().push((
            url.to_string(),
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));

        if let Some(body) = self.pages.lock().get(url) {
            return Ok(body.clone());
        }
        self.prefixes
            .lock()
            .iter()
            .find(|(prefix, _)| url.starts_with(prefix.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| ExtractorError::RequestFailure {
                url: url.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            })
    }
}

fn media_playlist(segments: usize, duration: f64) -> String {
    let mut text = String::from("#EXTM3U\n#EXT-X-VERSION:3\n#EXT-X-TARGETDURATION:10\n");
    for i in 0..segments {
        text.push_str(&format!("#EXTINF:{duration:.3},\nseg{i}.ts\n"));
    }
    text.push_str("#EXT-X-ENDLIST\n");
    text
}

/// A complete embed-player site: player page, callback, one master playlist
/// with two variants and one bare media playlist.
pub(crate) fn fixture_site() -> FixtureFetcher {
    let config = GogoCdnConfig::default();
    let blob = cbc_codec::encrypt(
        b"token=abc&expires=1700000000",
        config.page_key.as_bytes(),
        config.iv.as_bytes(),
    )
    .unwrap();

    let master = "#EXTM3U\n\
#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360,NAME=\"360p\"\n\
360/index.m3u8\n\
#EXT-X-STREAM-INF:BANDWIDTH=2800000,RESOLUTION=1280x720,NAME=\"720p\"\n\
720/index.m3u8\n";

    FixtureFetcher::default()
        .with_page(
            PAGE_URL,
            format!(
                r#"<html><body><script data-name="episode" data-value="{blob}"></script></body></html>"#
            ),
        )
        .with_payload(json!({
            "source": [
                {"file": "https://cdn.example/ep1/master.m3u8", "type": "hls"},
                {"file": "https://cdn.example/ep1/alt/index.m3u8", "type": "hls"}
            ],
            "source_bk": [
                {"file": "https://cdn.example/ep1/en.vtt", "type": "Subtitles"},
                {"file": "https://cdn.example/ep1/jp.m3u8", "type": "audio"},
                {"file": "https://cdn.example/ep1/backup.mp4", "type": "mp4"}
            ],
            "track": {
                "tracks": [
                    {"file": "https://cdn.example/ep1/sprite.vtt", "kind": "thumbnails"}
                ]
            }
        }))
        .with_page("https://cdn.example/ep1/master.m3u8", master)
        .with_page(
            "https://cdn.example/ep1/360/index.m3u8",
            media_playlist(100, 10.0),
        )
        .with_page(
            "https://cdn.example/ep1/720/index.m3u8",
            media_playlist(100, 10.0),
        )
        .with_page(
            "https://cdn.example/ep1/alt/index.m3u8",
            media_playlist(2, 6.0),
        )
}
