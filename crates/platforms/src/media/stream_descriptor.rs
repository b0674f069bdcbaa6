use hls::{TimingWindow, Variant};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One playable quality of an episode.
///
/// `url` points at the primary (subtitled) variant playlist. `dub_url` is
/// attached by the episode merger when the dubbed release exposes a variant
/// with the same `name`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QualityVariant {
    pub name: String,
    pub bandwidth: u64,
    pub resolution: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dub_url: Option<String>,
}

impl QualityVariant {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bandwidth: 0,
            resolution: String::new(),
            url: url.into(),
            dub_url: None,
        }
    }
}

impl From<Variant> for QualityVariant {
    fn from(variant: Variant) -> Self {
        Self {
            name: variant.name,
            bandwidth: variant.bandwidth,
            resolution: variant.resolution,
            url: variant.uri,
            dub_url: None,
        }
    }
}

/// Preview image attached to a stream, usually a sprite sheet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub kind: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
/// Everything a player needs to start an episode.
///
/// A descriptor is assembled once by an extractor through
/// [`StreamDescriptor::builder`] and is not mutated afterwards. The merge and
/// header helpers consume the value and return a new one.
///
/// # Examples
///
/// ```rust
/// use platforms_parser::media::{QualityVariant, StreamDescriptor};
///
/// let descriptor = StreamDescriptor::builder()
///     .quality(QualityVariant::new("720p", "https://cdn.example/720.m3u8"))
///     .subtitle("https://cdn.example/backup.m3u8")
///     .is_m3u8(true)
///     .build();
///
/// assert_eq!(descriptor.qualities().len(), 1);
/// assert!(descriptor.is_m3u8());
/// ```
pub struct StreamDescriptor {
    qualities: Vec<QualityVariant>,
    subtitles: Vec<String>,
    audio: Vec<String>,
    is_m3u8: bool,
    intro: TimingWindow,
    outro: TimingWindow,
    headers: FxHashMap<String, String>,
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default)]
pub struct StreamDescriptorBuilder {
    qualities: Vec<QualityVariant>,
    subtitles: Vec<String>,
    audio: Vec<String>,
    is_m3u8: bool,
    intro: TimingWindow,
    outro: TimingWindow,
    headers: FxHashMap<String, String>,
    thumbnail: Option<Thumbnail>,
}

impl StreamDescriptor {
    pub fn builder() -> StreamDescriptorBuilder {
        StreamDescriptorBuilder::default()
    }

    pub fn qualities(&self) -> &[QualityVariant] {
        &self.qualities
    }

    pub fn subtitles(&self) -> &[String] {
        &self.subtitles
    }

    pub fn audio(&self) -> &[String] {
        &self.audio
    }

    pub fn is_m3u8(&self) -> bool {
        self.is_m3u8
    }

    pub fn intro(&self) -> TimingWindow {
        self.intro
    }

    pub fn outro(&self) -> TimingWindow {
        self.outro
    }

    pub fn headers(&self) -> &FxHashMap<String, String> {
        &self.headers
    }

    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    /// Returns a copy of this descriptor whose qualities carry the matching
    /// dubbed URLs from `dub`.
    pub fn with_dub_variants(self, dub: &[QualityVariant]) -> Self {
        let qualities = crate::mapping::merge_stream_variants(&self.qualities, dub);
        Self { qualities, ..self }
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }
}

impl StreamDescriptorBuilder {
    pub fn quality(mut self, quality: QualityVariant) -> Self {
        self.qualities.push(quality);
        self
    }

    pub fn qualities(mut self, qualities: impl IntoIterator<Item = QualityVariant>) -> Self {
        self.qualities.extend(qualities);
        self
    }

    pub fn subtitle(mut self, url: impl Into<String>) -> Self {
        self.subtitles.push(url.into());
        self
    }

    pub fn audio(mut self, url: impl Into<String>) -> Self {
        self.audio.push(url.into());
        self
    }

    pub fn is_m3u8(mut self, is_m3u8: bool) -> Self {
        self.is_m3u8 = is_m3u8;
        self
    }

    pub fn intro(mut self, intro: TimingWindow) -> Self {
        self.intro = intro;
        self
    }

    pub fn outro(mut self, outro: TimingWindow) -> Self {
        self.outro = outro;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: FxHashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn thumbnail(mut self, thumbnail: Option<Thumbnail>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    pub fn build(self) -> StreamDescriptor {
        StreamDescriptor {
            qualities: self.qualities,
            subtitles: self.subtitles,
            audio: self.audio,
            is_m3u8: self.is_m3u8,
            intro: self.intro,
            outro: self.outro,
            headers: self.headers,
            thumbnail: self.thumbnail,
        }
    }
}
