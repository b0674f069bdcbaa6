use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::media::Thumbnail;

pub(crate) const THUMBNAIL_KIND: &str = "thumbnails";
pub(crate) const SPRITE_KIND: &str = "Sprite";

/// `encrypt-ajax.php` response body.
#[derive(Debug, Deserialize)]
pub struct CallbackEnvelope {
    pub data: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceEntry {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl SourceEntry {
    /// The file URL, if present and non-empty.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref().filter(|f| !f.is_empty())
    }

    pub fn kind_contains(&self, needle: &str) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.to_ascii_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackEntry {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

/// The `track` field arrives either as a bare list or wrapped in an object.
/// Entries that fail to decode are dropped individually.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Track {
    List(Vec<TrackEntry>),
    Wrapper { tracks: Vec<TrackEntry> },
    #[default]
    Absent,
}

impl<'de> Deserialize<'de> for Track {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            List(Vec<Value>),
            Wrapper {
                #[serde(default)]
                tracks: Vec<Value>,
            },
            Other(serde::de::IgnoredAny),
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::List(items) => Track::List(decode_entries(items)),
            Shape::Wrapper { tracks } => Track::Wrapper {
                tracks: decode_entries(tracks),
            },
            Shape::Other(_) => Track::Absent,
        })
    }
}

fn decode_entries(items: Vec<Value>) -> Vec<TrackEntry> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<TrackEntry>(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "skipping malformed track entry");
                None
            }
        })
        .collect()
}

impl Track {
    pub fn entries(&self) -> &[TrackEntry] {
        match self {
            Track::List(entries) | Track::Wrapper { tracks: entries } => entries,
            Track::Absent => &[],
        }
    }

    /// The last thumbnail track, reported as a sprite sheet.
    pub fn thumbnail(&self) -> Option<Thumbnail> {
        self.entries()
            .iter()
            .filter(|entry| {
                entry
                    .kind
                    .as_deref()
                    .is_some_and(|k| k.eq_ignore_ascii_case(THUMBNAIL_KIND))
            })
            .filter_map(|entry| entry.file.clone())
            .last()
            .map(|url| Thumbnail {
                url,
                kind: SPRITE_KIND.to_string(),
            })
    }
}

/// Decrypted callback payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePayload {
    #[serde(default)]
    pub source: Vec<SourceEntry>,
    #[serde(default)]
    pub source_bk: Vec<SourceEntry>,
    #[serde(default)]
    pub track: Track,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_track_list_shape() {
        let payload: SourcePayload = serde_json::from_value(json!({
            "source": [{"file": "https://cdn/master.m3u8", "type": "hls"}],
            "track": [
                {"file": "https://cdn/a.vtt", "kind": "captions"},
                {"file": "https://cdn/thumbs1.vtt", "kind": "thumbnails"},
                {"file": "https://cdn/thumbs2.vtt", "kind": "Thumbnails"}
            ]
        }))
        .unwrap();

        assert!(matches!(payload.track, Track::List(ref e) if e.len() == 3));
        let thumbnail = payload.track.thumbnail().unwrap();
        assert_eq!(thumbnail.url, "https://cdn/thumbs2.vtt");
        assert_eq!(thumbnail.kind, "Sprite");
    }

    #[test]
    fn test_track_wrapper_shape() {
        let payload: SourcePayload = serde_json::from_value(json!({
            "source": [],
            "track": {"tracks": [{"file": "https://cdn/thumbs.vtt", "kind": "thumbnails"}]}
        }))
        .unwrap();

        assert!(matches!(payload.track, Track::Wrapper { .. }));
        assert_eq!(
            payload.track.thumbnail().map(|t| t.url).as_deref(),
            Some("https://cdn/thumbs.vtt")
        );
    }

    #[test]
    fn test_track_absent_or_unexpected() {
        let payload: SourcePayload = serde_json::from_value(json!({"source": []})).unwrap();
        assert_eq!(payload.track, Track::Absent);

        let payload: SourcePayload =
            serde_json::from_value(json!({"source": [], "track": null})).unwrap();
        assert_eq!(payload.track, Track::Absent);

        let payload: SourcePayload =
            serde_json::from_value(json!({"source": [], "track": "none"})).unwrap();
        assert_eq!(payload.track, Track::Absent);
        assert!(payload.track.thumbnail().is_none());
    }

    #[test]
    fn test_track_list_keeps_valid_entries() {
        let payload: SourcePayload = serde_json::from_value(json!({
            "source": [],
            "track": [
                {"file": "https://cdn/a.vtt", "kind": "captions", "label": 1},
                "garbage",
                {"file": "https://cdn/thumbs.vtt", "kind": "thumbnails"}
            ]
        }))
        .unwrap();

        assert!(matches!(payload.track, Track::List(ref e) if e.len() == 1));
        assert_eq!(
            payload.track.thumbnail().map(|t| t.url).as_deref(),
            Some("https://cdn/thumbs.vtt")
        );
    }

    #[test]
    fn test_track_wrapper_keeps_valid_entries() {
        let payload: SourcePayload = serde_json::from_value(json!({
            "source": [],
            "track": {"tracks": [
                {"file": 42, "kind": "thumbnails"},
                {"file": "https://cdn/thumbs.vtt", "kind": "thumbnails", "label": "Preview"}
            ]}
        }))
        .unwrap();

        assert_eq!(payload.track.entries().len(), 1);
        assert_eq!(payload.track.entries()[0].label.as_deref(), Some("Preview"));
        assert_eq!(
            payload.track.thumbnail().map(|t| t.url).as_deref(),
            Some("https://cdn/thumbs.vtt")
        );
    }

    #[test]
    fn test_source_entry_helpers() {
        let entry: SourceEntry =
            serde_json::from_value(json!({"file": "", "type": "Subtitle (EN)"})).unwrap();
        assert_eq!(entry.file(), None);
        assert!(entry.kind_contains("subtitle"));
        assert!(!entry.kind_contains("audio"));
    }
}
