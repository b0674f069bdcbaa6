use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{error::ManifestError, resolve::resolve_url};

pub(crate) const STREAM_INF_TAG: &str = "#EXT-X-STREAM-INF";
const MANIFEST_SUFFIX: &str = ".m3u8";

/// One rendition listed by a master playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Quality label, e.g. "720p"
    pub name: String,
    /// Peak bitrate in bits per second
    pub bandwidth: u64,
    /// Provider supplied resolution string, e.g. "1280x720"
    pub resolution: String,
    /// Absolute URL of the media playlist
    pub uri: String,
}

#[derive(Debug)]
struct PendingVariant {
    name: Option<String>,
    bandwidth: u64,
    resolution: String,
}

impl PendingVariant {
    fn label(&self) -> String {
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        if let Some((_, height)) = self.resolution.split_once('x')
            && !height.is_empty()
        {
            return format!("{height}p");
        }
        format!("{}k", self.bandwidth / 1000)
    }

    fn finish(self, uri: String) -> Variant {
        Variant {
            name: self.label(),
            bandwidth: self.bandwidth,
            resolution: self.resolution,
            uri,
        }
    }
}

/// Splits an attribute list (`KEY=VALUE,KEY="VALUE"`) into pairs.
///
/// Commas inside quoted values do not split, surrounding quotes are stripped.
pub fn parse_attributes(list: &str) -> Vec<(&str, &str)> {
    let mut segments = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in list.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                segments.push(&list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    segments.push(&list[start..]);

    segments.into_iter().filter_map(split_pair).collect()
}

fn split_pair(segment: &str) -> Option<(&str, &str)> {
    let (key, value) = segment.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim().trim_matches('"')))
}

fn parse_stream_inf(attr_list: &str, line: usize) -> Result<PendingVariant, ManifestError> {
    let mut name = None;
    let mut bandwidth = None;
    let mut resolution = String::new();

    for (key, value) in parse_attributes(attr_list) {
        match key {
            "NAME" => name = Some(value.to_string()),
            "RESOLUTION" => resolution = value.to_string(),
            "BANDWIDTH" => {
                let parsed = value
                    .parse::<u64>()
                    .map_err(|_| ManifestError::InvalidAttribute {
                        attribute: "BANDWIDTH",
                        value: value.to_string(),
                        line,
                    })?;
                bandwidth = Some(parsed);
            }
            _ => {}
        }
    }

    let bandwidth = bandwidth.ok_or_else(|| ManifestError::InvalidAttribute {
        attribute: "BANDWIDTH",
        value: String::new(),
        line,
    })?;

    Ok(PendingVariant {
        name,
        bandwidth,
        resolution,
    })
}

fn is_manifest_path(line: &str) -> bool {
    let path = line.split(['?', '#']).next().unwrap_or(line);
    path.ends_with(MANIFEST_SUFFIX)
}

/// Parses a master playlist into its quality variants, in playlist order.
///
/// Each `#EXT-X-STREAM-INF` line opens a variant that is closed by the next
/// content line naming a `.m3u8` file. A variant never followed by such a
/// line is dropped.
pub fn parse_master(text: &str, base_url: &str) -> Result<Vec<Variant>, ManifestError> {
    let mut variants = Vec::new();
    let mut pending: Option<PendingVariant> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix(STREAM_INF_TAG) {
            let attr_list = rest.strip_prefix(':').unwrap_or(rest);
            if let Some(dropped) = pending.replace(parse_stream_inf(attr_list, idx + 1)?) {
                debug!(line = idx + 1, variant = ?dropped, "Variant without URI replaced");
            }
            continue;
        }

        if line.starts_with('#') {
            continue;
        }

        if !is_manifest_path(line) {
            trace!(line = idx + 1, "Skipping non-playlist content line");
            continue;
        }

        if let Some(variant) = pending.take() {
            variants.push(variant.finish(resolve_url(base_url, line)));
        }
    }

    if let Some(dropped) = pending {
        debug!(variant = ?dropped, "Trailing variant without URI discarded");
    }

    if variants.is_empty() {
        return Err(ManifestError::NoVariantsFound);
    }

    Ok(variants)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cdn.example.com/hls/ep1/master.m3u8";

    #[test]
    fn test_single_variant() {
        let text = "#EXTM3U\n\
            #EXT-X-STREAM-INF:BANDWIDTH=800000,NAME=\"480p\",RESOLUTION=854x480\n\
            480p/index.m3u8\n";
        let variants = parse_master(text, BASE).unwrap();
        assert_eq!(
            variants,
            vec![Variant {
                name: "480p".to_string(),
                bandwidth: 800000,
                resolution: "854x480".to_string(),
                uri: "https://cdn.example.com/hls/ep1/480p/index.m3u8".to_string(),
            }]
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let text = "#EXTM3U\n\
            #EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=2500000,RESOLUTION=1920x1080,NAME=\"1080p\"\n\
            ep.1080.m3u8\n\
            \n\
            #EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=400000,RESOLUTION=640x360,NAME=\"360p\"\n\
            ep.360.m3u8\n\
            #EXT-X-STREAM-INF:PROGRAM-ID=1,BANDWIDTH=1200000,RESOLUTION=1280x720,NAME=\"720p\"\n\
            https://mirror.example.net/ep.720.m3u8\n";
        let names: Vec<_> = parse_master(text, BASE)
            .unwrap()
            .into_iter()
            .map(|v| (v.name, v.uri))
            .collect();
        assert_eq!(
            names,
            vec![
                (
                    "1080p".to_string(),
                    "https://cdn.example.com/hls/ep1/ep.1080.m3u8".to_string()
                ),
                (
                    "360p".to_string(),
                    "https://cdn.example.com/hls/ep1/ep.360.m3u8".to_string()
                ),
                (
                    "720p".to_string(),
                    "https://mirror.example.net/ep.720.m3u8".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_quoted_codecs_do_not_split() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=1000,CODECS=\"avc1.4d401f,mp4a.40.2\",NAME=\"hd\"\n\
            hd.m3u8\n";
        let variants = parse_master(text, BASE).unwrap();
        assert_eq!(variants[0].name, "hd");
        assert_eq!(variants[0].bandwidth, 1000);
    }

    #[test]
    fn test_pending_without_uri_is_discarded() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=800000,NAME=\"480p\"\n\
            480p.m3u8\n\
            #EXT-X-STREAM-INF:BANDWIDTH=1600000,NAME=\"720p\"\n";
        let variants = parse_master(text, BASE).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].name, "480p");
    }

    #[test]
    fn test_non_playlist_lines_are_not_uris() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=800000,NAME=\"480p\"\n\
            segment0.ts\n\
            480p.m3u8?token=abc\n";
        let variants = parse_master(text, BASE).unwrap();
        assert_eq!(
            variants[0].uri,
            "https://cdn.example.com/hls/ep1/480p.m3u8?token=abc"
        );
    }

    #[test]
    fn test_name_fallbacks() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=1200000,RESOLUTION=1280x720\n\
            a.m3u8\n\
            #EXT-X-STREAM-INF:BANDWIDTH=64000\n\
            b.m3u8\n";
        let variants = parse_master(text, BASE).unwrap();
        assert_eq!(variants[0].name, "720p");
        assert_eq!(variants[1].name, "64k");
    }

    #[test]
    fn test_invalid_bandwidth_fails_whole_parse() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=800000,NAME=\"480p\"\n\
            480p.m3u8\n\
            #EXT-X-STREAM-INF:BANDWIDTH=-5,NAME=\"720p\"\n\
            720p.m3u8\n";
        let err = parse_master(text, BASE).unwrap_err();
        assert_eq!(
            err,
            ManifestError::InvalidAttribute {
                attribute: "BANDWIDTH",
                value: "-5".to_string(),
                line: 3,
            }
        );
    }

    #[test]
    fn test_missing_bandwidth_fails() {
        let text = "#EXT-X-STREAM-INF:NAME=\"480p\"\n480p.m3u8\n";
        assert!(matches!(
            parse_master(text, BASE),
            Err(ManifestError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_no_variants() {
        assert_eq!(
            parse_master("#EXTM3U\n#EXT-X-VERSION:3\n", BASE),
            Err(ManifestError::NoVariantsFound)
        );
        assert_eq!(parse_master("", BASE), Err(ManifestError::NoVariantsFound));
    }

    #[test]
    fn test_parse_attributes() {
        assert_eq!(
            parse_attributes("A=1, B=\"x,y\" ,C=\"z\",junk"),
            vec![("A", "1"), ("B", "x,y"), ("C", "z")]
        );
    }
}
