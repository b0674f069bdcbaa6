use std::sync::{Arc, LazyLock};

use super::error::ExtractorError;
use super::platform_configs::PlatformConfigs;
use super::platform_extractor::{PageFetcher, StreamExtractor};
use crate::extractor::platforms::{self, gogocdn::GogoCdn};
use regex::Regex;

// A type alias for a thread-safe constructor function.
type ExtractorConstructor =
    fn(Arc<dyn PageFetcher>, &PlatformConfigs) -> Result<Box<dyn StreamExtractor>, ExtractorError>;

struct PlatformEntry {
    regex: &'static LazyLock<Regex>,
    constructor: ExtractorConstructor,
}

macro_rules! platform_registry {
    ( $( $regex:path => |$fetcher:ident, $configs:ident| $build:expr ),+ $(,)? ) => {
        &[
            $(
                PlatformEntry {
                    regex: &$regex,
                    constructor: |$fetcher, $configs| {
                        Ok(Box::new($build?) as Box<dyn StreamExtractor>)
                    },
                },
            )+
        ]
    };
}

// Static player registry.
static PLATFORMS: &[PlatformEntry] = platform_registry![
    platforms::gogocdn::URL_REGEX => |fetcher, configs| GogoCdn::new(fetcher, &configs.gogocdn),
];

/// Picks the stream extractor for an embed-player URL.
pub struct ExtractorFactory {
    fetcher: Arc<dyn PageFetcher>,
    configs: PlatformConfigs,
}

impl ExtractorFactory {
    pub fn new(fetcher: Arc<dyn PageFetcher>, configs: PlatformConfigs) -> Self {
        Self { fetcher, configs }
    }

    pub fn is_supported(&self, url: &str) -> bool {
        PLATFORMS.iter().any(|p| p.regex.is_match(url))
    }

    pub fn create_extractor(&self, url: &str) -> Result<Box<dyn StreamExtractor>, ExtractorError> {
        PLATFORMS
            .iter()
            .find(|platform| platform.regex.is_match(url))
            .ok_or(ExtractorError::UnsupportedExtractor)
            .and_then(|platform| (platform.constructor)(self.fetcher.clone(), &self.configs))
    }
}
