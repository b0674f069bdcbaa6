//! Provider configuration types.
//!
//! Every struct deserializes from a partial document: missing fields fall
//! back to the built-in defaults, so a config file only needs to name what
//! it overrides.

use hls::TimingHeuristic;
use serde::{Deserialize, Serialize};

/// Secrets used by the embed player to obfuscate its manifest parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GogoCdnConfig {
    /// Decrypts the page blob and encrypts the content id (32 bytes)
    pub page_key: String,
    /// Decrypts the callback response (32 bytes)
    pub response_key: String,
    /// Shared CBC initialization vector (16 bytes)
    pub iv: String,
    pub timing: TimingHeuristic,
}

impl Default for GogoCdnConfig {
    fn default() -> Self {
        Self {
            page_key: "37911490979715163134003223491201".to_string(),
            response_key: "54674138327930866480207815084989".to_string(),
            iv: "3134003223491201".to_string(),
            timing: TimingHeuristic::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GogoAnimeConfig {
    pub base_url: String,
    pub ajax_url: String,
}

impl Default for GogoAnimeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gogoanime3.co".to_string(),
            ajax_url: "https://ajax.gogocdn.net".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AniListConfig {
    pub endpoint: String,
}

impl Default for AniListConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://graphql.anilist.co".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MyAnimeListConfig {
    pub base_url: String,
}

impl Default for MyAnimeListConfig {
    fn default() -> Self {
        Self {
            base_url: "https://myanimelist.net".to_string(),
        }
    }
}

/// All provider settings in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfigs {
    pub gogocdn: GogoCdnConfig,
    pub gogoanime: GogoAnimeConfig,
    pub anilist: AniListConfig,
    pub myanimelist: MyAnimeListConfig,
}
