use serde::{Deserialize, Serialize};

use super::stream_descriptor::StreamDescriptor;

/// One episode of a series.
///
/// `number` is the merge key across providers. Provider scrapers leave it
/// empty when the page does not expose a usable number; such records never
/// survive a merge.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct EpisodeRecord {
    pub id: String,
    pub number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub is_filler: bool,
    #[serde(default)]
    pub has_dub: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<StreamDescriptor>,
}

impl EpisodeRecord {
    pub fn new(id: impl Into<String>, number: Option<i64>) -> Self {
        Self {
            id: id.into(),
            number,
            ..Default::default()
        }
    }
}
