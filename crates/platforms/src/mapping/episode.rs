use rustc_hash::FxHashMap;
use tracing::warn;

use crate::media::{EpisodeRecord, QualityVariant};

/// Episode titles keyed by episode number.
pub type TitleOverrides = FxHashMap<i64, String>;

/// Attaches the URL of the equally named dub variant to each sub variant.
///
/// The sub list is the base: dub-only qualities are dropped and the output has
/// the same length and order as `sub`.
pub fn merge_stream_variants(sub: &[QualityVariant], dub: &[QualityVariant]) -> Vec<QualityVariant> {
    sub.iter()
        .map(|variant| {
            let mut merged = variant.clone();
            if let Some(dubbed) = dub.iter().rfind(|d| d.name == variant.name) {
                merged.dub_url = Some(dubbed.url.clone());
            }
            merged
        })
        .collect()
}

/// Combines subbed and dubbed episode lists into one record per number.
///
/// Sub records are inserted first with `has_dub = false`, then dub records
/// overlay them. Records without a number are dropped. The output order is
/// unspecified; use [`sort_by_number`] for presentation order.
pub fn merge_episode_lists(
    sub: Vec<EpisodeRecord>,
    dub: Vec<EpisodeRecord>,
    title_overrides: &TitleOverrides,
) -> Vec<EpisodeRecord> {
    let mut merged: FxHashMap<i64, EpisodeRecord> =
        FxHashMap::with_capacity_and_hasher(sub.len().max(dub.len()), Default::default());

    for mut episode in sub {
        let Some(number) = episode.number else {
            warn!(id = %episode.id, "dropping sub episode without a number");
            continue;
        };
        episode.has_dub = false;
        merged.insert(number, episode);
    }

    for mut episode in dub {
        let Some(number) = episode.number else {
            warn!(id = %episode.id, "dropping dub episode without a number");
            continue;
        };

        match merged.get_mut(&number) {
            Some(existing) => {
                existing.has_dub = true;
                if let Some(dub_source) = &episode.source
                    && let Some(source) = existing.source.take()
                {
                    existing.source = Some(source.with_dub_variants(dub_source.qualities()));
                }
            }
            None => {
                episode.has_dub = true;
                merged.insert(number, episode);
            }
        }
    }

    for (number, episode) in merged.iter_mut() {
        if let Some(title) = title_overrides.get(number) {
            episode.title = Some(title.clone());
        }
    }

    merged.into_values().collect()
}

/// Sorts records by episode number, numberless records last.
pub fn sort_by_number(episodes: &mut [EpisodeRecord]) {
    episodes.sort_by_key(|e| (e.number.is_none(), e.number));
}
