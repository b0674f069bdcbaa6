//! Cross-provider mapping: title resolution, episode merging and the service
//! that composes them with the catalog and player extractors.

pub mod episode;
pub mod provider;
pub mod service;
pub mod title;

pub use episode::{TitleOverrides, merge_episode_lists, merge_stream_variants, sort_by_number};
pub use provider::{CatalogProvider, EpisodeTitleProvider, MetadataProvider};
pub use service::{DUB_VERSION, MappingService, ProviderMapping, SUB_VERSION, VERSION_HEADER, search_query};
pub use title::{DUB_MARKER, STOP_WORDS, TitleMatch, best_match, resolve, resolve_dub, sanitize, similarity};
