//! HLS manifest handling.
//!
//! Pure parsers over already-fetched playlist text: quality variants from a
//! master playlist, a coarse intro/outro estimate from a media playlist, and
//! URL resolution for playlist entries.

pub mod error;
pub mod master;
pub mod playlist;
pub mod resolve;
pub mod timing;

pub use error::ManifestError;
pub use master::{Variant, parse_attributes, parse_master};
pub use playlist::{PlaylistKind, classify};
pub use resolve::resolve_url;
pub use timing::{
    PlaybackTiming, TimingHeuristic, TimingWindow, estimate_timing, estimate_timing_with,
    total_duration,
};
