//! Coarse intro/outro estimation from a media playlist.
//!
//! This is a heuristic, not a content-aware detector: the intro is assumed to
//! open the episode and the outro to start at a fixed fraction of the total
//! runtime. Callers must treat the windows as hints, never as exact bounds.

use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

const EXTINF_TAG: &str = "#EXTINF:";

/// A `[start, end]` window in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingWindow {
    pub start: f64,
    pub end: f64,
}

impl TimingWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// Tunable constants of the intro/outro heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingHeuristic {
    /// Length of the intro window, starting at zero
    pub intro_length: f64,
    /// Fraction of the total duration where the outro starts
    pub outro_start_ratio: f64,
    /// Length of the outro window
    pub outro_length: f64,
}

impl Default for TimingHeuristic {
    fn default() -> Self {
        Self {
            intro_length: 90.0,
            outro_start_ratio: 0.85,
            outro_length: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackTiming {
    pub total_duration: f64,
    pub intro: TimingWindow,
    pub outro: TimingWindow,
}

/// Sums every `#EXTINF` segment duration in `text`.
pub fn total_duration(text: &str) -> Result<f64, ManifestError> {
    let mut total = 0.0;
    for (idx, raw) in text.lines().enumerate() {
        let Some(rest) = raw.trim().strip_prefix(EXTINF_TAG) else {
            continue;
        };
        let value = rest.split(',').next().unwrap_or_default().trim();
        let duration = value
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d >= 0.0)
            .ok_or_else(|| ManifestError::InvalidAttribute {
                attribute: "EXTINF",
                value: value.to_string(),
                line: idx + 1,
            })?;
        total += duration;
    }
    Ok(total)
}

/// Estimates intro/outro windows with the default [`TimingHeuristic`].
pub fn estimate_timing(text: &str) -> Result<PlaybackTiming, ManifestError> {
    estimate_timing_with(text, &TimingHeuristic::default())
}

pub fn estimate_timing_with(
    text: &str,
    heuristic: &TimingHeuristic,
) -> Result<PlaybackTiming, ManifestError> {
    let total_duration = total_duration(text)?;
    let outro_start = total_duration * heuristic.outro_start_ratio;

    Ok(PlaybackTiming {
        total_duration,
        intro: TimingWindow::new(0.0, heuristic.intro_length),
        outro: TimingWindow::new(outro_start, outro_start + heuristic.outro_length),
    })
}
