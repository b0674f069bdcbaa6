//! Fuzzy title matching between catalogs that share no identifiers.

use tracing::debug;

use crate::extractor::error::ExtractorError;
use crate::media::Title;

/// Words that only distinguish installments and are dropped before scoring.
pub const STOP_WORDS: [&str; 3] = ["season", "part", "cour"];

/// Suffix catalogs append to dubbed releases.
pub const DUB_MARKER: &str = " (dub)";

const PREFIX_SCALE: f64 = 0.1;
const MAX_PREFIX: usize = 4;

/// Best candidate for a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitleMatch {
    pub index: usize,
    pub score: f64,
}

/// Lowercases, drops [`STOP_WORDS`] and collapses whitespace.
pub fn sanitize(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Jaro-Winkler similarity in `[0, 1]`, over Unicode scalar values.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (len_a, len_b) = (a.len(), b.len());

    if len_a == 0 && len_b == 0 {
        return 1.0;
    }
    if len_a == 0 || len_b == 0 {
        return 0.0;
    }

    let window = (len_a.max(len_b) / 2).saturating_sub(1);
    let mut a_matched = vec![false; len_a];
    let mut b_matched = vec![false; len_b];
    let mut matches = 0usize;

    for (i, ca) in a.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(len_b);
        for j in start..end {
            if b_matched[j] || *ca != b[j] {
                continue;
            }
            a_matched[i] = true;
            b_matched[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut k = 0usize;
    for (i, ca) in a.iter().enumerate() {
        if !a_matched[i] {
            continue;
        }
        while !b_matched[k] {
            k += 1;
        }
        if *ca != b[k] {
            transpositions += 1;
        }
        k += 1;
    }
    let transpositions = (transpositions / 2) as f64;

    let m = matches as f64;
    let jaro = (m / len_a as f64 + m / len_b as f64 + (m - transpositions) / m) / 3.0;

    let prefix = a
        .iter()
        .zip(b.iter())
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count() as f64;

    jaro + prefix * PREFIX_SCALE * (1.0 - jaro)
}

/// Highest scoring candidate for `query`. Both sides are sanitized; ties go
/// to the earliest candidate.
pub fn best_match<S: AsRef<str>>(query: &str, candidates: &[S]) -> Option<TitleMatch> {
    let query = sanitize(query);
    let mut best: Option<TitleMatch> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = similarity(&query, &sanitize(candidate.as_ref()));
        if best.is_none_or(|b| score > b.score) {
            best = Some(TitleMatch { index, score });
        }
    }

    best
}

/// Matches a series onto a candidate list using all three of its titles.
///
/// Each non-empty title field is matched on its own; the strongest match
/// wins, ties resolved romaji, then english, then native.
pub fn resolve<S: AsRef<str>>(title: &Title, candidates: &[S]) -> Result<TitleMatch, ExtractorError> {
    let field_match = |field: &str| {
        if field.trim().is_empty() {
            None
        } else {
            best_match(field, candidates)
        }
    };

    let ranked = [
        ("romaji", field_match(&title.romaji)),
        ("english", field_match(&title.english)),
        ("native", field_match(&title.native)),
    ];

    let mut winner: Option<(&str, TitleMatch)> = None;
    for (field, found) in ranked {
        let Some(found) = found else {
            continue;
        };
        if winner.is_none_or(|(_, w)| found.score > w.score) {
            winner = Some((field, found));
        }
    }

    match winner {
        Some((field, found)) if found.score > 0.0 => {
            debug!(field, index = found.index, score = found.score, "resolved title");
            Ok(found)
        }
        _ => Err(ExtractorError::NoMatchFound(title.display().to_string())),
    }
}

/// Like [`resolve`], restricted to dubbed candidates and with the dub marker
/// appended to every title. The returned index refers to `candidates`.
pub fn resolve_dub<S: AsRef<str>>(
    title: &Title,
    candidates: &[S],
) -> Result<TitleMatch, ExtractorError> {
    let marker = DUB_MARKER.trim();
    let (indices, dubbed): (Vec<usize>, Vec<&str>) = candidates
        .iter()
        .enumerate()
        .map(|(index, c)| (index, c.as_ref()))
        .filter(|(_, c)| c.to_lowercase().contains(marker))
        .unzip();

    let with_marker = |field: &str| {
        if field.trim().is_empty() {
            String::new()
        } else {
            format!("{field}{DUB_MARKER}")
        }
    };
    let dub_title = Title::new(
        with_marker(&title.romaji),
        with_marker(&title.english),
        with_marker(&title.native),
    );

    let found = resolve(&dub_title, &dubbed)?;
    Ok(TitleMatch {
        index: indices[found.index],
        score: found.score,
    })
}
