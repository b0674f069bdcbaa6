use url::Url;

/// Resolves a playlist entry against the URL of the playlist that listed it.
///
/// Absolute entries are returned as-is. Relative entries are joined onto the
/// directory of `base`. An unparsable base leaves the entry untouched.
pub fn resolve_url(base: &str, target: &str) -> String {
    let target = target.trim();
    if Url::parse(target).is_ok() {
        return target.to_string();
    }

    match Url::parse(base).and_then(|base| base.join(target)) {
        Ok(url) => url.to_string(),
        Err(_) => target.to_string(),
    }
}
