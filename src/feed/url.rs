//! Relative-to-absolute URL resolution.

/// Whether `url` already carries an `http://` or `https://` scheme.
#[inline]
pub fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Join `url` onto `base` unless it is already absolute.
///
/// The base loses its trailing slashes and the path gains a leading one,
/// so `("https://ex.com/", "a")` and `("https://ex.com", "/a")` agree.
pub fn resolve_url(base: &str, url: &str) -> String {
    if is_absolute(url) {
        return url.to_string();
    }

    let base = base.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}
