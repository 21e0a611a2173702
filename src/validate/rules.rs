//! Stateless field rules.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^\s/$.?#].[^\s]*$").unwrap());

static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

static RE_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-[A-Z]{2})?$").unwrap());

/// Non-empty after trimming.
#[inline]
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Absolute `http`/`https` URL (scheme is case-insensitive).
pub fn is_valid_url(value: &str) -> bool {
    RE_URL.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    RE_EMAIL.is_match(value)
}

/// Two-letter language, optionally with a region: `en`, `en-US`.
pub fn is_valid_language(value: &str) -> bool {
    RE_LANGUAGE.is_match(value)
}

/// In `[0.0, 1.0]`. NaN is out of range.
pub fn is_valid_priority(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Host of an absolute URL, lowercased.
pub fn host_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(str::to_ascii_lowercase)
}

/// Whether `url`'s host equals, or is a subdomain of, one of `allowed`.
///
/// An empty `allowed` list permits everything.
pub fn is_domain_allowed(url: &str, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let Some(host) = host_of(url) else {
        return false;
    };
    allowed.iter().any(|domain| host_matches(&host, domain))
}

fn host_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim().trim_start_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }
    host == domain
        || host
            .strip_suffix(&domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/a?b=c#d"));
        assert!(is_valid_url("HTTPS://EXAMPLE.COM/x"));
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("https://"));
        assert!(!is_valid_url("https://exa mple.com"));
        assert!(!is_valid_url("/relative/path"));
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("editor@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("editor"));
        assert!(!is_valid_email("editor@example"));
        assert!(!is_valid_email("editor@example.com (Editor)"));
    }

    #[test]
    fn test_is_valid_language() {
        assert!(is_valid_language("en"));
        assert!(is_valid_language("en-US"));
        assert!(!is_valid_language("EN"));
        assert!(!is_valid_language("en-us"));
        assert!(!is_valid_language("eng"));
        assert!(!is_valid_language(""));
    }

    #[test]
    fn test_is_valid_priority() {
        assert!(is_valid_priority(0.0));
        assert!(is_valid_priority(0.5));
        assert!(is_valid_priority(1.0));
        assert!(!is_valid_priority(-0.1));
        assert!(!is_valid_priority(1.01));
        assert!(!is_valid_priority(f64::NAN));
    }

    #[test]
    fn test_is_domain_allowed() {
        let allowed = domains(&["example.com"]);
        assert!(is_domain_allowed("https://example.com/x", &allowed));
        assert!(is_domain_allowed("https://news.example.com/x", &allowed));
        assert!(is_domain_allowed("https://EXAMPLE.com", &allowed));
        assert!(!is_domain_allowed("https://blocked.com/x", &allowed));
        assert!(!is_domain_allowed("https://notexample.com/x", &allowed));
        assert!(!is_domain_allowed("https://example.com.evil.org/", &allowed));
    }

    #[test]
    fn test_is_domain_allowed_unrestricted() {
        assert!(is_domain_allowed("https://anything.org", &[]));
    }

    #[test]
    fn test_leading_dot_in_allowed_domain() {
        let allowed = domains(&[".example.com"]);
        assert!(is_domain_allowed("https://example.com/", &allowed));
        assert!(is_domain_allowed("https://a.example.com/", &allowed));
    }
}
