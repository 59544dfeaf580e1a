//! Realm identifier matching
//!
//! Operators write the allowed realm as a URL, login requests claim one,
//! and principals embed a bare domain; the three must compare as the same
//! realm. `http` vs `https` or a trailing slash must never cause a false
//! negative, while distinct domains must never match.

use url::Url;

/// Normalizes and compares realm identifiers (URLs or bare domains)
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeserverMatcher;

impl HomeserverMatcher {
    /// Canonical string form: trailing slashes stripped, lower-cased
    pub fn normalize(url: &str) -> String {
        url.trim().trim_end_matches('/').to_lowercase()
    }

    /// The host component of a realm identifier, lower-cased
    ///
    /// For a parseable absolute URL this is its host, which can be empty
    /// for degenerate inputs like `example.com:8080` (parsed as scheme
    /// `example.com:` with no host). Anything unparseable falls back to
    /// stripping a leading scheme and taking everything before the first
    /// `/`.
    pub fn domain_of(url: &str) -> String {
        let trimmed = url.trim();
        if let Ok(parsed) = Url::parse(trimmed) {
            return parsed.host_str().unwrap_or_default().to_lowercase();
        }
        let rest = trimmed
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(trimmed);
        rest.split('/').next().unwrap_or_default().to_lowercase()
    }

    /// Whether `a` and `b` name the same realm
    ///
    /// True on exact normalized equality, or on equal non-empty domains.
    /// An empty extracted domain never satisfies the domain branch, so
    /// degenerate schemeless inputs cannot silently match.
    pub fn matches(a: &str, b: &str) -> bool {
        if Self::normalize(a) == Self::normalize(b) {
            return true;
        }
        let domain_a = Self::domain_of(a);
        !domain_a.is_empty() && domain_a == Self::domain_of(b)
    }
}
