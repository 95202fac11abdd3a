//! The validity predicate run on every canonical candidate

use std::net::IpAddr;

/// Longest textual domain name accepted
pub const MAX_DOMAIN_LEN: usize = 253;

/// Characters that never appear in a plausible domain.
/// `/` catches URLs and paths, `?&=` query strings, `^|` Adblock leftovers,
/// the rest glob and address syntax.
const FORBIDDEN: &[char] = &['/', '?', '&', '=', '^', '|', '*', '%', ':', '@', '\\'];

/// Check whether `s` is acceptable as a canonical domain.
///
/// This is a plausibility filter, not an RFC 1035 validator. It rejects
/// empty strings, IP literals, single labels, paths and anything carrying
/// glob, port or whitespace characters.
///
/// ```
/// use domsift_core::canonical::is_valid_domain;
///
/// assert!(is_valid_domain("ads.example.com"));
/// assert!(!is_valid_domain("localhost"));
/// assert!(!is_valid_domain("10.0.0.1"));
/// ```
pub fn is_valid_domain(s: &str) -> bool {
    if s.is_empty() || s.len() > MAX_DOMAIN_LEN || !s.contains('.') {
        return false;
    }
    if s.contains(FORBIDDEN) || s.contains(char::is_whitespace) {
        return false;
    }
    if !s
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return false;
    }
    s.parse::<IpAddr>().is_err()
}
