//! Canonical domain records
//!
//! A [`DomainRecord`] is the uniform `(domain, wildcard)` pair every stage
//! after the canonicalizer works on. The label path (labels in reverse,
//! top-level label first) is always derived from the domain, never stored.

mod dedup;

pub use dedup::RecordDeduplicator;

use crate::canonical::is_valid_domain;
use std::cmp::Ordering;
use std::fmt;

/// A canonical domain rule
///
/// `domain` is lowercase, has no scheme/path/wildcard glyphs and no
/// leading or trailing dot. `wildcard` means the rule matches the domain
/// and every subdomain of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainRecord {
    domain: String,
    wildcard: bool,
}

impl DomainRecord {
    /// Build a record from an already canonical domain.
    ///
    /// Returns `None` when `domain` fails the validity predicate
    /// (see [`is_valid_domain`]). The domain is lowercased first.
    pub fn new(domain: impl Into<String>, wildcard: bool) -> Option<Self> {
        let domain = domain.into().to_lowercase();
        if is_valid_domain(&domain) {
            Some(Self { domain, wildcard })
        } else {
            None
        }
    }

    /// Canonicalizer-internal constructor; caller has validated `domain`.
    pub(crate) fn from_canonical(domain: String, wildcard: bool) -> Self {
        Self { domain, wildcard }
    }

    /// The canonical domain string
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Whether the record also matches every subdomain
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Same domain with the wildcard flag replaced
    #[must_use]
    pub fn with_wildcard(self, wildcard: bool) -> Self {
        Self { wildcard, ..self }
    }

    /// Labels in reverse order, top-level label first.
    ///
    /// `ads.example.com` yields `com`, `example`, `ads`.
    pub fn label_path(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.domain.rsplit('.')
    }

    /// Number of labels in the domain
    pub fn depth(&self) -> usize {
        self.label_path().count()
    }

    /// Label-by-label comparison of the reversed label paths.
    ///
    /// A path that is a prefix of another sorts first, so every descendant
    /// of a domain sorts somewhere after it and before any unrelated sibling.
    pub fn cmp_label_path(&self, other: &Self) -> Ordering {
        self.label_path().cmp(other.label_path())
    }

    /// True when this record's domain equals `ancestor`'s domain or is a
    /// subdomain of it (dot-boundary aware: `notexample.com` is not within
    /// `example.com`).
    pub fn is_within(&self, ancestor: &DomainRecord) -> bool {
        let mut labels = self.label_path();
        ancestor.label_path().all(|label| labels.next() == Some(label))
    }

    /// True when this record is a wildcard whose coverage includes `other`
    pub fn covers(&self, other: &DomainRecord) -> bool {
        self.wildcard && other.is_within(self)
    }
}

impl fmt::Display for DomainRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wildcard {
            write!(f, "+.{}", self.domain)
        } else {
            f.write_str(&self.domain)
        }
    }
}

/// Strict ancestor suffixes of a domain, nearest first.
///
/// `a.b.example.com` yields `b.example.com`, `example.com`, `com`.
pub fn parent_suffixes(domain: &str) -> impl Iterator<Item = &str> + '_ {
    domain
        .match_indices('.')
        .map(move |(pos, _)| &domain[pos + 1..])
}
