//! Allow-list entries used to exempt domains from block rules

use crate::canonical::{canonicalize, SourceFormat};
use crate::record::parent_suffixes;
use std::collections::HashSet;
use tracing::debug;

/// Adblock exception marker stripped from allow-list lines
const EXCEPTION_MARKER: &str = "@@";

/// A set of allowed domains that also remembers insertion order.
///
/// Entries carry no wildcard flag; how far an entry reaches up and down
/// the hierarchy is decided by [`resolve_conflicts`](super::resolve_conflicts).
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    set: HashSet<String>,
    ordered: Vec<String>,
}

impl AllowList {
    /// Create an empty allow-list
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one raw allow-list line.
    ///
    /// A leading `@@` is stripped, then the line goes through the generic
    /// canonicalizer. Returns `true` if a new entry was added.
    pub fn ingest(&mut self, line: &str) -> bool {
        let line = line.trim();
        let line = line.strip_prefix(EXCEPTION_MARKER).unwrap_or(line);

        match canonicalize(line, SourceFormat::Generic) {
            Some(record) => self.insert(record.domain()),
            None => false,
        }
    }

    /// Insert an already canonical domain. Returns `false` on a repeat.
    pub fn insert(&mut self, domain: &str) -> bool {
        if self.set.contains(domain) {
            return false;
        }
        self.set.insert(domain.to_string());
        self.ordered.push(domain.to_string());
        true
    }

    /// Exact membership test
    pub fn contains(&self, domain: &str) -> bool {
        self.set.contains(domain)
    }

    /// True when `domain` or one of its ancestors is allowed
    pub fn exempts(&self, domain: &str) -> bool {
        if self.contains(domain) {
            return true;
        }
        let hit = parent_suffixes(domain).find(|parent| self.contains(parent));
        if let Some(parent) = hit {
            debug!(domain, allowed = parent, "Exempted by allowed ancestor");
        }
        hit.is_some()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Check if the allow-list is empty
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl<'a> Extend<&'a str> for AllowList {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for line in iter {
            self.ingest(line);
        }
    }
}

impl<'a> FromIterator<&'a str> for AllowList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
