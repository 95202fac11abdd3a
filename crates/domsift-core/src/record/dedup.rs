//! Exact-duplicate removal keyed by `(domain, wildcard)`

use super::DomainRecord;
use std::collections::HashSet;

/// Keeps the first record seen for each `(domain, wildcard)` key.
///
/// `example.com` and `+.example.com` are different keys; collapsing those
/// is the hierarchical deduplicator's job.
#[derive(Debug, Default)]
pub struct RecordDeduplicator {
    seen: HashSet<DomainRecord>,
    records: Vec<DomainRecord>,
}

impl RecordDeduplicator {
    /// Create an empty deduplicator
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            seen: HashSet::with_capacity(capacity),
            records: Vec::with_capacity(capacity),
        }
    }

    /// Insert a record. Returns `false` if its key was already present.
    pub fn insert(&mut self, record: DomainRecord) -> bool {
        if self.seen.contains(&record) {
            return false;
        }
        self.seen.insert(record.clone());
        self.records.push(record);
        true
    }

    /// Number of unique records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if nothing was inserted
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Unique records in first-seen order
    pub fn into_records(self) -> Vec<DomainRecord> {
        self.records
    }
}

impl FromIterator<DomainRecord> for RecordDeduplicator {
    fn from_iter<I: IntoIterator<Item = DomainRecord>>(iter: I) -> Self {
        let mut dedup = Self::new();
        for record in iter {
            dedup.insert(record);
        }
        dedup
    }
}

impl Extend<DomainRecord> for RecordDeduplicator {
    fn extend<I: IntoIterator<Item = DomainRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(domain: &str, wildcard: bool) -> DomainRecord {
        DomainRecord::new(domain, wildcard).unwrap()
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let mut dedup = RecordDeduplicator::new();
        assert!(dedup.insert(rec("example.com", true)));
        assert!(!dedup.insert(rec("example.com", true)));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_wildcard_flag_is_part_of_key() {
        let dedup: RecordDeduplicator = [rec("example.com", true), rec("example.com", false)]
            .into_iter()
            .collect();
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_first_seen_order() {
        let dedup: RecordDeduplicator = [
            rec("b.example.com", false),
            rec("a.example.com", false),
            rec("b.example.com", false),
        ]
        .into_iter()
        .collect();

        let domains: Vec<_> = dedup
            .into_records()
            .into_iter()
            .map(|r| r.domain().to_string())
            .collect();
        assert_eq!(domains, vec!["b.example.com", "a.example.com"]);
    }
}
