//! Per-run pipeline statistics

use std::fmt;
use std::ops::AddAssign;

/// What each pipeline stage consumed and dropped
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Raw lines fed in
    pub lines_read: usize,
    /// Lines excluded by keyword or not parseable as a domain
    pub lines_skipped: usize,
    /// Exact `(domain, wildcard)` repeats
    pub duplicates_removed: usize,
    /// Records dropped because of the allow-list
    pub conflicts_removed: usize,
    /// Records covered by a wildcard ancestor
    pub covered_removed: usize,
    /// Records that failed the liveness check
    pub dead_removed: usize,
    /// Records in the final set
    pub emitted: usize,
}

impl Stats {
    /// Lines that produced a record
    pub fn records_parsed(&self) -> usize {
        self.lines_read - self.lines_skipped
    }

    /// Records dropped by every stage after parsing
    pub fn records_removed(&self) -> usize {
        self.duplicates_removed + self.conflicts_removed + self.covered_removed + self.dead_removed
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Self) {
        self.lines_read += rhs.lines_read;
        self.lines_skipped += rhs.lines_skipped;
        self.duplicates_removed += rhs.duplicates_removed;
        self.conflicts_removed += rhs.conflicts_removed;
        self.covered_removed += rhs.covered_removed;
        self.dead_removed += rhs.dead_removed;
        self.emitted += rhs.emitted;
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "read {} lines ({} skipped), removed {} duplicate, {} allow-listed, {} covered, {} dead; {} emitted",
            self.lines_read,
            self.lines_skipped,
            self.duplicates_removed,
            self.conflicts_removed,
            self.covered_removed,
            self.dead_removed,
            self.emitted
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let stats = Stats {
            lines_read: 10,
            lines_skipped: 3,
            duplicates_removed: 1,
            conflicts_removed: 1,
            covered_removed: 2,
            dead_removed: 1,
            emitted: 2,
        };
        assert_eq!(stats.records_parsed(), 7);
        assert_eq!(stats.records_removed() + stats.emitted, stats.records_parsed());
    }

    #[test]
    fn test_add_assign() {
        let mut total = Stats::default();
        total += Stats {
            lines_read: 4,
            emitted: 2,
            ..Stats::default()
        };
        total += Stats {
            lines_read: 1,
            emitted: 1,
            ..Stats::default()
        };
        assert_eq!(total.lines_read, 5);
        assert_eq!(total.emitted, 3);
    }
}
