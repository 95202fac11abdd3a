//! Hierarchical deduplication
//!
//! A wildcard record for `D` already matches every subdomain of `D`, so
//! any record at or below a surviving wildcard is redundant.
//!
//! Records are sorted by reversed label path (`com`, `example`, `ads`),
//! wildcards first on ties. Every descendant of a domain then sorts
//! directly after it, and a single scan with a running covering root
//! finds all covered records without pairwise comparison.

use crate::record::DomainRecord;
use tracing::{debug, instrument};

/// Drop every record covered by a wildcard ancestor (or equal wildcard).
///
/// The result is sorted by domain ascending. Plain records cover nothing
/// but themselves. Running the function on its own output is a no-op.
///
/// ```
/// use domsift_core::{collapse_covered, DomainRecord};
///
/// let out = collapse_covered(vec![
///     DomainRecord::new("ads.example.com", false).unwrap(),
///     DomainRecord::new("example.com", true).unwrap(),
/// ]);
/// assert_eq!(out.len(), 1);
/// assert_eq!(out[0].to_string(), "+.example.com");
/// ```
#[instrument(skip_all, fields(records = records.len()))]
pub fn collapse_covered(mut records: Vec<DomainRecord>) -> Vec<DomainRecord> {
    records.sort_by(|a, b| {
        a.cmp_label_path(b)
            .then_with(|| b.is_wildcard().cmp(&a.is_wildcard()))
    });

    let mut kept: Vec<DomainRecord> = Vec::with_capacity(records.len());
    // Index into `kept` of the last kept wildcard, cleared by a kept plain record
    let mut root: Option<usize> = None;

    for record in records {
        if let Some(idx) = root {
            if record.is_within(&kept[idx]) {
                debug!(domain = record.domain(), root = kept[idx].domain(), "Covered");
                continue;
            }
        }

        root = record.is_wildcard().then_some(kept.len());
        kept.push(record);
    }

    kept.sort_by(|a, b| a.domain().cmp(b.domain()));
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(domain: &str, wildcard: bool) -> DomainRecord {
        DomainRecord::new(domain, wildcard).unwrap()
    }

    fn render(records: &[DomainRecord]) -> Vec<String> {
        records.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_wildcard_covers_descendant() {
        let out = collapse_covered(vec![rec("example.com", true), rec("ads.example.com", false)]);
        assert_eq!(render(&out), vec!["+.example.com"]);
    }

    #[test]
    fn test_plain_covers_nothing() {
        let out = collapse_covered(vec![rec("example.com", false), rec("ads.example.com", false)]);
        assert_eq!(render(&out), vec!["ads.example.com", "example.com"]);
    }

    #[test]
    fn test_wildcard_beats_plain_on_same_domain() {
        let out = collapse_covered(vec![rec("example.com", false), rec("example.com", true)]);
        assert_eq!(render(&out), vec!["+.example.com"]);
    }

    #[test]
    fn test_label_boundary() {
        let out = collapse_covered(vec![rec("example.com", true), rec("badexample.com", false)]);
        assert_eq!(render(&out), vec!["badexample.com", "+.example.com"]);
    }

    #[test]
    fn test_plain_between_wildcard_descendants_clears_root() {
        // sorted: +.a.com, x.a.com (covered), +.b.com, plain c.com, +.d.c.com
        let out = collapse_covered(vec![
            rec("d.c.com", true),
            rec("x.a.com", false),
            rec("c.com", false),
            rec("a.com", true),
            rec("b.com", true),
        ]);
        assert_eq!(render(&out), vec!["+.a.com", "+.b.com", "c.com", "+.d.c.com"]);
    }

    #[test]
    fn test_nested_wildcards_keep_outermost() {
        let out = collapse_covered(vec![
            rec("a.b.example.com", true),
            rec("b.example.com", true),
            rec("example.com", true),
            rec("z.a.b.example.com", false),
        ]);
        assert_eq!(render(&out), vec!["+.example.com"]);
    }

    #[test]
    fn test_idempotent() {
        let once = collapse_covered(vec![
            rec("example.com", true),
            rec("a.example.net", false),
            rec("example.net", false),
            rec("q.example.org", true),
        ]);
        assert_eq!(collapse_covered(once.clone()), once);
    }

    #[test]
    fn test_empty() {
        assert!(collapse_covered(Vec::new()).is_empty());
    }
}
