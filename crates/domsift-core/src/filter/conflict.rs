//! Allow/block conflict resolution

use super::AllowList;
use crate::record::{parent_suffixes, DomainRecord};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Remove block records that conflict with the allow-list.
///
/// Two rules are evaluated against the same input:
///
/// - an allowed domain removes every block record for one of its strict
///   ancestors (allowing `a.example.com` unblocks `example.com`)
/// - a block record is removed when its own domain or any ancestor of it
///   is allowed
///
/// Record order is preserved.
///
/// ```
/// use domsift_core::{resolve_conflicts, AllowList, DomainRecord};
///
/// let allow: AllowList = ["ads.example.com"].into_iter().collect();
/// let block = vec![
///     DomainRecord::new("ads.example.com", true).unwrap(),
///     DomainRecord::new("example.com", true).unwrap(),
///     DomainRecord::new("other.example.net", false).unwrap(),
/// ];
///
/// let kept = resolve_conflicts(block, &allow);
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].domain(), "other.example.net");
/// ```
#[instrument(skip_all, fields(records = records.len(), allowed = allow.len()))]
pub fn resolve_conflicts(records: Vec<DomainRecord>, allow: &AllowList) -> Vec<DomainRecord> {
    if allow.is_empty() {
        return records;
    }

    let unblocked_ancestors: HashSet<&str> = allow.iter().flat_map(parent_suffixes).collect();

    records
        .into_iter()
        .filter(|record| {
            let domain = record.domain();
            if unblocked_ancestors.contains(domain) {
                debug!(domain, "Removed: ancestor of an allowed domain");
                return false;
            }
            if allow.exempts(domain) {
                debug!(domain, "Removed: allowed");
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(domain: &str, wildcard: bool) -> DomainRecord {
        DomainRecord::new(domain, wildcard).unwrap()
    }

    fn domains(records: &[DomainRecord]) -> Vec<&str> {
        records.iter().map(DomainRecord::domain).collect()
    }

    #[test]
    fn test_allowed_child_removes_ancestor_and_itself() {
        let allow: AllowList = ["ads.example.com"].into_iter().collect();
        let kept = resolve_conflicts(
            vec![rec("ads.example.com", false), rec("example.com", false)],
            &allow,
        );
        assert!(kept.is_empty());
    }

    #[test]
    fn test_allowed_ancestor_exempts_descendants() {
        let allow: AllowList = ["example.com"].into_iter().collect();
        let kept = resolve_conflicts(
            vec![
                rec("a.example.com", true),
                rec("b.c.example.com", false),
                rec("example.org", false),
            ],
            &allow,
        );
        assert_eq!(domains(&kept), vec!["example.org"]);
    }

    #[test]
    fn test_ancestor_removal_is_unconditional() {
        // The parent block goes even though it also covered other children.
        let allow: AllowList = ["cdn.example.com"].into_iter().collect();
        let kept = resolve_conflicts(
            vec![rec("example.com", true), rec("tracker.example.com", false)],
            &allow,
        );
        assert_eq!(domains(&kept), vec!["tracker.example.com"]);
    }

    #[test]
    fn test_siblings_are_untouched() {
        let allow: AllowList = ["a.example.com"].into_iter().collect();
        let kept = resolve_conflicts(
            vec![rec("b.example.com", false), rec("aa.example.com", false)],
            &allow,
        );
        assert_eq!(domains(&kept), vec!["b.example.com", "aa.example.com"]);
    }

    #[test]
    fn test_empty_allow_list_is_identity() {
        let input = vec![rec("x.example.com", true), rec("example.com", false)];
        assert_eq!(resolve_conflicts(input.clone(), &AllowList::new()), input);
    }
}
