//! Integration tests for the stage chain

use domsift_core::{
    canonicalize, collapse_covered, resolve_conflicts, AllowList, DomainRecord, Pipeline,
    SourceFormat,
};

fn rec(domain: &str, wildcard: bool) -> DomainRecord {
    DomainRecord::new(domain, wildcard).unwrap()
}

fn parsed(line: &str) -> Option<(String, bool)> {
    canonicalize(line, SourceFormat::Generic).map(|r| (r.domain().to_string(), r.is_wildcard()))
}

#[test]
fn test_documented_line_forms() {
    assert_eq!(parsed("||ads.example.com^"), Some(("ads.example.com".into(), true)));
    assert_eq!(
        parsed("0.0.0.0 tracker.example.org"),
        Some(("tracker.example.org".into(), false))
    );
    assert_eq!(
        parsed("DOMAIN-SUFFIX,cdn.example.net,REJECT"),
        Some(("cdn.example.net".into(), true))
    );
    assert_eq!(parsed("+.example.io"), Some(("example.io".into(), true)));
    assert_eq!(parsed("192.168.1.1"), None);
    assert_eq!(parsed("1.2.3.4"), None);
    assert_eq!(parsed("::1"), None);
}

#[test]
fn test_hierarchy_examples() {
    let covered = collapse_covered(vec![rec("example.com", true), rec("ads.example.com", false)]);
    assert_eq!(covered, vec![rec("example.com", true)]);

    let plain = collapse_covered(vec![rec("example.com", false), rec("ads.example.com", false)]);
    assert_eq!(plain, vec![rec("ads.example.com", false), rec("example.com", false)]);
}

#[test]
fn test_conflict_example() {
    let allow: AllowList = ["ads.example.com"].into_iter().collect();
    let kept = resolve_conflicts(
        vec![rec("ads.example.com", false), rec("example.com", false)],
        &allow,
    );
    assert!(kept.is_empty());
}

#[test]
fn test_fake_ip_filter_file() {
    let file = "\
dns:
  fake-ip-filter:
    - '+.lan'
    - '+.local.example.com'
    - \"time.*.com\"
    - 'stun.example.org'
    # comment
";
    let outcome = Pipeline::new(SourceFormat::FakeIpFilter).process(file.lines());
    let rendered: Vec<_> = outcome.records.iter().map(ToString::to_string).collect();

    assert_eq!(rendered, vec!["+.local.example.com", "stun.example.org"]);
}

#[test]
fn test_china_domain_list_file() {
    let file = "\
baidu.com
api.baidu.com
DOMAIN,exact.qq.com
DOMAIN-SUFFIX,qq.com
# header
";
    let outcome = Pipeline::new(SourceFormat::ChinaDomainList).process(file.lines());
    let rendered: Vec<_> = outcome.records.iter().map(ToString::to_string).collect();

    assert_eq!(rendered, vec!["+.baidu.com", "+.qq.com"]);
}

#[test]
fn test_allow_list_with_exception_syntax() {
    let allow: AllowList = ["@@||good.example.com^", "! comment", "@@||fine.example.net^$important"]
        .into_iter()
        .collect();
    assert_eq!(allow.len(), 2);

    let outcome = Pipeline::new(SourceFormat::Generic)
        .with_allow_list(allow)
        .process([
            "||example.com^",
            "||x.good.example.com^",
            "fine.example.net",
            "bad.example.net",
        ]);
    let rendered: Vec<_> = outcome.records.iter().map(ToString::to_string).collect();

    assert_eq!(rendered, vec!["bad.example.net"]);
}

#[test]
fn test_output_is_sorted_by_domain() {
    let outcome = Pipeline::new(SourceFormat::Generic).process([
        "zeta.example.com",
        "||alpha.example.org^",
        "mid.example.net",
    ]);
    let domains: Vec<_> = outcome.records.iter().map(DomainRecord::domain).collect();
    let mut sorted = domains.clone();
    sorted.sort_unstable();
    assert_eq!(domains, sorted);
}
