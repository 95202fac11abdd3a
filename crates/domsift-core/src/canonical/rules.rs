//! The ordered rule table driving [`canonicalize`](super::canonicalize)
//!
//! Order matters: each row strips syntax the following rows must not see.

use super::{is_valid_domain, Draft, Flow, SourceFormat};

/// One `(predicate, transform)` row
pub(crate) struct Rule {
    /// Used in debug output and tests
    pub(crate) name: &'static str,
    pub(crate) applies: fn(&Draft) -> bool,
    pub(crate) apply: fn(&mut Draft) -> Flow,
}

/// Whole-line comment markers
const COMMENT_PREFIXES: &[&str] = &["#", "!", "@@"];

/// Inline comment / Adblock option markers; everything after is dropped
const INLINE_MARKERS: &[char] = &['#', '$'];

/// Hosts-file sink addresses
const HOSTS_PREFIXES: &[&str] = &["0.0.0.0", "127.0.0.1"];

/// Clash/Surge rule tags (lowercase) and the wildcard flag each implies.
/// `domain-keyword` is approximated as a suffix rule.
const RULE_TAGS: &[(&str, bool)] = &[
    ("domain-suffix,", true),
    ("domain-keyword,", true),
    ("domain,", false),
];

/// Lines in a fake-ip-filter YAML file that are structure, not entries
const FAKE_IP_STRUCTURE: &[&str] = &["dns:", "fake-ip-filter:"];

pub(crate) static RULES: &[Rule] = &[
    Rule {
        name: "trim",
        applies: always,
        apply: |d| {
            d.narrow(str::trim);
            Flow::Continue
        },
    },
    Rule {
        name: "fake-ip-structure",
        applies: |d| d.format == SourceFormat::FakeIpFilter,
        apply: |d| {
            if FAKE_IP_STRUCTURE.iter().any(|s| d.text.contains(s)) {
                return Flow::Skip;
            }
            d.narrow(|t| t.strip_prefix('-').unwrap_or(t).trim());
            d.text.retain(|c| c != '\'' && c != '"');
            Flow::Continue
        },
    },
    Rule {
        name: "comment-line",
        applies: always,
        apply: |d| {
            if d.text.is_empty() || COMMENT_PREFIXES.iter().any(|p| d.text.starts_with(p)) {
                Flow::Skip
            } else {
                Flow::Continue
            }
        },
    },
    Rule {
        name: "inline-comment",
        applies: |d| d.text.contains(INLINE_MARKERS),
        apply: |d| {
            if let Some(pos) = d.text.find(INLINE_MARKERS) {
                d.text.truncate(pos);
            }
            d.narrow(str::trim_end);
            Flow::Continue
        },
    },
    Rule {
        name: "plain-entry-probe",
        applies: |d| d.format == SourceFormat::ChinaDomainList,
        apply: |d| {
            d.plain_entry = !d.text.contains(',');
            Flow::Continue
        },
    },
    Rule {
        name: "hosts-entry",
        applies: |d| HOSTS_PREFIXES.iter().any(|p| d.text.starts_with(p)),
        apply: |d| match d.text.split_whitespace().nth(1) {
            Some(host) => {
                d.text = host.to_string();
                Flow::Continue
            }
            None => Flow::Skip,
        },
    },
    Rule {
        name: "adblock-anchor",
        applies: |d| d.text.starts_with("||"),
        apply: |d| {
            d.wildcard = true;
            d.narrow(|t| &t[2..]);
            Flow::Continue
        },
    },
    Rule {
        name: "adblock-separator",
        applies: |d| d.text.ends_with('^'),
        apply: |d| {
            d.text.pop();
            Flow::Continue
        },
    },
    Rule {
        name: "rule-tag",
        applies: |d| d.text.contains(','),
        apply: |d| {
            let tag = RULE_TAGS.iter().find(|(tag, _)| {
                d.text
                    .get(..tag.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(tag))
            });
            if let Some(&(tag, wildcard)) = tag {
                d.wildcard = wildcard;
                d.narrow(|t| t[tag.len()..].trim());
            }
            Flow::Continue
        },
    },
    Rule {
        name: "policy-fields",
        applies: |d| d.text.contains(','),
        apply: |d| {
            if let Some(pos) = d.text.find(',') {
                d.text.truncate(pos);
            }
            d.narrow(str::trim);
            Flow::Continue
        },
    },
    Rule {
        name: "leading-modifier",
        applies: |d| d.text.starts_with('.') || d.text.starts_with("+."),
        apply: |d| {
            d.wildcard = true;
            d.narrow(|t| t.strip_prefix("+.").or_else(|| t.strip_prefix('.')).unwrap_or(t));
            Flow::Continue
        },
    },
    Rule {
        name: "trailing-dot",
        applies: |d| d.text.ends_with('.'),
        apply: |d| {
            d.narrow(|t| t.trim_end_matches('.'));
            Flow::Continue
        },
    },
    Rule {
        name: "plain-entry-wildcard",
        applies: |d| d.plain_entry,
        apply: |d| {
            d.wildcard = true;
            Flow::Continue
        },
    },
    Rule {
        name: "lowercase",
        applies: always,
        apply: |d| {
            if d.text.chars().any(char::is_uppercase) {
                d.text = d.text.to_lowercase();
            }
            Flow::Continue
        },
    },
    Rule {
        name: "validity",
        applies: always,
        apply: |d| {
            if is_valid_domain(&d.text) {
                Flow::Continue
            } else {
                Flow::Skip
            }
        },
    },
];

fn always(_: &Draft) -> bool {
    true
}
