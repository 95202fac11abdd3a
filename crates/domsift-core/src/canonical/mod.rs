//! Line canonicalization
//!
//! Turns one raw line from a hosts file, Adblock list, Clash/Surge rule
//! list or plain domain list into an optional [`DomainRecord`].
//!
//! Parsing is a fixed, ordered table of `(applies, apply)` rules (see
//! [`rules`]); every rule strips one piece of syntax before the next one
//! runs. Supporting a new source format means adding rows to the table.
//! Unparseable input is `None`, never an error.

mod rules;
mod validate;

pub use validate::is_valid_domain;

use crate::record::DomainRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Which family of list a line came from
///
/// Most syntax is recognised regardless of the format; the format only
/// switches on the few rules that would misfire on other lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Hosts files, Adblock anchors, Clash/Surge rules, plain lists
    #[default]
    Generic,
    /// YAML `fake-ip-filter:` list items (`- '+.lan'`)
    FakeIpFilter,
    /// China domain lists: plain lines mean wildcard, comma lines are rules
    ChinaDomainList,
}

impl SourceFormat {
    /// All known formats
    pub const ALL: [SourceFormat; 3] = [
        SourceFormat::Generic,
        SourceFormat::FakeIpFilter,
        SourceFormat::ChinaDomainList,
    ];

    /// Configuration name of the format
    pub fn as_str(self) -> &'static str {
        match self {
            SourceFormat::Generic => "generic",
            SourceFormat::FakeIpFilter => "fake-ip-filter",
            SourceFormat::ChinaDomainList => "china-domain-list",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generic" | "default" => Ok(SourceFormat::Generic),
            "fake-ip-filter" | "fakeip" | "fake-ip" => Ok(SourceFormat::FakeIpFilter),
            "china-domain-list" | "cn" | "china" => Ok(SourceFormat::ChinaDomainList),
            other => Err(format!(
                "unknown source format '{other}' (expected generic, fake-ip-filter or china-domain-list)"
            )),
        }
    }
}

/// Working state threaded through the rule table
#[derive(Debug)]
pub(crate) struct Draft {
    pub(crate) text: String,
    pub(crate) wildcard: bool,
    pub(crate) format: SourceFormat,
    /// Set for china-domain-list lines without a comma
    pub(crate) plain_entry: bool,
}

impl Draft {
    fn new(line: &str, format: SourceFormat) -> Self {
        Self {
            text: line.to_string(),
            wildcard: false,
            format,
            plain_entry: false,
        }
    }

    /// Replace the text with a sub-slice chosen by `pick`
    pub(crate) fn narrow(&mut self, pick: impl FnOnce(&str) -> &str) {
        let narrowed = pick(&self.text);
        if narrowed.len() != self.text.len() {
            self.text = narrowed.to_string();
        }
    }
}

/// Outcome of a single rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Skip,
}

/// Canonicalize one raw line.
///
/// Returns `None` for comments, blank lines, IP literals, paths and
/// anything else that does not end up as a plausible domain.
///
/// ```
/// use domsift_core::{canonicalize, SourceFormat};
///
/// let rec = canonicalize("||ads.example.com^", SourceFormat::Generic).unwrap();
/// assert_eq!(rec.domain(), "ads.example.com");
/// assert!(rec.is_wildcard());
///
/// assert!(canonicalize("192.168.1.1", SourceFormat::Generic).is_none());
/// ```
pub fn canonicalize(line: &str, format: SourceFormat) -> Option<DomainRecord> {
    let mut draft = Draft::new(line, format);

    for rule in rules::RULES {
        if !(rule.applies)(&draft) {
            continue;
        }
        if (rule.apply)(&mut draft) == Flow::Skip {
            trace!(rule = rule.name, line, "Line skipped");
            return None;
        }
    }

    Some(DomainRecord::from_canonical(draft.text, draft.wildcard))
}
