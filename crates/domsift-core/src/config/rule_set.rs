//! Rule set definitions
//!
//! A rule set is one output file family: its sources, allow-lists, the
//! format hint for parsing and how records are rendered.

use crate::canonical::SourceFormat;
use crate::error::{Error, Result};
use crate::filter::AllowList;
use crate::output::{OutputPolicy, Target};
use crate::pipeline::Pipeline;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// What the rules of a set are used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetKind {
    /// Blocked domains; the only kind that gets a liveness check
    #[default]
    Reject,
    /// Domains routed directly
    Direct,
    /// Domains routed through a proxy
    Proxy,
}

impl RuleSetKind {
    /// Whether dead domains should be pruned from this kind of set
    pub fn checks_liveness(self) -> bool {
        matches!(self, RuleSetKind::Reject)
    }
}

impl fmt::Display for RuleSetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSetKind::Reject => f.write_str("reject"),
            RuleSetKind::Direct => f.write_str("direct"),
            RuleSetKind::Proxy => f.write_str("proxy"),
        }
    }
}

/// One `[[rule_sets]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// File stem for every rendered output
    pub name: String,
    /// Purpose of the set
    pub kind: RuleSetKind,
    /// Parsing hint for the sources
    pub format: SourceFormat,
    /// Wildcard rendering for mihomo output
    pub output_policy: OutputPolicy,
    /// Tools to render for
    pub targets: Vec<Target>,
    /// Block-list URLs or local paths
    pub sources: Vec<String>,
    /// Allow-list URLs or local paths
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowlists: Vec<String>,
    /// Allow-list files read from disk
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub local_allowlists: Vec<PathBuf>,
    /// Raw lines containing any of these are skipped
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_keywords: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: RuleSetKind::default(),
            format: SourceFormat::default(),
            output_policy: OutputPolicy::default(),
            targets: vec![Target::Mihomo],
            sources: Vec::new(),
            allowlists: Vec::new(),
            local_allowlists: Vec::new(),
            exclude_keywords: Vec::new(),
        }
    }
}

impl RuleSet {
    /// Create a reject set with the given name and defaults otherwise
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether this set has any allow-list input
    pub fn has_allowlists(&self) -> bool {
        !self.allowlists.is_empty() || !self.local_allowlists.is_empty()
    }

    /// Build the processing pipeline for this set
    pub fn pipeline(&self, allow: AllowList) -> Pipeline {
        Pipeline::new(self.format)
            .with_allow_list(allow)
            .force_wildcard(self.output_policy == OutputPolicy::ForceWildcard)
            .exclude_keywords(&self.exclude_keywords)
    }

    /// Validate this entry; `index` is its position in `rule_sets`
    pub fn validate(&self, index: usize) -> Result<()> {
        let key = |field: &str| format!("rule_sets[{index}].{field}");

        if self.name.trim().is_empty() {
            return Err(Error::config_value(key("name"), "Must not be empty"));
        }
        if self.name.contains(&['/', '\\'][..]) || self.name == "." || self.name == ".." {
            return Err(Error::config_value(
                key("name"),
                format!("'{}' is not usable as a file name", self.name),
            ));
        }
        if self.targets.is_empty() {
            return Err(Error::config_value(
                key("targets"),
                "At least one of mihomo, adguard or mosdns is required",
            ));
        }
        if let Some(source) = self.sources.iter().find(|s| s.trim().is_empty()) {
            return Err(Error::config_value(
                key("sources"),
                format!("Empty source entry '{source}'"),
            ));
        }
        Ok(())
    }
}
