//! Rule file rendering
//!
//! Pure text rendering of a final record set for each downstream tool.
//! Writing the files and running the rule compiler is left to the caller.

use crate::record::DomainRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

/// How a rule set renders the wildcard flag in mihomo output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputPolicy {
    /// Always the bare domain
    Plain,
    /// Always `+.domain`
    #[serde(alias = "force_wildcard")]
    ForceWildcard,
    /// `+.domain` only for wildcard records
    #[default]
    #[serde(alias = "respect_wildcard")]
    RespectWildcard,
}

impl OutputPolicy {
    /// Render one record under this policy
    pub fn render(self, record: &DomainRecord) -> String {
        let wildcard = match self {
            OutputPolicy::Plain => false,
            OutputPolicy::ForceWildcard => true,
            OutputPolicy::RespectWildcard => record.is_wildcard(),
        };
        if wildcard {
            format!("+.{}", record.domain())
        } else {
            record.domain().to_string()
        }
    }

    /// Configuration name
    pub fn as_str(self) -> &'static str {
        match self {
            OutputPolicy::Plain => "plain",
            OutputPolicy::ForceWildcard => "force-wildcard",
            OutputPolicy::RespectWildcard => "respect-wildcard",
        }
    }
}

impl fmt::Display for OutputPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Downstream tool a rule file is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// mihomo domain text rule-set, compiled to `.mrs` afterwards
    Mihomo,
    /// AdGuard Home `||domain^` filter list
    Adguard,
    /// mosdns plain domain list
    Mosdns,
}

impl Target {
    /// All targets
    pub const ALL: [Target; 3] = [Target::Mihomo, Target::Adguard, Target::Mosdns];

    /// Output sub-directory for this target
    pub fn dir(self) -> &'static str {
        match self {
            Target::Mihomo => "mihomo",
            Target::Adguard => "adg",
            Target::Mosdns => "mosdns-x",
        }
    }

    /// Path of the rendered text file, relative to the output directory
    pub fn text_path(self, rule_set: &str) -> PathBuf {
        let file = match self {
            Target::Adguard => format!("{rule_set}_adg.txt"),
            Target::Mihomo | Target::Mosdns => format!("{rule_set}.txt"),
        };
        PathBuf::from(self.dir()).join(file)
    }

    /// Path of the compiled binary rule-set, if this target has one
    pub fn compiled_path(self, rule_set: &str) -> Option<PathBuf> {
        match self {
            Target::Mihomo => Some(PathBuf::from(self.dir()).join(format!("{rule_set}.mrs"))),
            Target::Adguard | Target::Mosdns => None,
        }
    }

    /// Render one record for this target
    pub fn render(self, record: &DomainRecord, policy: OutputPolicy) -> String {
        match self {
            Target::Mihomo => policy.render(record),
            Target::Adguard => format!("||{}^", record.domain()),
            Target::Mosdns => record.domain().to_string(),
        }
    }

    /// Configuration name
    pub fn as_str(self) -> &'static str {
        match self {
            Target::Mihomo => "mihomo",
            Target::Adguard => "adguard",
            Target::Mosdns => "mosdns",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mihomo" | "clash" => Ok(Target::Mihomo),
            "adguard" | "adg" => Ok(Target::Adguard),
            "mosdns" | "mosdns-x" => Ok(Target::Mosdns),
            other => Err(format!(
                "unknown target '{other}' (expected mihomo, adguard or mosdns)"
            )),
        }
    }
}

/// Render a complete rule file.
///
/// Two header lines (`# Updated:` and `# Count:`) are followed by one
/// line per record in ascending domain order. `updated` is written as
/// given so callers control the clock.
///
/// ```
/// use domsift_core::output::{render, OutputPolicy, Target};
/// use domsift_core::DomainRecord;
///
/// let records = vec![DomainRecord::new("ads.example.com", true).unwrap()];
/// let text = render(&records, Target::Adguard, OutputPolicy::Plain, "2024-01-01 00:00:00");
/// assert_eq!(text, "# Updated: 2024-01-01 00:00:00\n# Count: 1\n||ads.example.com^\n");
/// ```
pub fn render(
    records: &[DomainRecord],
    target: Target,
    policy: OutputPolicy,
    updated: &str,
) -> String {
    let mut sorted: Vec<&DomainRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.domain().cmp(b.domain()));

    let mut out = String::with_capacity(64 + records.len() * 32);
    let _ = writeln!(out, "# Updated: {updated}");
    let _ = writeln!(out, "# Count: {}", sorted.len());
    for record in sorted {
        out.push_str(&target.render(record, policy));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(domain: &str, wildcard: bool) -> DomainRecord {
        DomainRecord::new(domain, wildcard).unwrap()
    }

    #[test]
    fn test_policies() {
        let wild = rec("example.com", true);
        let plain = rec("example.org", false);

        assert_eq!(OutputPolicy::Plain.render(&wild), "example.com");
        assert_eq!(OutputPolicy::ForceWildcard.render(&plain), "+.example.org");
        assert_eq!(OutputPolicy::RespectWildcard.render(&wild), "+.example.com");
        assert_eq!(OutputPolicy::RespectWildcard.render(&plain), "example.org");
    }

    #[test]
    fn test_targets_ignore_policy_except_mihomo() {
        let r = rec("ads.example.com", false);
        assert_eq!(Target::Adguard.render(&r, OutputPolicy::Plain), "||ads.example.com^");
        assert_eq!(Target::Mosdns.render(&r, OutputPolicy::ForceWildcard), "ads.example.com");
        assert_eq!(Target::Mihomo.render(&r, OutputPolicy::ForceWildcard), "+.ads.example.com");
    }

    #[test]
    fn test_paths() {
        assert_eq!(Target::Mihomo.text_path("ads"), PathBuf::from("mihomo/ads.txt"));
        assert_eq!(Target::Adguard.text_path("ads"), PathBuf::from("adg/ads_adg.txt"));
        assert_eq!(Target::Mosdns.text_path("ads"), PathBuf::from("mosdns-x/ads.txt"));
        assert_eq!(Target::Mihomo.compiled_path("ads"), Some(PathBuf::from("mihomo/ads.mrs")));
        assert_eq!(Target::Mosdns.compiled_path("ads"), None);
    }

    #[test]
    fn test_render_sorts_and_counts() {
        let text = render(
            &[rec("b.example.com", true), rec("a.example.com", false)],
            Target::Mihomo,
            OutputPolicy::RespectWildcard,
            "now",
        );
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["# Updated: now", "# Count: 2", "a.example.com", "+.b.example.com"]
        );
    }

    #[test]
    fn test_render_empty() {
        let text = render(&[], Target::Mosdns, OutputPolicy::Plain, "now");
        assert_eq!(text, "# Updated: now\n# Count: 0\n");
    }

    #[test]
    fn test_policy_serde_names() {
        #[derive(Deserialize)]
        struct Wrap {
            policy: OutputPolicy,
        }
        let w: Wrap = toml::from_str("policy = \"force-wildcard\"").unwrap();
        assert_eq!(w.policy, OutputPolicy::ForceWildcard);
        let w: Wrap = toml::from_str("policy = \"respect_wildcard\"").unwrap();
        assert_eq!(w.policy, OutputPolicy::RespectWildcard);
    }

    #[test]
    fn test_target_parse() {
        assert_eq!("ADG".parse::<Target>().unwrap(), Target::Adguard);
        assert!("bind".parse::<Target>().is_err());
        for t in Target::ALL {
            assert_eq!(t.as_str().parse::<Target>().unwrap(), t);
        }
    }
}
