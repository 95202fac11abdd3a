//! Configuration management for domsift
//!
//! A TOML file with one `[settings]` table and any number of
//! `[[rule_sets]]` entries.

mod rule_set;

pub use rule_set::{RuleSet, RuleSetKind};

use crate::canonical::SourceFormat;
use crate::error::{Error, Result};
use crate::liveness::{ResolverPool, DEFAULT_CONCURRENCY};
use crate::output::{OutputPolicy, Target};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global settings
    pub settings: Settings,

    /// Rule sets, processed in order
    pub rule_sets: Vec<RuleSet>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| Error::ConfigNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(Error::from)
    }

    /// Find a rule set by name
    pub fn rule_set(&self, name: &str) -> Option<&RuleSet> {
        self.rule_sets.iter().find(|r| r.name == name)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;

        let mut names = HashSet::new();
        for (index, set) in self.rule_sets.iter().enumerate() {
            set.validate(index)?;
            if !names.insert(set.name.as_str()) {
                return Err(Error::config_value(
                    format!("rule_sets[{index}].name"),
                    format!("Duplicate rule set name '{}'", set.name),
                ));
            }
        }

        Ok(())
    }

    /// Starter configuration written by `config generate`
    pub fn example() -> Self {
        let mut ads = RuleSet::new("Reject_merged");
        ads.kind = RuleSetKind::Reject;
        ads.output_policy = OutputPolicy::RespectWildcard;
        ads.targets = Target::ALL.to_vec();
        ads.sources = vec![
            "https://adguardteam.github.io/HostlistsRegistry/assets/filter_1.txt".to_string(),
            "https://raw.githubusercontent.com/Cats-Team/AdRules/main/adrules_domainset.txt"
                .to_string(),
        ];
        ads.allowlists = vec![
            "https://raw.githubusercontent.com/AdguardTeam/AdGuardSDNSFilter/master/Filters/exceptions.txt"
                .to_string(),
        ];
        ads.local_allowlists = vec![PathBuf::from("allowlist.txt")];

        let mut fake_ip = RuleSet::new("Fake_IP_Filter_merged");
        fake_ip.kind = RuleSetKind::Direct;
        fake_ip.format = SourceFormat::FakeIpFilter;
        fake_ip.sources = vec![
            "https://ruleset.skk.moe/Internal/clash_fake_ip_filter.yaml".to_string(),
        ];

        let mut cn = RuleSet::new("CN_merged");
        cn.kind = RuleSetKind::Direct;
        cn.format = SourceFormat::ChinaDomainList;
        cn.output_policy = OutputPolicy::ForceWildcard;
        cn.sources = vec!["https://ruleset.skk.moe/Clash/non_ip/domestic.txt".to_string()];

        Self {
            settings: Settings {
                dns_check: true,
                dns_servers: vec!["223.5.5.5".to_string(), "119.29.29.29:53".to_string()],
                ..Settings::default()
            },
            rule_sets: vec![ads, fake_ip, cn],
        }
    }
}

/// Global `[settings]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root directory for rendered rule files
    pub output_dir: PathBuf,
    /// Rule compiler executable used for mihomo `.mrs` output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler_bin: Option<PathBuf>,
    /// Prune reject rules whose domain no longer resolves
    pub dns_check: bool,
    /// DNS endpoints for the liveness check (`ip` or `ip:port`)
    pub dns_servers: Vec<String>,
    /// Domains checked concurrently
    pub concurrency: usize,
    /// Per-attempt DNS timeout in milliseconds
    pub attempt_timeout_ms: u64,
    /// Sources downloaded concurrently
    pub download_concurrency: usize,
    /// Per-download timeout in seconds
    pub download_timeout_secs: u64,
    /// User-Agent sent with downloads
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("rules"),
            compiler_bin: Some(PathBuf::from("mihomo")),
            dns_check: false,
            dns_servers: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            attempt_timeout_ms: 3000,
            download_concurrency: 8,
            download_timeout_secs: 30,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

impl Settings {
    /// Validate the settings table
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::config_value("settings.output_dir", "Must not be empty"));
        }
        let positive = [
            ("settings.concurrency", self.concurrency as u64),
            ("settings.attempt_timeout_ms", self.attempt_timeout_ms),
            ("settings.download_concurrency", self.download_concurrency as u64),
            ("settings.download_timeout_secs", self.download_timeout_secs),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(Error::config_value(key, "Must be greater than 0"));
            }
        }
        self.resolver_pool()?;
        Ok(())
    }

    /// Parsed DNS endpoints; empty falls back to the public default
    pub fn resolver_pool(&self) -> Result<ResolverPool> {
        ResolverPool::parse(&self.dns_servers)
            .map_err(|e| Error::config_value("settings.dns_servers", e.to_string()))
    }

    /// Per-attempt DNS timeout
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Per-download timeout
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.settings.output_dir, PathBuf::from("rules"));
        assert!(!config.settings.dns_check);
        assert!(config.rule_sets.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_example_round_trip() {
        let config = Config::example();
        config.validate().unwrap();

        let text = config.to_toml().unwrap();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.rule_sets, config.rule_sets);
        assert_eq!(parsed.settings, config.settings);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut config = Config::default();
        config.settings.concurrency = 0;
        match config.validate() {
            Err(Error::ConfigValue { key, .. }) => assert_eq!(key, "settings.concurrency"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_bad_dns_server_rejected() {
        let mut config = Config::default();
        config.settings.dns_servers = vec!["dns.google".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let config = Config {
            rule_sets: vec![RuleSet::new("ads"), RuleSet::new("ads")],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_durations() {
        let settings = Settings::default();
        assert_eq!(settings.attempt_timeout(), Duration::from_secs(3));
        assert_eq!(settings.download_timeout(), Duration::from_secs(30));
    }
}
