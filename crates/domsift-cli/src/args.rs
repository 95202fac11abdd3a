//! Command-line argument parsing

use crate::commands::Command;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// domsift - domain rule-set builder
///
/// Downloads block and allow lists, canonicalizes every line into a
/// domain rule, removes duplicates, allow-listed and covered entries,
/// optionally prunes domains that no longer resolve, and writes rule
/// files for mihomo, AdGuard Home and mosdns.
#[derive(Parser, Debug)]
#[command(name = "domsift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Subcommand to execute (default: build)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format for logs
    #[arg(long, value_enum, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Also write logs to this file
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// Compact format
    Compact,
}

impl Args {
    /// The banner is only shown for builds, never for machine-readable output
    pub fn shows_banner(&self) -> bool {
        !self.quiet && matches!(self.command, None | Some(Command::Build(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose() {
        let args = Args::parse_from(["domsift", "-v"]);
        assert_eq!(args.verbose, 1);

        let args = Args::parse_from(["domsift", "-vvv", "build"]);
        assert_eq!(args.verbose, 3);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["domsift", "check", "line", "example.com", "-q"]);
        assert!(args.quiet);
        assert!(!args.shows_banner());
    }

    #[test]
    fn test_default_command_shows_banner() {
        let args = Args::parse_from(["domsift"]);
        assert!(args.command.is_none());
        assert!(args.shows_banner());
        assert_eq!(args.log_format, LogFormat::Text);
    }

    #[test]
    fn test_build_flags() {
        let args = Args::parse_from([
            "domsift",
            "build",
            "-c",
            "rules.toml",
            "--only",
            "ads",
            "--only",
            "cn",
            "--no-dns-check",
            "--dry-run",
        ]);
        match args.command {
            Some(Command::Build(build)) => {
                assert_eq!(build.config, Some(PathBuf::from("rules.toml")));
                assert_eq!(build.only, vec!["ads", "cn"]);
                assert!(build.no_dns_check);
                assert!(build.dry_run);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
