//! CLI commands

pub mod build;
pub mod check;
pub mod completions;
pub mod config;

use clap::Subcommand;

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every configured rule set (main command)
    Build(build::BuildArgs),

    /// Configuration management
    Config(config::ConfigArgs),

    /// Inspect how single lines or domains are handled
    Check(check::CheckArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
