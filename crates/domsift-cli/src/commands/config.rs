//! Config command - configuration management

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use domsift_core::Config;
use std::path::{Path, PathBuf};
use tracing::info;

/// File names searched in the working directory, in order
const LOCAL_CANDIDATES: &[&str] = &["domsift.toml", "config.toml"];

/// Config command arguments
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Config file to show (default: detect)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Generate a starter configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "domsift.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Config file to validate
        file: PathBuf,
    },

    /// Show config file locations
    Paths,
}

/// Execute config command
pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show { file } => show_config(file),
        ConfigAction::Generate { output, force } => generate_config(&output, force),
        ConfigAction::Validate { file } => validate_config(&file),
        ConfigAction::Paths => {
            show_paths();
            Ok(())
        }
    }
}

/// Load the explicit config file, or the first one found on the search path
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match find_config_file() {
            Some(path) => path,
            None => bail!("No configuration file found; create one with `domsift config generate`"),
        },
    };

    let config = Config::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    info!(path = %path.display(), rule_sets = config.rule_sets.len(), "Loaded configuration");
    Ok(config)
}

fn show_config(file: Option<PathBuf>) -> Result<()> {
    let config = match file.or_else(find_config_file) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            info!("No configuration file found, showing the example configuration");
            Config::example()
        }
    };

    let toml_str = config.to_toml().context("Failed to serialize config")?;
    println!("{toml_str}");
    Ok(())
}

fn generate_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", output.display());
    }

    let toml_str = Config::example()
        .to_toml()
        .context("Failed to serialize config")?;

    let content = format!(
        "# domsift configuration\n\
         # kind: reject | direct | proxy (only reject sets are DNS-checked)\n\
         # format: generic | fake-ip-filter | china-domain-list\n\
         # output_policy: plain | force-wildcard | respect-wildcard\n\
         # targets: mihomo | adguard | mosdns\n\n\
         {toml_str}"
    );

    std::fs::write(output, content)
        .with_context(|| format!("Failed to write config to {}", output.display()))?;

    info!(path = %output.display(), "Generated config file");
    println!("Configuration file generated: {}", output.display());

    Ok(())
}

fn validate_config(file: &Path) -> Result<()> {
    let config = Config::load(file)
        .with_context(|| format!("Failed to load config from {}", file.display()))?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("✓ Configuration is valid");
    println!("  Output directory: {}", config.settings.output_dir.display());
    println!("  DNS check: {}", config.settings.dns_check);
    println!("  Rule sets: {}", config.rule_sets.len());
    for set in &config.rule_sets {
        let targets: Vec<_> = set.targets.iter().map(ToString::to_string).collect();
        println!(
            "    - {} ({}, {}, {} sources -> {})",
            set.name,
            set.kind,
            set.format,
            set.sources.len(),
            targets.join(", ")
        );
    }

    Ok(())
}

fn show_paths() {
    println!("Configuration file search paths:");
    println!();

    for (i, name) in LOCAL_CANDIDATES.iter().enumerate() {
        println!("  {}. ./{}", i + 1, name);
    }

    if let Some(path) = user_config_path() {
        println!("  {}. {}", LOCAL_CANDIDATES.len() + 1, path.display());
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "domsift")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn find_config_file() -> Option<PathBuf> {
    LOCAL_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .chain(user_config_path())
        .find(|path| path.exists())
}
