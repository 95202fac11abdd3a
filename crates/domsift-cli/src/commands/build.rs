//! Build command - produce every configured rule set

use crate::commands::config::load_config;
use crate::emit::Emitter;
use crate::fetch::{read_local, Fetcher};
use anyhow::{bail, Context, Result};
use clap::Args;
use domsift_core::config::{RuleSet, Settings};
use domsift_core::{AllowList, Config, HickoryProbe, LivenessFilter, Outcome, Stats};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Build command arguments
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Configuration file (default: detect)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only build the named rule set (repeatable)
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,

    /// Skip the DNS liveness check
    #[arg(long)]
    pub no_dns_check: bool,

    /// Override the output directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run every stage but write no files
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the build command
pub fn execute(args: BuildArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(dir) = args.output_dir {
        config.settings.output_dir = dir;
    }
    if args.no_dns_check {
        config.settings.dns_check = false;
    }
    config.validate().context("Configuration validation failed")?;

    let selected = select(&config, &args.only)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(build_all(&config.settings, &selected, args.dry_run))
}

fn select<'a>(config: &'a Config, only: &[String]) -> Result<Vec<&'a RuleSet>> {
    if only.is_empty() {
        return Ok(config.rule_sets.iter().collect());
    }

    only.iter()
        .map(|name| match config.rule_set(name) {
            Some(set) => Ok(set),
            None => bail!("Unknown rule set '{name}'"),
        })
        .collect()
}

async fn build_all(settings: &Settings, sets: &[&RuleSet], dry_run: bool) -> Result<()> {
    let started = Instant::now();
    let fetcher = Fetcher::new(settings)?;

    let liveness = if settings.dns_check && sets.iter().any(|s| s.kind.checks_liveness()) {
        let pool = settings.resolver_pool()?;
        info!(resolvers = %pool, "DNS liveness check enabled");
        Some(LivenessFilter::hickory(pool, settings.attempt_timeout()).concurrency(settings.concurrency))
    } else {
        info!("DNS liveness check disabled");
        None
    };

    let emitter = Emitter::new(settings, dry_run);
    emitter.prepare()?;

    let updated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut totals = Stats::default();

    for set in sets {
        let outcome = build_rule_set(&fetcher, set, liveness.as_ref()).await;
        info!(rule_set = %set.name, "{}", outcome.stats);

        emitter
            .emit(set, &outcome.records, &updated)
            .with_context(|| format!("Failed to write rule set '{}'", set.name))?;
        totals += outcome.stats;
    }

    info!(
        rule_sets = sets.len(),
        emitted = totals.emitted,
        removed = totals.records_removed(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Build complete"
    );
    Ok(())
}

#[instrument(skip_all, fields(rule_set = %set.name, kind = %set.kind))]
async fn build_rule_set(
    fetcher: &Fetcher,
    set: &RuleSet,
    liveness: Option<&LivenessFilter<HickoryProbe>>,
) -> Outcome {
    let mut allow = AllowList::new();
    for line in fetcher.collect(&set.allowlists).await {
        allow.ingest(&line);
    }
    for path in &set.local_allowlists {
        let lines = read_local(path).await;
        if lines.is_empty() {
            warn!(path = %path.display(), "Local allow-list is empty or missing");
        }
        for line in lines {
            allow.ingest(&line);
        }
    }
    if set.has_allowlists() {
        info!(entries = allow.len(), "Allow-list loaded");
    }

    let lines = fetcher.collect(&set.sources).await;
    let outcome = set.pipeline(allow).process(&lines);

    match liveness {
        Some(filter) if set.kind.checks_liveness() => outcome.verify_liveness(filter).await,
        _ => outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_all_by_default() {
        let config = Config::example();
        assert_eq!(select(&config, &[]).unwrap().len(), config.rule_sets.len());
    }

    #[test]
    fn test_select_unknown_name_fails() {
        let config = Config::example();
        let err = select(&config, &["missing".to_string()]).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_select_keeps_requested_order() {
        let config = Config::example();
        let names: Vec<String> = config.rule_sets.iter().rev().map(|s| s.name.clone()).collect();
        let picked: Vec<_> = select(&config, &names)
            .unwrap()
            .into_iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(picked, names);
    }
}
