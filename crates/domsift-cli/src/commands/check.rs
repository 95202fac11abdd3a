//! Check command - inspect single lines and domains

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use domsift_core::{canonicalize, DomainRecord, LivenessFilter, ResolverPool, SourceFormat};
use std::time::Duration;

/// Check command arguments
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(subcommand)]
    pub action: CheckAction,
}

/// Check subcommands
#[derive(Subcommand, Debug)]
pub enum CheckAction {
    /// Show the record a raw list line canonicalizes to
    Line {
        /// The raw line, quoted
        #[arg(allow_hyphen_values = true)]
        line: String,

        /// Source format hint
        #[arg(short, long, default_value = "generic")]
        format: SourceFormat,
    },

    /// Check whether domains currently resolve
    Dns {
        /// Domains to look up
        #[arg(required = true)]
        domains: Vec<String>,

        /// Resolver endpoint, `ip` or `ip:port` (repeatable)
        #[arg(short, long = "server", value_name = "ENDPOINT")]
        servers: Vec<String>,

        /// Per-attempt timeout in milliseconds
        #[arg(long, default_value_t = 3000)]
        timeout_ms: u64,
    },
}

/// Execute check command
pub fn execute(args: CheckArgs) -> Result<()> {
    match args.action {
        CheckAction::Line { line, format } => {
            check_line(&line, format);
            Ok(())
        }
        CheckAction::Dns {
            domains,
            servers,
            timeout_ms,
        } => check_dns(&domains, &servers, Duration::from_millis(timeout_ms)),
    }
}

fn check_line(line: &str, format: SourceFormat) {
    match canonicalize(line, format) {
        Some(record) => println!("{record}"),
        None => println!("skip"),
    }
}

fn check_dns(domains: &[String], servers: &[String], timeout: Duration) -> Result<()> {
    let records = domains
        .iter()
        .map(|d| {
            DomainRecord::new(d.as_str(), false)
                .with_context(|| format!("'{d}' is not a valid domain"))
        })
        .collect::<Result<Vec<_>>>()?;

    // No --server falls back to the public default resolver
    let pool = ResolverPool::parse(servers).context("Invalid --server value")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(async {
        let filter = LivenessFilter::hickory(pool, timeout);
        for record in &records {
            let state = if filter.is_alive(record.domain()).await {
                "alive"
            } else {
                "dead"
            };
            println!("{}\t{state}", record.domain());
        }
    });

    Ok(())
}
