//! domsift CLI
//!
//! Builds canonical domain rule files from block and allow lists.

mod args;
mod commands;
mod emit;
mod fetch;
mod logging;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use args::Args;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init(&args)?;

    if args.shows_banner() {
        print_banner();
    }

    let result = run(args);

    if let Err(ref e) = result {
        error!("Fatal error: {:#}", e);
    }

    result
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Some(commands::Command::Build(build_args)) => commands::build::execute(build_args),
        Some(commands::Command::Config(config_args)) => commands::config::execute(config_args),
        Some(commands::Command::Check(check_args)) => commands::check::execute(check_args),
        Some(commands::Command::Completions(comp_args)) => {
            commands::completions::execute(comp_args)
        }
        None => commands::build::execute(commands::build::BuildArgs::default()),
    }
}

fn print_banner() {
    use colored::Colorize;

    let title = format!("domsift v{}", env!("CARGO_PKG_VERSION"));
    let subtitle = "Domain rule-set builder";

    println!();
    println!("{}", "╔═══════════════════════════════════════════════════════╗".cyan());
    println!(
        "{}{}{}",
        "║  ".cyan(),
        format!("{title:<53}").green().bold(),
        "║".cyan()
    );
    println!(
        "{}{}{}",
        "║  ".cyan(),
        format!("{subtitle:<53}").white(),
        "║".cyan()
    );
    println!("{}", "╚═══════════════════════════════════════════════════════╝".cyan());
    println!();
}
