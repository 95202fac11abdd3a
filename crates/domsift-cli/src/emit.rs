//! Rule file emission and rule compiler invocation

use anyhow::{Context, Result};
use domsift_core::config::{RuleSet, Settings};
use domsift_core::output::{render, Target};
use domsift_core::DomainRecord;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, instrument, warn};

/// Writes rendered rule files below the output directory
#[derive(Debug, Clone)]
pub struct Emitter {
    output_dir: PathBuf,
    compiler: Option<PathBuf>,
    dry_run: bool,
}

impl Emitter {
    /// Create an emitter from the settings
    pub fn new(settings: &Settings, dry_run: bool) -> Self {
        Self {
            output_dir: settings.output_dir.clone(),
            compiler: settings.compiler_bin.clone(),
            dry_run,
        }
    }

    /// Create every target directory up front
    pub fn prepare(&self) -> Result<()> {
        if self.dry_run {
            return Ok(());
        }
        for target in Target::ALL {
            let dir = self.output_dir.join(target.dir());
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Render and write `records` for every target of `set`.
    ///
    /// Returns the text files written (none in dry-run mode).
    #[instrument(skip_all, fields(rule_set = %set.name))]
    pub fn emit(&self, set: &RuleSet, records: &[DomainRecord], updated: &str) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(set.targets.len());

        for &target in &set.targets {
            let path = self.output_dir.join(target.text_path(&set.name));
            if self.dry_run {
                info!(%target, path = %path.display(), count = records.len(), "Dry run, not writing");
                continue;
            }

            let text = render(records, target, set.output_policy, updated);
            std::fs::write(&path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(%target, path = %path.display(), count = records.len(), "Wrote rule file");

            if let Some(compiled) = target.compiled_path(&set.name) {
                self.compile(&path, &self.output_dir.join(compiled));
            }
            written.push(path);
        }

        Ok(written)
    }

    /// Run `<compiler> convert-ruleset domain text <txt> <mrs>`; failures only warn
    fn compile(&self, text: &Path, binary: &Path) {
        let Some(ref compiler) = self.compiler else {
            debug!("No rule compiler configured");
            return;
        };

        let result = Command::new(compiler)
            .args(["convert-ruleset", "domain", "text"])
            .arg(text)
            .arg(binary)
            .output();

        match result {
            Ok(output) if output.status.success() => {
                info!(path = %binary.display(), "Compiled rule set");
            }
            Ok(output) => {
                warn!(
                    compiler = %compiler.display(),
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "Rule compiler failed"
                );
            }
            Err(e) => {
                warn!(compiler = %compiler.display(), error = %e, "Cannot run rule compiler");
            }
        }
    }
}
