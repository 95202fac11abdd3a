//! Stage orchestration
//!
//! [`Pipeline::process`] runs the synchronous stages over one rule set's
//! raw lines: canonicalize, drop exact duplicates, resolve allow-list
//! conflicts, collapse covered records. Each stage sees the complete
//! output of the previous one. The optional liveness stage is async and
//! runs afterwards through [`Outcome::verify_liveness`].

mod stats;

pub use stats::Stats;

use crate::canonical::{canonicalize, SourceFormat};
use crate::filter::{collapse_covered, resolve_conflicts, AllowList};
use crate::liveness::{LivenessFilter, Probe};
use crate::record::{DomainRecord, RecordDeduplicator};
use tracing::{debug, info, instrument};

/// Configured stage chain for one rule set
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    format: SourceFormat,
    allow: AllowList,
    force_wildcard: bool,
    exclude_keywords: Vec<String>,
}

/// Records surviving the pipeline plus what each stage removed
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    /// Final records, sorted by domain
    pub records: Vec<DomainRecord>,
    /// Per-stage counters
    pub stats: Stats,
}

impl Pipeline {
    /// Create a pipeline for lines of the given format
    pub fn new(format: SourceFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Use `allow` for conflict resolution
    #[must_use]
    pub fn with_allow_list(mut self, allow: AllowList) -> Self {
        self.allow = allow;
        self
    }

    /// Mark every parsed record as a wildcard before deduplication
    #[must_use]
    pub fn force_wildcard(mut self, enabled: bool) -> Self {
        self.force_wildcard = enabled;
        self
    }

    /// Skip raw lines containing any of `keywords` (case-insensitive)
    #[must_use]
    pub fn exclude_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }

    /// The allow-list in use
    pub fn allow_list(&self) -> &AllowList {
        &self.allow
    }

    /// The source format in use
    pub fn format(&self) -> SourceFormat {
        self.format
    }

    fn is_excluded(&self, line: &str) -> bool {
        if self.exclude_keywords.is_empty() {
            return false;
        }
        let lower = line.to_lowercase();
        self.exclude_keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// Run every synchronous stage over `lines`
    #[instrument(skip_all, fields(format = %self.format))]
    pub fn process<I, S>(&self, lines: I) -> Outcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = Stats::default();
        let mut dedup = RecordDeduplicator::new();

        for line in lines {
            let line = line.as_ref();
            stats.lines_read += 1;

            if self.is_excluded(line) {
                stats.lines_skipped += 1;
                continue;
            }
            let Some(mut record) = canonicalize(line, self.format) else {
                stats.lines_skipped += 1;
                continue;
            };
            if self.force_wildcard {
                record = record.with_wildcard(true);
            }
            if !dedup.insert(record) {
                stats.duplicates_removed += 1;
            }
        }
        debug!(unique = dedup.len(), "Canonicalized");

        let records = dedup.into_records();
        let before = records.len();
        let records = resolve_conflicts(records, &self.allow);
        stats.conflicts_removed = before - records.len();

        let before = records.len();
        let records = collapse_covered(records);
        stats.covered_removed = before - records.len();
        stats.emitted = records.len();

        info!(
            lines = stats.lines_read,
            skipped = stats.lines_skipped,
            duplicates = stats.duplicates_removed,
            conflicts = stats.conflicts_removed,
            covered = stats.covered_removed,
            emitted = stats.emitted,
            "Pipeline stages complete"
        );

        Outcome { records, stats }
    }
}

impl Outcome {
    /// Drop records that do not resolve, updating the counters
    pub async fn verify_liveness<P: Probe>(self, filter: &LivenessFilter<P>) -> Self {
        let Outcome { records, mut stats } = self;
        let before = records.len();
        let records = filter.filter(records).await;

        stats.dead_removed = before - records.len();
        stats.emitted = records.len();
        Outcome { records, stats }
    }
}
