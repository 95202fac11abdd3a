//! # domsift Core
//!
//! Turns heterogeneous domain block/allow lists into a canonical,
//! deduplicated and optionally DNS-verified rule set.
//!
//! ## Architecture
//!
//! ```text
//! raw lines ─► canonical ─► record::RecordDeduplicator ─► filter::resolve_conflicts
//!                                                              │
//!            output::render ◄─ liveness::LivenessFilter ◄─ filter::collapse_covered
//! ```
//!
//! - **canonical** - one raw line into a `(domain, wildcard)` record
//! - **record** - the record type and exact-duplicate removal
//! - **filter** - allow-list conflicts and wildcard-ancestor coverage
//! - **liveness** - concurrent DNS verification over a resolver pool
//! - **pipeline** - runs the stages in order and counts what each one drops
//! - **config** / **output** - TOML rule-set definitions and file rendering
//!
//! ## Example
//!
//! ```rust
//! use domsift_core::{AllowList, Pipeline, SourceFormat};
//!
//! let mut allow = AllowList::new();
//! allow.ingest("good.example.com");
//!
//! let pipeline = Pipeline::new(SourceFormat::Generic).with_allow_list(allow);
//! let outcome = pipeline.process(["||ads.example.org^", "0.0.0.0 x.ads.example.org"]);
//!
//! assert_eq!(outcome.records.len(), 1);
//! assert_eq!(outcome.records[0].domain(), "ads.example.org");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canonical;
pub mod config;
pub mod error;
pub mod filter;
pub mod liveness;
pub mod output;
pub mod pipeline;
pub mod record;

// Re-exports for convenience
pub use canonical::{canonicalize, SourceFormat};
pub use config::Config;
pub use error::{Error, Result};
pub use filter::{collapse_covered, resolve_conflicts, AllowList};
pub use liveness::{HickoryProbe, LivenessFilter, Probe, ResolverPool};
pub use pipeline::{Outcome, Pipeline, Stats};
pub use record::{DomainRecord, RecordDeduplicator};
