//! Shadow tree materialization for media-mirror.
//!
//! This crate walks a shadow tree, turns every shadow entry into a
//! [`Record`], and persists freshly built records over their pointers.
//!
//! # Overview
//!
//! The main entry point is [`Mirror`], which combines:
//!
//! - [`EntryWalker`]: shadow entry discovery and kind classification
//! - [`RecordBuilder`]: grammar extraction and cross-validation
//! - [`Materializer`]: the pointer / persisted record protocol
//! - [`RunStats`]: atomic run counters
//!
//! [`ConsistencyChecker`] and [`FrequencyTable`] work on the records a run
//! returns.
//!
//! # Example
//!
//! ```no_run
//! use mm_core::MirrorConfig;
//! use mm_shadow::Mirror;
//!
//! let config = MirrorConfig {
//!     root: "/srv/mirror".into(),
//!     ..MirrorConfig::default()
//! };
//! let report = Mirror::new(config)?.run()?;
//!
//! println!("{} records, {} errors", report.records.len(), report.errors.len());
//! # Ok::<(), mm_shadow::ScanError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! Mirror::run (single pass, sequential)
//!     │
//!     ├── EntryWalker (collect + classify entries; unknown kind aborts)
//!     │
//!     └── Materializer (per entry)
//!             │
//!             ├── pointer   → RecordBuilder → persist
//!             └── persisted → parse <Media> document
//! ```

mod builder;
mod checker;
mod document;
mod entry;
mod error;
mod materializer;
mod stats;
mod walker;

pub use builder::{Built, RecordBuilder};
pub use checker::{ConsistencyChecker, Finding};
pub use document::DocumentError;
pub use entry::{Layout, ShadowEntry};
pub use error::{BuildWarning, EntryError, ScanError};
pub use materializer::{Materialized, Materializer, Origin};
pub use stats::{FrequencyTable, RunStats, StatsSnapshot};
pub use walker::EntryWalker;

use mm_core::{MirrorConfig, Record};
use tracing::{info, warn};

/// The outcome of a complete run.
#[derive(Debug)]
pub struct RunReport {
    /// Records in walk order.
    pub records: Vec<Record>,
    /// Entries that failed, in walk order.
    pub errors: Vec<EntryError>,
    /// Warnings raised while building records.
    pub warnings: Vec<BuildWarning>,
    /// Final counters.
    pub stats: StatsSnapshot,
}

/// One materialization pass over a shadow tree.
#[derive(Debug)]
pub struct Mirror {
    walker: EntryWalker,
    materializer: Materializer,
    stats: RunStats,
}

impl Mirror {
    /// Creates a mirror for the tree described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root is missing and
    /// [`ScanError::Grammar`] if the patterns fail to compile.
    pub fn new(config: MirrorConfig) -> Result<Self, ScanError> {
        let walker = EntryWalker::new(&config)?;
        let materializer = Materializer::new(RecordBuilder::new()?, &config);

        Ok(Self {
            walker,
            materializer,
            stats: RunStats::new(),
        })
    }

    /// Materializes every entry in the tree.
    ///
    /// Entry-level failures are collected into the report and the run moves
    /// on. An unknown kind directory or a filesystem failure stops the run.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] for the conditions above.
    pub fn run(&self) -> Result<RunReport, ScanError> {
        info!(root = %self.walker.root(), "Starting run");
        self.stats.reset();

        let entries = self.walker.collect_entries()?;
        let mut records = Vec::with_capacity(entries.len());
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for entry in &entries {
            self.stats.increment_entries();

            match self.materializer.materialize(entry) {
                Ok(materialized) => {
                    match materialized.origin {
                        Origin::Built(built_warnings) => {
                            self.stats.increment_built();
                            self.stats.add_warnings(built_warnings.len());
                            warnings.extend(built_warnings);
                        }
                        Origin::Loaded => self.stats.increment_loaded(),
                    }
                    records.push(materialized.record);
                }
                Err(err) if err.is_fatal() => return Err(err.into()),
                Err(err) => {
                    warn!(path = %err.path(), error = %err, "Skipping entry");
                    self.stats.increment_errors();
                    errors.push(err);
                }
            }
        }

        let stats = self.stats.snapshot();
        info!(
            entries = stats.entries,
            built = stats.built,
            loaded = stats.loaded,
            errors = stats.errors,
            warnings = stats.warnings,
            "Run complete"
        );

        Ok(RunReport {
            records,
            errors,
            warnings,
            stats,
        })
    }

    /// Returns the materializer, and through it the grammar's invocation
    /// counter.
    #[inline]
    #[must_use]
    pub const fn materializer(&self) -> &Materializer {
        &self.materializer
    }

    /// Returns the current counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}
