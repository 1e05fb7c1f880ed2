//! Run statistics and per-field frequency tables.
//!
//! [`RunStats`] counts what a run did with atomic counters; [`StatsSnapshot`]
//! is its serializable point-in-time copy. [`FrequencyTable`] tallies the
//! values one field takes across a set of records.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use mm_core::{Field, Record};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Atomic counters for a run.
///
/// # Examples
///
/// ```
/// use mm_shadow::RunStats;
///
/// let stats = RunStats::new();
/// stats.increment_entries();
/// stats.increment_built();
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.entries, 1);
/// assert_eq!(snapshot.built, 1);
/// ```
#[derive(Debug, Default)]
pub struct RunStats {
    entries: AtomicU64,
    built: AtomicU64,
    loaded: AtomicU64,
    errors: AtomicU64,
    warnings: AtomicU64,
}

impl RunStats {
    /// Creates a new [`RunStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the entries-seen counter.
    #[inline]
    pub fn increment_entries(&self) {
        self.entries.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the records-built counter.
    #[inline]
    pub fn increment_built(&self) {
        self.built.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the records-loaded counter.
    #[inline]
    pub fn increment_loaded(&self) {
        self.loaded.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the entry error counter.
    #[inline]
    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds `count` build warnings.
    #[inline]
    pub fn add_warnings(&self, count: usize) {
        self.warnings.fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            entries: self.entries.load(Ordering::Relaxed),
            built: self.built.load(Ordering::Relaxed),
            loaded: self.loaded.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
        }
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.entries.store(0, Ordering::Relaxed);
        self.built.store(0, Ordering::Relaxed);
        self.loaded.store(0, Ordering::Relaxed);
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of run statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Shadow entries seen.
    pub entries: u64,
    /// Records built from pointers and persisted.
    pub built: u64,
    /// Records loaded from persisted content.
    pub loaded: u64,
    /// Entries that failed.
    pub errors: u64,
    /// Build warnings raised.
    pub warnings: u64,
}

impl StatsSnapshot {
    /// Returns the number of entries that produced a record.
    #[inline]
    #[must_use]
    pub const fn records(&self) -> u64 {
        self.built + self.loaded
    }

    /// Returns the share of entries that produced a record, as a percentage.
    ///
    /// Returns 100.0 if no entries were seen.
    ///
    /// # Examples
    ///
    /// ```
    /// use mm_shadow::StatsSnapshot;
    ///
    /// let snap = StatsSnapshot {
    ///     entries: 20,
    ///     built: 4,
    ///     loaded: 15,
    ///     errors: 1,
    ///     warnings: 3,
    /// };
    ///
    /// assert!((snap.success_rate() - 95.0).abs() < 0.1);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Acceptable for statistics display
    pub fn success_rate(&self) -> f64 {
        if self.entries == 0 {
            return 100.0;
        }

        (self.records() as f64 / self.entries as f64) * 100.0
    }
}

/// How often each value of one field occurs.
///
/// Rows are sorted by descending count, then by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    /// The tallied field.
    pub field: Field,
    /// `(value, count)` rows.
    pub rows: Vec<(String, usize)>,
}

impl FrequencyTable {
    /// Tallies `field` over `records`. Records of kinds that do not model
    /// the field are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use mm_core::{Field, Record};
    /// use mm_shadow::FrequencyTable;
    ///
    /// let records: Vec<Record> = Vec::new();
    /// let table = FrequencyTable::from_records(&records, Field::QualityTitle);
    /// assert_eq!(table.total(), 0);
    /// ```
    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Record>, field: Field) -> Self {
        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        for value in records.into_iter().filter_map(|record| record.field(field)) {
            *counts.entry(value.into_owned()).or_default() += 1;
        }

        let mut rows: Vec<(String, usize)> = counts.into_iter().collect();
        rows.sort_by(|(a_value, a_count), (b_value, b_count)| b_count.cmp(a_count).then_with(|| a_value.cmp(b_value)));

        Self { field, rows }
    }

    /// Returns the number of records tallied.
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.iter().map(|(_, count)| count).sum()
    }
}

impl fmt::Display for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|(value, _)| value.len())
            .chain(std::iter::once(self.field.as_str().len()))
            .max()
            .unwrap_or_default();

        writeln!(f, "{:<width$}  count", self.field.as_str())?;
        for (value, count) in &self.rows {
            writeln!(f, "{value:<width$}  {count:>5}")?;
        }
        Ok(())
    }
}
