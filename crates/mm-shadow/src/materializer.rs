//! The two-phase shadow entry protocol.
//!
//! A shadow entry starts life as a pointer: one line holding the absolute
//! path of the real media file. The first run that sees it builds the record
//! and writes it back over the pointer as a `<Media>` document. Every later
//! run reads the document directly and never touches the grammar.
//!
//! ```text
//! pointer ──build──▶ record ──persist──▶ materialized
//!                                             │
//!                                        load ◀┘ (all later runs)
//! ```

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use mm_core::{MirrorConfig, Record, escape_long_path};
use tracing::debug;

use crate::builder::RecordBuilder;
use crate::document;
use crate::entry::ShadowEntry;
use crate::error::{BuildWarning, EntryError};

/// How a materialized record was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Built from a pointer in this run, then persisted.
    Built(Vec<BuildWarning>),
    /// Read back from a previous run's persisted record.
    Loaded,
}

/// A record together with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    /// The record.
    pub record: Record,
    /// Whether it was built or loaded.
    pub origin: Origin,
}

impl Materialized {
    /// Returns the build warnings; empty for loaded records.
    #[must_use]
    pub fn warnings(&self) -> &[BuildWarning] {
        match &self.origin {
            Origin::Built(warnings) => warnings,
            Origin::Loaded => &[],
        }
    }

    /// Returns `true` when the record was built in this run.
    #[must_use]
    pub const fn was_built(&self) -> bool {
        matches!(self.origin, Origin::Built(_))
    }
}

/// What a shadow entry currently holds.
#[derive(Debug, PartialEq, Eq)]
enum Content<'a> {
    /// A pointer to an existing real file.
    Pointer(&'a Utf8Path),
    /// A single non-markup line naming no existing file.
    Dangling(&'a str),
    /// Anything else: a persisted record.
    Persisted,
}

/// Turns shadow entries into records, persisting freshly built ones.
#[derive(Debug)]
pub struct Materializer {
    builder: RecordBuilder,
    long_path_threshold: usize,
}

impl Materializer {
    /// Creates a materializer using `builder` for pointer entries.
    #[must_use]
    pub const fn new(builder: RecordBuilder, config: &MirrorConfig) -> Self {
        Self {
            builder,
            long_path_threshold: config.long_path_threshold,
        }
    }

    /// Returns the record builder.
    #[inline]
    #[must_use]
    pub const fn builder(&self) -> &RecordBuilder {
        &self.builder
    }

    /// Returns the record for `entry`.
    ///
    /// A pointer entry is built and persisted over the pointer. A persisted
    /// entry is deserialized as is, without re-parsing any name, so edits to
    /// persisted records survive later runs.
    ///
    /// # Errors
    ///
    /// - [`EntryError::Read`] / [`EntryError::Write`] on filesystem failure
    /// - build errors for pointer entries
    /// - [`EntryError::Corruption`] when persisted content is not UTF-8 text
    ///   or not a valid document
    /// - [`EntryError::KindMismatch`] when a persisted record's kind differs
    ///   from its directory
    /// - [`EntryError::DanglingPointer`] for a pointer whose target is gone
    pub fn materialize(&self, entry: &ShadowEntry) -> Result<Materialized, EntryError> {
        let path = entry.relative_path();
        let shadow_path = self.escape(entry.shadow_path());
        let bytes = fs::read(&shadow_path).map_err(|e| EntryError::read(path, e))?;
        let content = std::str::from_utf8(&bytes).map_err(|e| EntryError::corruption(path, e))?;

        match self.classify(content) {
            Content::Pointer(real_path) => {
                debug!(path = %path, real_path = %real_path, "Building record from pointer");
                let built = self.builder.build(entry, real_path)?;
                persist(&shadow_path, path, &built.record)?;
                Ok(Materialized {
                    record: built.record,
                    origin: Origin::Built(built.warnings),
                })
            }
            Content::Dangling(target) => Err(EntryError::DanglingPointer {
                path: path.to_owned(),
                target: target.to_owned(),
            }),
            Content::Persisted => {
                debug!(path = %path, "Loading persisted record");
                let record = load(entry, content)?;
                Ok(Materialized {
                    record,
                    origin: Origin::Loaded,
                })
            }
        }
    }

    fn classify<'a>(&self, content: &'a str) -> Content<'a> {
        let line = content.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        if line.is_empty() || line.contains('\n') || line.starts_with(['<', '{']) {
            return Content::Persisted;
        }

        let real_path = Utf8Path::new(line);
        if real_path.is_absolute() && self.escape(real_path).is_file() {
            Content::Pointer(real_path)
        } else {
            Content::Dangling(line)
        }
    }

    fn escape(&self, path: &Utf8Path) -> Utf8PathBuf {
        escape_long_path(path, self.long_path_threshold)
    }
}

fn load(entry: &ShadowEntry, content: &str) -> Result<Record, EntryError> {
    let path = entry.relative_path();
    let record = document::parse(content, path).map_err(|e| EntryError::corruption(path, e))?;

    if record.kind() != entry.kind() {
        return Err(EntryError::KindMismatch {
            path: path.to_owned(),
            expected: entry.kind(),
            found: record.kind(),
        });
    }
    Ok(record)
}

fn persist(shadow_path: &Utf8Path, path: &Utf8Path, record: &Record) -> Result<(), EntryError> {
    let xml = document::render(record).map_err(|e| EntryError::write(path, std::io::Error::other(e)))?;
    fs::write(shadow_path, xml).map_err(|e| EntryError::write(path, e))
}
