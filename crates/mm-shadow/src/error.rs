//! Error and warning types for the mm-shadow crate.
//!
//! Three outcomes are kept apart:
//!
//! - [`ScanError`]: the run cannot continue and is propagated with `?`
//! - [`EntryError`]: one shadow entry failed; most variants are recorded and
//!   the run moves on to the next entry
//! - [`BuildWarning`]: a record was built, but something about it deserves a
//!   look
//!
//! # Error Recovery Strategy
//!
//! - **Walk errors**, **unknown kind directories**: fatal, abort the run
//! - **Entry read/write errors**: fatal, converted into [`ScanError::Entry`]
//! - **Grammar, layout, kind and corruption errors**: log, record, continue
//!
//! # Examples
//!
//! ```
//! use mm_shadow::{EntryError, ScanError};
//!
//! fn handle(err: EntryError) -> Result<(), ScanError> {
//!     if err.is_fatal() {
//!         return Err(err.into());
//!     }
//!     eprintln!("skipping {}: {err}", err.path());
//!     Ok(())
//! }
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use mm_core::{ConfigError, Field, MediaKind};
use mm_grammar::{GrammarError, PatternKind};

use crate::document::DocumentError;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Failed to walk the shadow tree.
    #[error("failed to walk shadow tree: {0}")]
    Walk(#[from] ignore::Error),

    /// A top-level directory does not name a known kind.
    #[error("cannot classify {path}: '{segment}' is not a known kind directory")]
    UnknownKind {
        /// Relative path of the entry that was being classified.
        path: Utf8PathBuf,
        /// The unrecognized directory name.
        segment: String,
    },

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The grammar failed to compile.
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// An entry failed in a way that stops the run.
    #[error(transparent)]
    Entry(#[from] EntryError),
}

impl ScanError {
    /// Creates a new [`ScanError::UnknownKind`] error.
    #[inline]
    pub fn unknown_kind(path: impl Into<Utf8PathBuf>, segment: impl Into<String>) -> Self {
        Self::UnknownKind {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Returns the relative path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        match self {
            Self::UnknownKind { path, .. } => Some(path),
            Self::Entry(err) => Some(err.path()),
            Self::Walk(_) | Self::Config(_) | Self::Grammar(_) | Self::NonUtf8Path(_) => None,
        }
    }
}

/// Errors affecting a single shadow entry.
#[derive(Debug, thiserror::Error)]
pub enum EntryError {
    /// A folder or file name did not match its pattern.
    #[error("{path}: {pattern} pattern does not match '{text}'")]
    GrammarMismatch {
        /// Relative path of the entry.
        path: Utf8PathBuf,
        /// The pattern that was tried.
        pattern: PatternKind,
        /// The name that failed to match.
        text: String,
    },

    /// The entry does not sit at the depth its kind requires.
    #[error("{path}: {reason}")]
    Layout {
        /// Relative path of the entry.
        path: Utf8PathBuf,
        /// What is wrong with the layout.
        reason: &'static str,
    },

    /// The record kind disagrees with the expected kind.
    #[error("{path}: expected a {expected} record, found {found}")]
    KindMismatch {
        /// Relative path of the entry.
        path: Utf8PathBuf,
        /// Kind implied by the directory or requested by the caller.
        expected: MediaKind,
        /// Kind found.
        found: MediaKind,
    },

    /// Persisted content is not a valid record.
    #[error("{path}: persisted record is corrupt: {source}")]
    Corruption {
        /// Relative path of the entry.
        path: Utf8PathBuf,
        /// What is wrong with the content.
        #[source]
        source: DocumentError,
    },

    /// A one-line pointer names a file that no longer exists.
    #[error("{path}: pointer target does not exist: {target}")]
    DanglingPointer {
        /// Relative path of the entry.
        path: Utf8PathBuf,
        /// The pointer line.
        target: String,
    },

    /// Failed to read the entry.
    #[error("{path}: failed to read entry: {source}")]
    Read {
        /// Relative path of the entry.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to persist the entry.
    #[error("{path}: failed to write entry: {source}")]
    Write {
        /// Relative path of the entry.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl EntryError {
    /// Creates a new [`EntryError::GrammarMismatch`] error.
    #[inline]
    pub fn mismatch(path: impl Into<Utf8PathBuf>, pattern: PatternKind, text: impl Into<String>) -> Self {
        Self::GrammarMismatch {
            path: path.into(),
            pattern,
            text: text.into(),
        }
    }

    /// Creates a new [`EntryError::Corruption`] error.
    #[inline]
    pub fn corruption(path: impl Into<Utf8PathBuf>, source: impl Into<DocumentError>) -> Self {
        Self::Corruption {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Creates a new [`EntryError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`EntryError::Write`] error.
    #[inline]
    pub fn write(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if the run can continue with the next entry.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// Returns `true` for filesystem failures, which stop the run.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Write { .. })
    }

    /// Returns the relative path of the failing entry.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::GrammarMismatch { path, .. }
            | Self::Layout { path, .. }
            | Self::KindMismatch { path, .. }
            | Self::Corruption { path, .. }
            | Self::DanglingPointer { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. } => path,
        }
    }
}

/// Non-fatal findings produced while building a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildWarning {
    /// Folder and file name disagree on a field; the file value was kept.
    #[error("{path}: {field} mismatch, folder has '{folder_value}', file has '{file_value}'")]
    CrossValidationMismatch {
        /// Relative path of the entry.
        path: Utf8PathBuf,
        /// The disagreeing field.
        field: Field,
        /// Value derived from the folder name.
        folder_value: String,
        /// Value derived from the file name, which was kept.
        file_value: String,
    },

    /// The media folder carries an ID type that is not accepted for its kind.
    #[error("{path}: unrecognized database ID type '{id_type}'")]
    UnknownIdentifierType {
        /// Relative path of the entry.
        path: Utf8PathBuf,
        /// The ID type prefix as written.
        id_type: String,
    },
}

impl BuildWarning {
    /// Returns the relative path of the entry.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::CrossValidationMismatch { path, .. } | Self::UnknownIdentifierType { path, .. } => path,
        }
    }

    /// Returns the field the warning is about.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::CrossValidationMismatch { field, .. } => *field,
            Self::UnknownIdentifierType { .. } => Field::IdType,
        }
    }
}
