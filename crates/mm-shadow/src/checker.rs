//! Consistency checking of records against their filenames.
//!
//! A record's canonical filename is rendered piece by piece and each piece
//! is consumed from the actual filename in order. Whatever is left over was
//! not captured by any field; pieces that cannot be found hold values the
//! filename does not carry.

use std::fmt;

use camino::Utf8PathBuf;
use mm_core::{CheckConfig, Field, Record};
use mm_grammar::render_segments;
use serde::Serialize;

/// The outcome of checking one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Relative path of the record's shadow entry.
    pub relative_path: Utf8PathBuf,
    /// Filename text no field accounts for, trimmed.
    pub remainder: Option<String>,
    /// Fields whose rendered text was not found in the filename.
    pub unmatched: Vec<Field>,
    /// Watched fields holding a sentinel value.
    pub flagged: Vec<Field>,
}

impl Finding {
    /// Returns `true` when nothing was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.remainder.is_none() && self.unmatched.is_empty() && self.flagged.is_empty()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.relative_path)?;
        if let Some(remainder) = &self.remainder {
            write!(f, "\n  unparsed: '{remainder}'")?;
        }
        if !self.unmatched.is_empty() {
            write!(f, "\n  not in filename: {}", join(&self.unmatched))?;
        }
        if !self.flagged.is_empty() {
            write!(f, "\n  unknown: {}", join(&self.flagged))?;
        }
        Ok(())
    }
}

fn join(fields: &[Field]) -> String {
    fields.iter().map(|field| field.as_str()).collect::<Vec<_>>().join(", ")
}

/// Checks records against the filenames they were parsed from.
///
/// # Examples
///
/// ```
/// use mm_core::{CheckConfig, Record};
/// use mm_shadow::ConsistencyChecker;
///
/// let record: Record = serde_json::from_value(serde_json::json!({
///     "kind": "Movie",
///     "relative_path": "/Movies/Heat (1995) {tmdb-949}/Heat (1995) {tmdb-949} [DVD][x264] [Proper]-GRP.xml",
///     "title": "Heat", "release_year": "1995",
///     "database_link": "https://www.themoviedb.org/movie/949", "extension": ".mkv",
///     "custom_format": "Unknown", "quality_title": "DVD", "video_dynamic_range": "Unknown",
///     "video_codec": "x264", "audio_codec": "Unknown", "audio_channels": "Unknown",
///     "release_group": "GRP", "edition": "Unknown", "three_d_info": "Unknown"
/// }))?;
///
/// let finding = ConsistencyChecker::new(&CheckConfig::default()).check(&record);
/// assert_eq!(finding.remainder.as_deref(), Some("[Proper]"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConsistencyChecker {
    watched: Vec<Field>,
}

impl ConsistencyChecker {
    /// Creates a checker watching the fields named in `config`.
    #[must_use]
    pub fn new(config: &CheckConfig) -> Self {
        Self {
            watched: config.flag_unknown_fields.clone(),
        }
    }

    /// Checks `record` against the filename stored in its relative path.
    #[must_use]
    pub fn check(&self, record: &Record) -> Finding {
        self.check_name(record, record.media_file_name())
    }

    /// Checks `record` against `file_name`, given without extension.
    #[must_use]
    pub fn check_name(&self, record: &Record, file_name: &str) -> Finding {
        let mut rest = file_name;
        let mut leftover = String::new();
        let mut unmatched = Vec::new();

        for segment in render_segments(record) {
            match rest.find(segment.text.as_str()) {
                Some(at) => {
                    leftover.push_str(&rest[..at]);
                    rest = &rest[at + segment.text.len()..];
                }
                None => unmatched.extend(segment.fields),
            }
        }
        leftover.push_str(rest);

        let remainder = leftover.trim();
        let flagged = record
            .sentinel_fields()
            .into_iter()
            .filter(|field| self.watched.contains(field))
            .collect();

        Finding {
            relative_path: record.relative_path().to_owned(),
            remainder: (!remainder.is_empty()).then(|| remainder.to_owned()),
            unmatched,
            flagged,
        }
    }

    /// Checks every record and returns the findings that are not clean.
    #[must_use]
    pub fn check_all<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> Vec<Finding> {
        records
            .into_iter()
            .map(|record| self.check(record))
            .filter(|finding| !finding.is_clean())
            .collect()
    }
}
