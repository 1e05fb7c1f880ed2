//! Error types for the mm-grammar crate.

use crate::patterns::PatternKind;

/// Errors that can occur while preparing the grammar.
///
/// Matching itself never fails: a name that does not fit a pattern yields
/// `None` from [`Grammar::extract`](crate::Grammar::extract).
///
/// # Examples
///
/// ```
/// use mm_grammar::{GrammarError, PatternKind};
///
/// let err = GrammarError::UnknownGroup {
///     pattern: PatternKind::Movie,
///     group: "resolution".to_owned(),
/// };
/// assert!(err.to_string().contains("resolution"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    /// A pattern source failed to compile.
    #[error("failed to compile {pattern} pattern: {source}")]
    Compile {
        /// The pattern that failed.
        pattern: PatternKind,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A pattern declares a capture group that is not a known field.
    #[error("{pattern} pattern declares unknown field group '{group}'")]
    UnknownGroup {
        /// The offending pattern.
        pattern: PatternKind,
        /// The group name.
        group: String,
    },
}
