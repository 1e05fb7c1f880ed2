//! Naming grammar and field extraction for media-mirror.
//!
//! This crate turns folder and file names produced by media organizing tools
//! into field maps, and renders records back into canonical filenames.
//!
//! # Overview
//!
//! - [`PatternKind`]: the fixed set of anchored naming patterns
//! - [`Grammar`]: compiled patterns plus an invocation counter
//! - [`FieldMap`]: the fields captured by one match, with `Unknown` for
//!   absent optional groups
//! - [`render_segments`] / [`render_file_name`]: canonical rendering in the
//!   patterns' bracket order
//!
//! # Example
//!
//! ```
//! use mm_core::Field;
//! use mm_grammar::{Grammar, PatternKind};
//!
//! let grammar = Grammar::new()?;
//! let fields = grammar
//!     .extract(
//!         PatternKind::ShowEpisode,
//!         "Gen V (2023) - S01E06 - Jumanji [AMZN WEBDL-720p][EAC3 5.1][h264]-NTb",
//!     )
//!     .expect("conventional name");
//!
//! assert_eq!(fields.get(Field::QualityTitle).map(|v| v.as_str()), Some("WEBDL-720p"));
//! assert_eq!(fields.get(Field::VideoDynamicRange).map(|v| v.as_str()), Some("Unknown"));
//! # Ok::<(), mm_grammar::GrammarError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod fields;
mod grammar;
pub mod patterns;
mod render;

pub use error::GrammarError;
pub use fields::FieldMap;
pub use grammar::Grammar;
pub use patterns::PatternKind;
pub use render::{Segment, render_file_name, render_segments};
