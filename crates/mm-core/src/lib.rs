//! Core types for media-mirror.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - The metadata [`Record`] union and its sentinel-aware [`FieldValue`]s
//! - [`Config`] and its [`ConfigError`]
//! - Filename sanitization and long-path escaping

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod path;
pub mod types;

pub use config::{CheckConfig, Config, KindDirs, MirrorConfig};
pub use error::ConfigError;
pub use path::{escape_long_path, sanitize_filename};
pub use types::{
    AnimeRecord, DatabaseIdType, EpisodeInfo, Field, FieldValue, MISSING, MediaBase, MediaKind,
    MovieRecord, Record, SeasonKind, SeasonNumber, ShowRecord, UNKNOWN,
};
