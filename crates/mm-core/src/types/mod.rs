//! Domain types for media-mirror.
//!
//! - [`field`] - Field names and sentinel-aware values
//! - [`kind`] - Media kinds and database identifier types
//! - [`season`] - Season classification
//! - [`record`] - The metadata record union
//!
//! Everything is re-exported at the crate root:
//!
//! ```
//! use mm_core::{Field, FieldValue, MediaKind, Record, SeasonNumber};
//! ```

mod field;
mod kind;
mod record;
mod season;

pub use field::{Field, FieldValue, MISSING, UNKNOWN};
pub use kind::{DatabaseIdType, MediaKind};
pub use record::{AnimeRecord, EpisodeInfo, MediaBase, MovieRecord, Record, ShowRecord};
pub use season::{SeasonKind, SeasonNumber};
