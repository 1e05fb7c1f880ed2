//! Field names and sentinel-aware field values.
//!
//! Every value stored on a [`Record`](crate::Record) is a [`FieldValue`]:
//! either concrete text or one of the two sentinels.
//!
//! Values taken from names are always concrete, even when the text reads
//! `Unknown` or `Missing`. Sentinel spellings are only normalized when
//! persisted text is read back, where the two cannot be told apart: a title
//! that is literally `Missing` reloads as [`FieldValue::Missing`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rendering of [`FieldValue::Unknown`].
pub const UNKNOWN: &str = "Unknown";

/// Rendering of [`FieldValue::Missing`].
pub const MISSING: &str = "Missing";

/// A single metadata value.
///
/// # Examples
///
/// ```
/// use mm_core::FieldValue;
///
/// assert_eq!(FieldValue::from_capture(Some("h264")), "h264");
/// assert_eq!(FieldValue::from_capture(Some("")), FieldValue::Unknown);
/// assert_eq!(FieldValue::from_capture(None), FieldValue::Unknown);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FieldValue {
    /// Concrete text extracted from a name.
    Value(String),

    /// The grammar declares the group optional and it was absent or empty.
    #[default]
    Unknown,

    /// The field's source existed but could not be used.
    Missing,
}

impl FieldValue {
    /// Builds a value from an optional regex capture.
    ///
    /// Absent, empty and whitespace-only captures all resolve to
    /// [`FieldValue::Unknown`]. Any other capture is concrete text.
    #[must_use]
    pub fn from_capture(capture: Option<&str>) -> Self {
        match capture.map(str::trim) {
            Some(text) if !text.is_empty() => Self::Value(text.to_owned()),
            _ => Self::Unknown,
        }
    }

    /// Builds a concrete value. Sentinel spellings are kept as text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self::Value(text.into())
    }

    /// Returns the rendered form of this value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Value(text) => text,
            Self::Unknown => UNKNOWN,
            Self::Missing => MISSING,
        }
    }

    /// Returns the concrete text, or `None` for a sentinel.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Value(text) => Some(text),
            Self::Unknown | Self::Missing => None,
        }
    }

    /// Returns `true` for [`FieldValue::Unknown`] and [`FieldValue::Missing`].
    #[inline]
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        matches!(self, Self::Unknown | Self::Missing)
    }
}

impl From<String> for FieldValue {
    /// Persisted-text normalization: `""` becomes `Missing`, sentinel
    /// spellings become their variants.
    fn from(text: String) -> Self {
        match text.as_str() {
            "" | MISSING => Self::Missing,
            UNKNOWN => Self::Unknown,
            _ => Self::Value(text),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::from(text.to_owned())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for FieldValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for FieldValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// Names of every field a record or grammar pattern can carry.
///
/// The snake-case rendering is shared by regex capture groups, persisted
/// record keys, warnings and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Field {
    /// Shadow-root-relative entry path.
    RelativePath,
    /// Record discriminant.
    Kind,
    /// Series or movie title.
    Title,
    /// Four-digit release year.
    ReleaseYear,
    /// Database identifier type (`tvdb`, `tmdb`). Grammar only.
    IdType,
    /// Numeric database identifier. Grammar only.
    Id,
    /// Link built from the identifier pair.
    DatabaseLink,
    /// Real file extension including the dot.
    Extension,
    /// Custom format tags.
    CustomFormat,
    /// Quality title, e.g. `WEBDL-1080p`.
    QualityTitle,
    /// Dynamic range, e.g. `HDR`.
    VideoDynamicRange,
    /// Video codec.
    VideoCodec,
    /// Audio codec.
    AudioCodec,
    /// Audio channel layout, e.g. `5.1`.
    AudioChannels,
    /// Release group.
    ReleaseGroup,
    /// Regular or special season.
    SeasonKind,
    /// Two-digit season number.
    SeasonNumber,
    /// Episode number within the season.
    EpisodeNumber,
    /// Episode title.
    EpisodeTitle,
    /// Anime absolute episode ordinal.
    AbsoluteEpisodeNumber,
    /// Video bit depth, e.g. `8`.
    VideoBitDepth,
    /// Audio language codes, e.g. `JA+EN`.
    AudioLanguages,
    /// Movie edition.
    Edition,
    /// Movie 3D marker.
    ThreeDInfo,
}

impl Field {
    /// Every field, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::RelativePath,
        Self::Kind,
        Self::Title,
        Self::ReleaseYear,
        Self::IdType,
        Self::Id,
        Self::DatabaseLink,
        Self::Extension,
        Self::CustomFormat,
        Self::QualityTitle,
        Self::VideoDynamicRange,
        Self::VideoCodec,
        Self::AudioCodec,
        Self::AudioChannels,
        Self::ReleaseGroup,
        Self::SeasonKind,
        Self::SeasonNumber,
        Self::EpisodeNumber,
        Self::EpisodeTitle,
        Self::AbsoluteEpisodeNumber,
        Self::VideoBitDepth,
        Self::AudioLanguages,
        Self::Edition,
        Self::ThreeDInfo,
    ];

    /// Returns the snake-case name of this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RelativePath => "relative_path",
            Self::Kind => "kind",
            Self::Title => "title",
            Self::ReleaseYear => "release_year",
            Self::IdType => "id_type",
            Self::Id => "id",
            Self::DatabaseLink => "database_link",
            Self::Extension => "extension",
            Self::CustomFormat => "custom_format",
            Self::QualityTitle => "quality_title",
            Self::VideoDynamicRange => "video_dynamic_range",
            Self::VideoCodec => "video_codec",
            Self::AudioCodec => "audio_codec",
            Self::AudioChannels => "audio_channels",
            Self::ReleaseGroup => "release_group",
            Self::SeasonKind => "season_kind",
            Self::SeasonNumber => "season_number",
            Self::EpisodeNumber => "episode_number",
            Self::EpisodeTitle => "episode_title",
            Self::AbsoluteEpisodeNumber => "absolute_episode_number",
            Self::VideoBitDepth => "video_bit_depth",
            Self::AudioLanguages => "audio_languages",
            Self::Edition => "edition",
            Self::ThreeDInfo => "three_d_info",
        }
    }

    /// Looks a field up by its snake-case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.as_str() == name)
    }

    /// Returns the element name this field is persisted under, or `None`
    /// for fields the persisted document does not store.
    ///
    /// The relative path is the entry's own location, and the identifier
    /// halves are only kept as the database link.
    #[must_use]
    pub const fn element_name(self) -> Option<&'static str> {
        let name = match self {
            Self::RelativePath | Self::IdType | Self::Id => return None,
            Self::Kind => "Type",
            Self::Title => "Title",
            Self::ReleaseYear => "ReleaseYear",
            Self::DatabaseLink => "DatabaseLink",
            Self::Extension => "Extension",
            Self::CustomFormat => "CustomFormats",
            Self::QualityTitle => "QualityTitle",
            Self::VideoDynamicRange => "VideoDynamicRange",
            Self::VideoCodec => "VideoCodec",
            Self::AudioCodec => "AudioCodec",
            Self::AudioChannels => "AudioChannels",
            Self::ReleaseGroup => "ReleaseGroup",
            Self::SeasonKind => "SeasonType",
            Self::SeasonNumber => "SeasonNum",
            Self::EpisodeNumber => "EpisodeNum",
            Self::EpisodeTitle => "EpisodeTitle",
            Self::AbsoluteEpisodeNumber => "AbsEpisodeNum",
            Self::VideoBitDepth => "VideoBitDepth",
            Self::AudioLanguages => "AudioLanguages",
            Self::Edition => "Edition",
            Self::ThreeDInfo => "ThreeDInfo",
        };
        Some(name)
    }

    /// Looks a field up by its persisted element name.
    #[must_use]
    pub fn from_element(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.element_name() == Some(name))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown field '{s}'"))
    }
}
