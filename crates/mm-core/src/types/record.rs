//! The metadata record: a tagged union over media kinds.
//!
//! Shared fields live in [`MediaBase`], which every variant embeds. Episode
//! variants additionally embed [`EpisodeInfo`]. The serde form (used for
//! reports) is a flat object whose `kind` key selects the variant, so key
//! order never matters and the set of keys is exactly [`MediaKind::fields`].

use std::borrow::Cow;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::field::{Field, FieldValue};
use super::kind::MediaKind;
use super::season::{SeasonKind, SeasonNumber};

/// Fields shared by every kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaBase {
    /// Path of the shadow entry relative to the shadow root, starting with `/`.
    pub relative_path: Utf8PathBuf,
    /// Title from the media folder (or the filename when they disagree).
    pub title: FieldValue,
    /// Four-digit release year.
    pub release_year: FieldValue,
    /// Public database page for this title.
    pub database_link: FieldValue,
    /// Real file extension, including the leading dot.
    pub extension: FieldValue,
    /// Custom format tags.
    pub custom_format: FieldValue,
    /// Quality title.
    pub quality_title: FieldValue,
    /// Video dynamic range.
    pub video_dynamic_range: FieldValue,
    /// Video codec.
    pub video_codec: FieldValue,
    /// Audio codec.
    pub audio_codec: FieldValue,
    /// Audio channel layout.
    pub audio_channels: FieldValue,
    /// Release group.
    pub release_group: FieldValue,
}

/// Fields shared by episodic kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    /// Regular season or specials.
    pub season_kind: SeasonKind,
    /// Season number; always `00` for specials.
    pub season_number: SeasonNumber,
    /// Episode number within the season.
    pub episode_number: FieldValue,
    /// Episode title.
    pub episode_title: FieldValue,
}

/// A movie record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Shared fields.
    #[serde(flatten)]
    pub base: MediaBase,
    /// Edition, e.g. `Director's Cut`.
    pub edition: FieldValue,
    /// 3D marker.
    pub three_d_info: FieldValue,
}

/// A show episode record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRecord {
    /// Shared fields.
    #[serde(flatten)]
    pub base: MediaBase,
    /// Season and episode fields.
    #[serde(flatten)]
    pub episode: EpisodeInfo,
}

/// An anime episode record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimeRecord {
    /// Shared fields.
    #[serde(flatten)]
    pub base: MediaBase,
    /// Season and episode fields.
    #[serde(flatten)]
    pub episode: EpisodeInfo,
    /// Absolute episode ordinal, e.g. `011`.
    pub absolute_episode_number: FieldValue,
    /// Video bit depth, e.g. `8`.
    pub video_bit_depth: FieldValue,
    /// Audio language codes, e.g. `JA+EN`.
    pub audio_languages: FieldValue,
}

/// Parsed metadata for one shadow entry.
///
/// # Examples
///
/// ```
/// use mm_core::{Field, MediaKind, Record};
///
/// let json = r#"{
///     "kind": "Movie",
///     "relative_path": "/Movies/Shrek the Third (2007) {tmdb-810}/Shrek the Third (2007).xml",
///     "title": "Shrek the Third", "release_year": "2007",
///     "database_link": "https://www.themoviedb.org/movie/810", "extension": ".mkv",
///     "custom_format": "Unknown", "quality_title": "Bluray-1080p",
///     "video_dynamic_range": "Unknown", "video_codec": "x264", "audio_codec": "DTS",
///     "audio_channels": "5.1", "release_group": "Unknown",
///     "edition": "Unknown", "three_d_info": "Unknown"
/// }"#;
///
/// let record: Record = serde_json::from_str(json).expect("valid record");
/// assert_eq!(record.kind(), MediaKind::Movie);
/// assert_eq!(record.field(Field::QualityTitle).as_deref(), Some("Bluray-1080p"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Record {
    /// A movie.
    Movie(MovieRecord),
    /// A show episode.
    Show(ShowRecord),
    /// An anime episode.
    Anime(AnimeRecord),
}

impl Record {
    /// Returns the discriminant.
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        match self {
            Self::Movie(_) => MediaKind::Movie,
            Self::Show(_) => MediaKind::Show,
            Self::Anime(_) => MediaKind::Anime,
        }
    }

    /// Returns the shared fields.
    #[must_use]
    pub const fn base(&self) -> &MediaBase {
        match self {
            Self::Movie(movie) => &movie.base,
            Self::Show(show) => &show.base,
            Self::Anime(anime) => &anime.base,
        }
    }

    /// Returns the episode fields for episodic kinds.
    #[must_use]
    pub const fn episode(&self) -> Option<&EpisodeInfo> {
        match self {
            Self::Movie(_) => None,
            Self::Show(show) => Some(&show.episode),
            Self::Anime(anime) => Some(&anime.episode),
        }
    }

    /// Returns the shadow-root-relative path.
    #[must_use]
    pub fn relative_path(&self) -> &Utf8Path {
        &self.base().relative_path
    }

    /// Returns the media filename this record was parsed from.
    #[must_use]
    pub fn media_file_name(&self) -> &str {
        self.relative_path().file_stem().unwrap_or_default()
    }

    /// Returns the rendered value of `field`, or `None` when this kind does
    /// not model it.
    #[must_use]
    pub fn field(&self, field: Field) -> Option<Cow<'_, str>> {
        let base = self.base();
        let value = match field {
            Field::RelativePath => return Some(Cow::Borrowed(base.relative_path.as_str())),
            Field::Kind => return Some(Cow::Borrowed(self.kind().label())),
            Field::Title => &base.title,
            Field::ReleaseYear => &base.release_year,
            Field::DatabaseLink => &base.database_link,
            Field::Extension => &base.extension,
            Field::CustomFormat => &base.custom_format,
            Field::QualityTitle => &base.quality_title,
            Field::VideoDynamicRange => &base.video_dynamic_range,
            Field::VideoCodec => &base.video_codec,
            Field::AudioCodec => &base.audio_codec,
            Field::AudioChannels => &base.audio_channels,
            Field::ReleaseGroup => &base.release_group,
            Field::SeasonKind => {
                return self
                    .episode()
                    .map(|episode| Cow::Borrowed(episode.season_kind.label()));
            }
            Field::SeasonNumber => {
                return self
                    .episode()
                    .map(|episode| Cow::Owned(episode.season_number.to_string()));
            }
            Field::EpisodeNumber => &self.episode()?.episode_number,
            Field::EpisodeTitle => &self.episode()?.episode_title,
            Field::AbsoluteEpisodeNumber | Field::VideoBitDepth | Field::AudioLanguages => {
                let Self::Anime(anime) = self else {
                    return None;
                };
                match field {
                    Field::AbsoluteEpisodeNumber => &anime.absolute_episode_number,
                    Field::VideoBitDepth => &anime.video_bit_depth,
                    _ => &anime.audio_languages,
                }
            }
            Field::Edition | Field::ThreeDInfo => {
                let Self::Movie(movie) = self else {
                    return None;
                };
                if field == Field::Edition {
                    &movie.edition
                } else {
                    &movie.three_d_info
                }
            }
            Field::IdType | Field::Id => return None,
        };
        Some(Cow::Borrowed(value.as_str()))
    }

    /// Returns the modeled fields whose value is a sentinel.
    #[must_use]
    pub fn sentinel_fields(&self) -> Vec<Field> {
        self.kind()
            .fields()
            .into_iter()
            .filter(|field| {
                self.field(*field)
                    .is_some_and(|value| value == super::field::UNKNOWN || value == super::field::MISSING)
            })
            .collect()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = self.base();
        write!(f, "{}: {} ({})", self.kind(), base.title, base.release_year)?;
        if let Some(episode) = self.episode() {
            write!(
                f,
                ", S{}E{}, {}",
                episode.season_number, episode.episode_number, episode.episode_title
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(relative_path: &str) -> MediaBase {
        MediaBase {
            relative_path: Utf8PathBuf::from(relative_path),
            title: FieldValue::new("DAN DA DAN"),
            release_year: FieldValue::new("2024"),
            database_link: FieldValue::new("https://www.thetvdb.com/dereferrer/series/433614"),
            extension: FieldValue::new(".mkv"),
            custom_format: FieldValue::Unknown,
            quality_title: FieldValue::new("WEBDL-1080p"),
            video_dynamic_range: FieldValue::Unknown,
            video_codec: FieldValue::new("x264"),
            audio_codec: FieldValue::new("AAC"),
            audio_channels: FieldValue::new("2.0"),
            release_group: FieldValue::new("MALD"),
        }
    }

    fn anime() -> Record {
        Record::Anime(AnimeRecord {
            base: base("/Anime/DAN DA DAN (2024) {tvdb-433614}/Season 01/DAN DA DAN (2024) - S01E11 - 011 - First Love.xml"),
            episode: EpisodeInfo {
                season_kind: SeasonKind::Regular,
                season_number: SeasonNumber::new(1),
                episode_number: FieldValue::new("11"),
                episode_title: FieldValue::new("First Love"),
            },
            absolute_episode_number: FieldValue::new("011"),
            video_bit_depth: FieldValue::new("8"),
            audio_languages: FieldValue::Missing,
        })
    }

    #[test]
    fn test_round_trip_preserves_sentinels() {
        let record = anime();
        let json = serde_json::to_string_pretty(&record).expect("serialize");
        let parsed: Record = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, record);
        assert!(json.contains(r#""custom_format": "Unknown""#));
        assert!(json.contains(r#""audio_languages": "Missing""#));
    }

    #[test]
    fn test_persisted_keys_match_kind_fields() {
        for record in [anime(), movie()] {
            let value = serde_json::to_value(&record).expect("serialize");
            let object = value.as_object().expect("object");

            let mut keys: Vec<Field> = object
                .keys()
                .map(|key| Field::from_name(key).expect("known key"))
                .collect();
            keys.sort();
            let mut expected = record.kind().fields();
            expected.sort();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn test_key_order_is_irrelevant() {
        let record = movie();
        let value = serde_json::to_value(&record).expect("serialize");
        let mut entries: Vec<(String, serde_json::Value)> = value
            .as_object()
            .expect("object")
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.reverse();
        let reversed = serde_json::Value::Object(entries.into_iter().collect());

        let parsed: Record = serde_json::from_value(reversed).expect("deserialize");
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_missing_key_fails() {
        let mut value = serde_json::to_value(anime()).expect("serialize");
        value
            .as_object_mut()
            .expect("object")
            .remove("absolute_episode_number");
        assert!(serde_json::from_value::<Record>(value).is_err());
    }

    #[test]
    fn test_empty_string_normalizes_to_missing() {
        let mut value = serde_json::to_value(anime()).expect("serialize");
        value["release_group"] = serde_json::Value::String(String::new());
        let parsed: Record = serde_json::from_value(value).expect("deserialize");
        assert_eq!(parsed.base().release_group, FieldValue::Missing);
    }

    #[test]
    fn test_field_lookup() {
        let record = anime();
        assert_eq!(record.field(Field::SeasonNumber).as_deref(), Some("01"));
        assert_eq!(record.field(Field::SeasonKind).as_deref(), Some("Regular"));
        assert_eq!(record.field(Field::AbsoluteEpisodeNumber).as_deref(), Some("011"));
        assert_eq!(record.field(Field::Edition), None);
        assert_eq!(record.field(Field::IdType), None);
        assert_eq!(record.media_file_name(), "DAN DA DAN (2024) - S01E11 - 011 - First Love");
    }

    #[test]
    fn test_sentinel_fields() {
        let fields = anime().sentinel_fields();
        assert_eq!(
            fields,
            vec![Field::CustomFormat, Field::VideoDynamicRange, Field::AudioLanguages]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            anime().to_string(),
            "Anime: DAN DA DAN (2024), S01E11, First Love"
        );
    }

    fn movie() -> Record {
        Record::Movie(MovieRecord {
            base: base("/Movies/Shrek the Third (2007) {tmdb-810}/Shrek the Third (2007).xml"),
            edition: FieldValue::Unknown,
            three_d_info: FieldValue::new("3D"),
        })
    }
}
