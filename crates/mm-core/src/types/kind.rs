//! Media kinds and database identifier types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::Field;

/// The discriminant of a [`Record`](crate::Record).
///
/// # Examples
///
/// ```
/// use mm_core::MediaKind;
///
/// assert!(MediaKind::Anime.is_episodic());
/// assert!(!MediaKind::Movie.is_episodic());
/// assert_eq!(MediaKind::Show.to_string(), "Show");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    /// A feature film.
    Movie,
    /// A television episode.
    Show,
    /// An anime episode, carrying an absolute episode ordinal.
    Anime,
}

/// Fields every kind carries.
const BASE_FIELDS: &[Field] = &[
    Field::RelativePath,
    Field::Kind,
    Field::Title,
    Field::ReleaseYear,
    Field::DatabaseLink,
    Field::Extension,
    Field::CustomFormat,
    Field::QualityTitle,
    Field::VideoDynamicRange,
    Field::VideoCodec,
    Field::AudioCodec,
    Field::AudioChannels,
    Field::ReleaseGroup,
];

const MOVIE_FIELDS: &[Field] = &[Field::Edition, Field::ThreeDInfo];

const EPISODE_FIELDS: &[Field] = &[
    Field::SeasonKind,
    Field::SeasonNumber,
    Field::EpisodeNumber,
    Field::EpisodeTitle,
];

const ANIME_FIELDS: &[Field] = &[
    Field::AbsoluteEpisodeNumber,
    Field::VideoBitDepth,
    Field::AudioLanguages,
];

impl MediaKind {
    /// Every kind.
    pub const ALL: [Self; 3] = [Self::Movie, Self::Show, Self::Anime];

    /// Returns the display label of this kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Show => "Show",
            Self::Anime => "Anime",
        }
    }

    /// Parses a display label such as `Show`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.label() == label)
    }

    /// Returns `true` for kinds organized in season folders.
    #[inline]
    #[must_use]
    pub const fn is_episodic(self) -> bool {
        matches!(self, Self::Show | Self::Anime)
    }

    /// Returns the database identifier types a media folder of this kind may
    /// carry.
    #[must_use]
    pub const fn accepted_id_types(self) -> &'static [DatabaseIdType] {
        match self {
            Self::Movie => &[DatabaseIdType::Tmdb],
            Self::Show | Self::Anime => &[DatabaseIdType::Tvdb, DatabaseIdType::Tmdb],
        }
    }

    /// Returns every field a record of this kind models, base fields first.
    #[must_use]
    pub fn fields(self) -> Vec<Field> {
        let specific: &[&[Field]] = match self {
            Self::Movie => &[MOVIE_FIELDS],
            Self::Show => &[EPISODE_FIELDS],
            Self::Anime => &[EPISODE_FIELDS, ANIME_FIELDS],
        };

        BASE_FIELDS
            .iter()
            .chain(specific.iter().flat_map(|fields| fields.iter()))
            .copied()
            .collect()
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A recognized database identifier prefix from a media folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseIdType {
    /// TheTVDB series identifier.
    Tvdb,
    /// The Movie Database identifier.
    Tmdb,
}

impl DatabaseIdType {
    /// Parses a folder prefix such as `tvdb`.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "tvdb" => Some(Self::Tvdb),
            "tmdb" => Some(Self::Tmdb),
            _ => None,
        }
    }

    /// Returns the folder prefix for this type.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Tvdb => "tvdb",
            Self::Tmdb => "tmdb",
        }
    }

    /// Builds the public page link for `id` on a record of `kind`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mm_core::{DatabaseIdType, MediaKind};
    ///
    /// assert_eq!(
    ///     DatabaseIdType::Tvdb.link(MediaKind::Show, "378165"),
    ///     "https://www.thetvdb.com/dereferrer/series/378165"
    /// );
    /// assert_eq!(
    ///     DatabaseIdType::Tmdb.link(MediaKind::Movie, "810"),
    ///     "https://www.themoviedb.org/movie/810"
    /// );
    /// ```
    #[must_use]
    pub fn link(self, kind: MediaKind, id: &str) -> String {
        match (self, kind) {
            (Self::Tvdb, _) => format!("https://www.thetvdb.com/dereferrer/series/{id}"),
            (Self::Tmdb, MediaKind::Movie) => format!("https://www.themoviedb.org/movie/{id}"),
            (Self::Tmdb, MediaKind::Show | MediaKind::Anime) => {
                format!("https://www.themoviedb.org/tv/{id}")
            }
        }
    }

    /// Recovers the identifier pair from a link built by [`link`](Self::link).
    #[must_use]
    pub fn parse_link(link: &str) -> Option<(Self, &str)> {
        const PREFIXES: &[(&str, DatabaseIdType)] = &[
            ("https://www.thetvdb.com/dereferrer/series/", DatabaseIdType::Tvdb),
            ("https://www.themoviedb.org/movie/", DatabaseIdType::Tmdb),
            ("https://www.themoviedb.org/tv/", DatabaseIdType::Tmdb),
        ];

        PREFIXES.iter().find_map(|(prefix, id_type)| {
            link.strip_prefix(prefix)
                .filter(|id| !id.is_empty())
                .map(|id| (*id_type, id))
        })
    }
}

impl fmt::Display for DatabaseIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}
