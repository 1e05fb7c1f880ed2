//! Pattern sources for folder and file names.
//!
//! Every pattern is anchored and written in verbose mode. Bracket groups are
//! positional and untagged, so each one is constrained by its own content
//! class rather than by lookahead:
//!
//! - a quality title has a closed shape (`Source-1080p`, `DVD`, ...)
//! - a custom format is only recognized in front of a quality title
//! - an audio bracket must end in a `N.N` channel layout
//! - dynamic range, 3D marker and video codec are closed vocabularies
//! - bit depth is `Nbit` and audio languages are `XX+YY` codes
//!
//! Capture group names are [`Field`](mm_core::Field) names.

use std::fmt;

/// Identifies one of the grammar's patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// `Title (Year) {idtype-id}`, shared by every kind.
    MediaFolder,
    /// `Season N` or `Specials`.
    SeasonFolder,
    /// Show episode filename.
    ShowEpisode,
    /// Anime episode filename, with an absolute ordinal.
    AnimeEpisode,
    /// Movie filename, matched case-insensitively.
    Movie,
}

impl PatternKind {
    /// Every pattern.
    pub const ALL: [Self; 5] = [
        Self::MediaFolder,
        Self::SeasonFolder,
        Self::ShowEpisode,
        Self::AnimeEpisode,
        Self::Movie,
    ];

    /// Returns the regex source for this pattern.
    #[must_use]
    pub const fn source(self) -> &'static str {
        match self {
            Self::MediaFolder => MEDIA_FOLDER,
            Self::SeasonFolder => SEASON_FOLDER,
            Self::ShowEpisode => SHOW_EPISODE,
            Self::AnimeEpisode => ANIME_EPISODE,
            Self::Movie => MOVIE,
        }
    }

    /// Returns a short human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MediaFolder => "media folder",
            Self::SeasonFolder => "season folder",
            Self::ShowEpisode => "show episode",
            Self::AnimeEpisode => "anime episode",
            Self::Movie => "movie",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `Shrek the Third (2007) {tmdb-810}`
///
/// The ID type is captured loosely so callers can tell an unrecognized type
/// apart from a malformed folder.
pub const MEDIA_FOLDER: &str = r"(?x)
    ^(?P<title>.+?)\s\((?P<release_year>\d{4})\)
    \s\{(?P<id_type>[a-z]+)-(?P<id>\d+)\}$
";

/// `Season 1`, `Season 01`, `Specials`
pub const SEASON_FOLDER: &str = r"(?x)
    ^(?:Season\s(?P<season_number>\d{1,3})|Specials)$
";

/// `Gen V (2023) - S01E06 - Jumanji [AMZN WEBDL-720p][EAC3 5.1][h264]-NTb`
///
/// Brackets: `[CustomFormat Quality][AudioCodec Channels][DynamicRange][Nbit][VideoCodec][Languages]`.
pub const SHOW_EPISODE: &str = r"(?x)
    ^(?P<title>.+?)\s*(?:\((?P<release_year>\d{4})\))?\s*-\s*
    S(?P<season_number>\d{2,3})E(?P<episode_number>\d{2,4})\s*-\s*
    (?P<episode_title>.+?)\s*
    (?:\[(?:(?P<custom_format>[^\[\]]*?)\s)?(?P<quality_title>
        [A-Za-z]+-\d{3,4}p(?:\sRemux)?|DVD|SDTV|Unknown
    )\])?
    (?:\[(?P<audio_codec>[^\[\]\s]+(?:\s[^\[\]\s]+)*?)\s(?P<audio_channels>\d+\.\d)\])?
    (?:\[(?P<video_dynamic_range>
        DV(?:\s(?:HDR10Plus|HDR10|HLG|SDR))?|HDR10Plus|HDR10|HDR|HLG|PQ|SDR
    )\])?
    (?:\[(?P<video_bit_depth>\d{1,2})bit\])?
    (?:\[(?P<video_codec>
        x264|x265|h264|h265|HEVC|AVC|AV1|VP9|XviD|DivX|MPEG2|VC1
    )\])?
    (?:\[(?P<audio_languages>[A-Z]{2,3}(?:\+[A-Z]{2,3})*)\])?
    (?:-(?P<release_group>[^\[\]\s]+))?$
";

/// `DAN DA DAN (2024) - S01E11 - 011 - First Love [WEBDL-1080p][8bit][x264][AAC 2.0][JA+EN]-MALD`
///
/// Brackets: `[CustomFormat Quality][DynamicRange][Nbit][VideoCodec][AudioCodec Channels][Languages]`.
/// The video codec precedes the audio bracket, unlike shows.
pub const ANIME_EPISODE: &str = r"(?x)
    ^(?P<title>.+?)\s*(?:\((?P<release_year>\d{4})\))?\s*-\s*
    S(?P<season_number>\d{2,3})E(?P<episode_number>\d{2,4})\s*-\s*
    (?P<absolute_episode_number>\d{2,4})\s*-\s*
    (?P<episode_title>.+?)\s*
    (?:\[(?:(?P<custom_format>[^\[\]]*?)\s)?(?P<quality_title>
        [A-Za-z]+-\d{3,4}p(?:\sRemux)?|DVD|SDTV|Unknown
    )\])?
    (?:\[(?P<video_dynamic_range>
        DV(?:\s(?:HDR10Plus|HDR10|HLG|SDR))?|HDR10Plus|HDR10|HDR|HLG|PQ|SDR
    )\])?
    (?:\[(?P<video_bit_depth>\d{1,2})bit\])?
    (?:\[(?P<video_codec>
        x264|x265|h264|h265|HEVC|AVC|AV1|VP9|XviD|DivX|MPEG2|VC1
    )\])?
    (?:\[(?P<audio_codec>[^\[\]\s]+(?:\s[^\[\]\s]+)*?)\s(?P<audio_channels>\d+\.\d)\])?
    (?:\[(?P<audio_languages>[A-Z]{2,3}(?:\+[A-Z]{2,3})*)\])?
    (?:-(?P<release_group>[^\[\]\s]+))?$
";

/// `Doctor Strange in the Multiverse of Madness (2022) {tmdb-453395} {edition-Imax} [DSNP IMAX Enhanced][WEBDL-720p][EAC3 Atmos 5.1][h264]-playWEB`
///
/// Brackets: `[CustomFormat][Quality][3D][DynamicRange][AudioCodec Channels][VideoCodec]`.
/// The edition precedes every bracket. Case-insensitive.
pub const MOVIE: &str = r"(?xi)
    ^(?P<title>.+?)\s*\((?P<release_year>\d{4})\)\s*
    (?:\{(?P<id_type>[a-z]+)-(?P<id>\d+)\}\s*)?
    (?:\{edition-(?P<edition>[^{}]*)\}\s*)?
    (?:(?:\[(?P<custom_format>[^\[\]]*)\])?\[(?P<quality_title>
        [a-z]+-\d{3,4}p(?:\sRemux)?|DVD|SDTV|Unknown
    )\])?
    (?:\[(?P<three_d_info>3D(?:\s[a-z-]+)?)\])?
    (?:\[(?P<video_dynamic_range>
        DV(?:\s(?:HDR10Plus|HDR10|HLG|SDR))?|HDR10Plus|HDR10|HDR|HLG|PQ|SDR|Dolby\sVision
    )\])?
    (?:\[(?P<audio_codec>[^\[\]\s]+(?:\s[^\[\]\s]+)*?)\s(?P<audio_channels>\d+\.\d)\])?
    (?:\[(?P<video_codec>
        x264|x265|h264|h265|HEVC|AVC|AV1|VP9|XviD|DivX|MPEG2|VC1|ProRes
    )\])?
    (?:-(?P<release_group>[^\[\]\s]+))?$
";
