//! Record building from a shadow entry's path.
//!
//! A record is assembled from three names: the media folder, the season
//! folder (episodic kinds only) and the entry's file stem. Fields that both
//! the folders and the file name carry are cross-validated; the file name
//! wins every disagreement and the disagreement is reported as a
//! [`BuildWarning`].

use camino::Utf8Path;
use mm_core::{
    AnimeRecord, DatabaseIdType, EpisodeInfo, Field, FieldValue, MediaBase, MediaKind, MovieRecord, Record,
    SeasonKind, SeasonNumber, ShowRecord, sanitize_filename,
};
use mm_grammar::{FieldMap, Grammar, GrammarError, PatternKind};
use tracing::{debug, warn};

use crate::entry::ShadowEntry;
use crate::error::{BuildWarning, EntryError};

/// A freshly built record and the warnings raised while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Built {
    /// The assembled record.
    pub record: Record,
    /// Cross-validation and identifier warnings.
    pub warnings: Vec<BuildWarning>,
}

/// Builds [`Record`]s from shadow entry paths.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use mm_core::KindDirs;
/// use mm_shadow::{RecordBuilder, ShadowEntry};
///
/// let builder = RecordBuilder::new()?;
/// let entry = ShadowEntry::new(
///     Utf8Path::new("/mirror"),
///     "/mirror/Shows/Gen V (2023) {tvdb-378165}/Season 01/Gen V (2023) - S01E06 - Jumanji [AMZN WEBDL-720p][EAC3 5.1][h264]-NTb.xml".into(),
///     &KindDirs::default(),
/// )?;
///
/// let built = builder.build(&entry, Utf8Path::new("/media/Gen V - S01E06.mkv"))?;
/// assert_eq!(built.record.base().quality_title, "WEBDL-720p");
/// assert!(built.warnings.is_empty());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct RecordBuilder {
    grammar: Grammar,
}

impl RecordBuilder {
    /// Creates a builder with a new grammar.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError`] if the patterns fail to compile.
    pub fn new() -> Result<Self, GrammarError> {
        Ok(Self::with_grammar(Grammar::new()?))
    }

    /// Creates a builder around an existing grammar.
    #[must_use]
    pub const fn with_grammar(grammar: Grammar) -> Self {
        Self { grammar }
    }

    /// Returns the grammar, whose invocation counter tracks every parse.
    #[inline]
    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Builds the record for `entry`, whose media file lives at `real_path`.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Layout`] for an entry at the wrong depth and
    /// [`EntryError::GrammarMismatch`] when a folder or the file name does
    /// not match its pattern.
    pub fn build(&self, entry: &ShadowEntry, real_path: &Utf8Path) -> Result<Built, EntryError> {
        let path = entry.relative_path();
        let kind = entry.kind();
        let layout = entry.layout()?;

        let mut folder = self.extract(PatternKind::MediaFolder, layout.media_folder, path)?;
        let season = layout
            .season_folder
            .map(|name| self.extract(PatternKind::SeasonFolder, name, path))
            .transpose()?;
        let mut file = self.extract_file(kind, layout.file_stem, path)?;

        let mut check = CrossCheck::new(path);
        let title = check.field(Field::Title, folder.take(Field::Title), file.take(Field::Title));
        let release_year = check.field(
            Field::ReleaseYear,
            folder.take(Field::ReleaseYear),
            file.take(Field::ReleaseYear),
        );

        let folder_id = (folder.take(Field::IdType), folder.take(Field::Id));
        let file_id = (file.take(Field::IdType), file.take(Field::Id));
        let database_link = check.database_link(kind, folder_id, file_id);

        let base = MediaBase {
            relative_path: path.to_owned(),
            title,
            release_year,
            database_link,
            extension: real_path
                .extension()
                .map_or(FieldValue::Unknown, |ext| FieldValue::new(format!(".{ext}"))),
            custom_format: file.take(Field::CustomFormat),
            quality_title: file.take(Field::QualityTitle),
            video_dynamic_range: file.take(Field::VideoDynamicRange),
            video_codec: file.take(Field::VideoCodec),
            audio_codec: file.take(Field::AudioCodec),
            audio_channels: file.take(Field::AudioChannels),
            release_group: file.take(Field::ReleaseGroup),
        };

        let record = match kind {
            MediaKind::Movie => Record::Movie(MovieRecord {
                base,
                edition: file.take(Field::Edition),
                three_d_info: file.take(Field::ThreeDInfo),
            }),
            MediaKind::Show => Record::Show(ShowRecord {
                base,
                episode: check.episode(season, &mut file),
            }),
            MediaKind::Anime => Record::Anime(AnimeRecord {
                base,
                episode: check.episode(season, &mut file),
                absolute_episode_number: file.take(Field::AbsoluteEpisodeNumber),
                video_bit_depth: file.take(Field::VideoBitDepth),
                audio_languages: file.take(Field::AudioLanguages),
            }),
        };

        Ok(Built {
            record,
            warnings: check.warnings,
        })
    }

    /// Builds the record for `entry`, requiring it to be of kind `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::KindMismatch`] when the entry's directory names
    /// another kind, and otherwise the errors of [`build`](Self::build).
    pub fn build_as(&self, entry: &ShadowEntry, real_path: &Utf8Path, expected: MediaKind) -> Result<Built, EntryError> {
        if entry.kind() != expected {
            return Err(EntryError::KindMismatch {
                path: entry.relative_path().to_owned(),
                expected,
                found: entry.kind(),
            });
        }
        self.build(entry, real_path)
    }

    fn extract(&self, pattern: PatternKind, text: &str, path: &Utf8Path) -> Result<FieldMap, EntryError> {
        self.grammar
            .extract(pattern, text)
            .ok_or_else(|| EntryError::mismatch(path, pattern, text))
    }

    /// Anime specials lack the absolute ordinal and fall back to the show
    /// pattern.
    fn extract_file(&self, kind: MediaKind, stem: &str, path: &Utf8Path) -> Result<FieldMap, EntryError> {
        let primary = match kind {
            MediaKind::Movie => PatternKind::Movie,
            MediaKind::Show => PatternKind::ShowEpisode,
            MediaKind::Anime => PatternKind::AnimeEpisode,
        };

        if let Some(fields) = self.grammar.extract(primary, stem) {
            return Ok(fields);
        }
        if kind == MediaKind::Anime {
            if let Some(fields) = self.grammar.extract(PatternKind::ShowEpisode, stem) {
                debug!(path = %path, "Anime pattern did not match, using show episode pattern");
                return Ok(fields);
            }
        }
        Err(EntryError::mismatch(path, primary, stem))
    }
}

/// Reconciles folder-derived and file-derived values for one entry.
struct CrossCheck<'a> {
    path: &'a Utf8Path,
    warnings: Vec<BuildWarning>,
}

impl<'a> CrossCheck<'a> {
    const fn new(path: &'a Utf8Path) -> Self {
        Self {
            path,
            warnings: Vec::new(),
        }
    }

    /// Keeps the file value unless it is a sentinel.
    fn field(&mut self, field: Field, folder: FieldValue, file: FieldValue) -> FieldValue {
        match (folder.value(), file.value()) {
            (_, None) => folder,
            (None, Some(_)) => file,
            (Some(from_folder), Some(from_file)) => {
                if sanitize_filename(from_folder) != sanitize_filename(from_file) {
                    self.mismatch(field, from_folder, from_file);
                }
                file
            }
        }
    }

    /// Resolves the database link. Only movie file names carry an ID of
    /// their own; when they do, it wins over the folder's.
    fn database_link(
        &mut self,
        kind: MediaKind,
        folder: (FieldValue, FieldValue),
        file: (FieldValue, FieldValue),
    ) -> FieldValue {
        let folder_id = joined_id(&folder);
        let file_id = joined_id(&file);

        let (id_type, id) = match (folder_id, file_id) {
            (Some(from_folder), Some(from_file)) => {
                if !from_folder.eq_ignore_ascii_case(&from_file) {
                    self.mismatch(Field::Id, &from_folder, &from_file);
                }
                file
            }
            (None, Some(_)) => file,
            (Some(_), None) => folder,
            (None, None) => return FieldValue::Missing,
        };
        let (Some(id_type), Some(id)) = (id_type.value(), id.value()) else {
            return FieldValue::Missing;
        };

        match DatabaseIdType::from_prefix(&id_type.to_ascii_lowercase())
            .filter(|parsed| kind.accepted_id_types().contains(parsed))
        {
            Some(parsed) => FieldValue::new(parsed.link(kind, id)),
            None => {
                warn!(path = %self.path, id_type, "Unrecognized database ID type");
                self.warnings.push(BuildWarning::UnknownIdentifierType {
                    path: self.path.to_owned(),
                    id_type: id_type.to_owned(),
                });
                FieldValue::Missing
            }
        }
    }

    /// A `Specials` folder stands for season `00`. The file's season wins
    /// when both are present.
    fn episode(&mut self, season: Option<FieldMap>, file: &mut FieldMap) -> EpisodeInfo {
        let from_folder = season.map(|mut season| match season.take(Field::SeasonNumber).value() {
            Some(number) => SeasonNumber::parse(number),
            None => Some(SeasonNumber::SPECIALS),
        });
        let from_folder = from_folder.flatten();
        let from_file = file.take(Field::SeasonNumber).value().and_then(SeasonNumber::parse);

        let season_number = match (from_folder, from_file) {
            (Some(folder), Some(file)) => {
                if folder != file {
                    self.mismatch(Field::SeasonNumber, &folder.to_string(), &file.to_string());
                }
                file
            }
            (folder, file) => file.or(folder).unwrap_or(SeasonNumber::SPECIALS),
        };
        let season_kind = if season_number == SeasonNumber::SPECIALS {
            SeasonKind::Special
        } else {
            SeasonKind::Regular
        };

        EpisodeInfo {
            season_kind,
            season_number,
            episode_number: file.take(Field::EpisodeNumber),
            episode_title: file.take(Field::EpisodeTitle),
        }
    }

    fn mismatch(&mut self, field: Field, folder_value: &str, file_value: &str) {
        warn!(
            path = %self.path,
            field = %field,
            folder_value,
            file_value,
            "Folder and file name disagree, keeping file value"
        );
        self.warnings.push(BuildWarning::CrossValidationMismatch {
            path: self.path.to_owned(),
            field,
            folder_value: folder_value.to_owned(),
            file_value: file_value.to_owned(),
        });
    }
}

/// `tmdb-810`, when both halves are present.
fn joined_id((id_type, id): &(FieldValue, FieldValue)) -> Option<String> {
    Some(format!("{}-{}", id_type.value()?, id.value()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use mm_core::KindDirs;

    fn entry(relative: &str) -> ShadowEntry {
        ShadowEntry::new(
            Utf8Path::new("/mirror"),
            Utf8PathBuf::from(format!("/mirror{relative}.xml")),
            &KindDirs::default(),
        )
        .expect("known kind")
    }

    fn build(relative: &str) -> Built {
        let builder = RecordBuilder::new().expect("grammar");
        builder
            .build(&entry(relative), Utf8Path::new("/media/file.mkv"))
            .expect("build")
    }

    #[test]
    fn test_title_spelled_like_a_sentinel_is_cross_validated() {
        let built = build("/Movies/Missing (2023) {tmdb-768362}/Unknown (2023) [WEBDL-1080p]-GRP");
        assert_eq!(built.record.base().title.value(), Some("Unknown"));
        assert!(matches!(
            built.warnings.as_slice(),
            [BuildWarning::CrossValidationMismatch { field: Field::Title, folder_value, file_value, .. }]
                if folder_value == "Missing" && file_value == "Unknown"
        ));
    }

    #[test]
    fn test_show_episode() {
        let built = build(
            "/Shows/Gen V (2023) {tvdb-378165}/Season 01/Gen V (2023) - S01E06 - Jumanji [AMZN WEBDL-720p][EAC3 5.1][h264]-NTb",
        );
        assert!(built.warnings.is_empty());

        let Record::Show(show) = &built.record else {
            panic!("expected a show record, got {:?}", built.record.kind());
        };
        assert_eq!(show.base.title, "Gen V");
        assert_eq!(show.base.release_year, "2023");
        assert_eq!(show.base.database_link, "https://www.thetvdb.com/dereferrer/series/378165");
        assert_eq!(show.base.extension, ".mkv");
        assert_eq!(show.base.custom_format, "AMZN");
        assert_eq!(show.base.quality_title, "WEBDL-720p");
        assert_eq!(show.base.audio_codec, "EAC3");
        assert_eq!(show.base.audio_channels, "5.1");
        assert_eq!(show.base.video_codec, "h264");
        assert_eq!(show.base.video_dynamic_range, FieldValue::Unknown);
        assert_eq!(show.base.release_group, "NTb");
        assert_eq!(show.episode.season_kind, SeasonKind::Regular);
        assert_eq!(show.episode.season_number.to_string(), "01");
        assert_eq!(show.episode.episode_number, "06");
        assert_eq!(show.episode.episode_title, "Jumanji");
    }

    #[test]
    fn test_anime_episode() {
        let built = build(
            "/Anime/DAN DA DAN (2024) {tvdb-432832}/Season 01/DAN DA DAN (2024) - S01E11 - 011 - First Love [WEBDL-1080p][8bit][x264][AAC 2.0][JA+EN]-MALD",
        );
        assert!(built.warnings.is_empty());

        let Record::Anime(anime) = &built.record else {
            panic!("expected an anime record, got {:?}", built.record.kind());
        };
        assert_eq!(anime.absolute_episode_number, "011");
        assert_eq!(anime.video_bit_depth, "8");
        assert_eq!(anime.audio_languages, "JA+EN");
        assert_eq!(anime.base.release_group, "MALD");
        assert_eq!(anime.base.custom_format, FieldValue::Unknown);
        assert_eq!(anime.episode.episode_title, "First Love");
    }

    #[test]
    fn test_anime_special_falls_back_to_show_pattern() {
        let built = build(
            "/Anime/DAN DA DAN (2024) {tvdb-432832}/Specials/DAN DA DAN (2024) - S00E01 - Recap [WEBDL-1080p]-MALD",
        );
        let Record::Anime(anime) = &built.record else {
            panic!("expected an anime record");
        };
        assert_eq!(anime.absolute_episode_number, FieldValue::Unknown);
        assert_eq!(anime.video_bit_depth, FieldValue::Unknown);
        assert_eq!(anime.episode.season_kind, SeasonKind::Special);
        assert_eq!(anime.episode.season_number, SeasonNumber::SPECIALS);
        assert_eq!(anime.episode.episode_title, "Recap");
    }

    #[test]
    fn test_movie_without_optional_markers() {
        let built = build("/Movies/Shrek the Third (2007) {tmdb-810}/Shrek the Third (2007) [Bluray-1080p][DTS 5.1][x264]-GROUP");
        assert!(built.warnings.is_empty());

        let Record::Movie(movie) = &built.record else {
            panic!("expected a movie record");
        };
        assert_eq!(movie.edition, FieldValue::Unknown);
        assert_eq!(movie.base.custom_format, FieldValue::Unknown);
        assert_eq!(movie.base.title, "Shrek the Third");
        assert_eq!(movie.base.release_year, "2007");
        assert_eq!(movie.base.release_group, "GROUP");
        assert_eq!(movie.base.database_link, "https://www.themoviedb.org/movie/810");
    }

    #[test]
    fn test_season_mismatch_keeps_file_value() {
        let built = build("/Shows/Gen V (2023) {tvdb-378165}/Season 01/Gen V (2023) - S02E01 - New Year [WEBDL-1080p]-NTb");

        assert_eq!(
            built.record.episode().map(|episode| episode.season_number),
            Some(SeasonNumber::new(2))
        );
        assert_eq!(
            built.warnings,
            [BuildWarning::CrossValidationMismatch {
                path: Utf8PathBuf::from(
                    "/Shows/Gen V (2023) {tvdb-378165}/Season 01/Gen V (2023) - S02E01 - New Year [WEBDL-1080p]-NTb.xml"
                ),
                field: Field::SeasonNumber,
                folder_value: "01".to_owned(),
                file_value: "02".to_owned(),
            }]
        );
    }

    #[test]
    fn test_title_mismatch_keeps_file_value() {
        let built = build("/Shows/The Boys (2019) {tvdb-355567}/Season 01/Boys (2019) - S01E01 - The Name of the Game");
        assert_eq!(built.record.base().title, "Boys");
        assert_eq!(built.warnings.len(), 1);
        assert_eq!(built.warnings[0].field(), Field::Title);
    }

    #[test]
    fn test_sanitized_titles_agree() {
        let built = build("/Shows/What If_ (2021) {tvdb-1}/Season 01/What If? (2021) - S01E01 - Pilot");
        assert!(built.warnings.is_empty());
        assert_eq!(built.record.base().title, "What If?");
    }

    #[test]
    fn test_season_folder_number_is_normalized() {
        let built = build("/Shows/Gen V (2023) {tvdb-378165}/Season 1/Gen V (2023) - S01E01 - God U");
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_missing_file_year_uses_folder_year() {
        let built = build("/Shows/Gen V (2023) {tvdb-378165}/Season 01/Gen V - S01E01 - God U");
        assert_eq!(built.record.base().release_year, "2023");
        assert!(built.warnings.is_empty());
    }

    #[test]
    fn test_unknown_identifier_type() {
        let built = build("/Shows/Gen V (2023) {imdb-13623632}/Season 01/Gen V (2023) - S01E01 - God U");
        assert_eq!(built.record.base().database_link, FieldValue::Missing);
        assert!(matches!(
            built.warnings.as_slice(),
            [BuildWarning::UnknownIdentifierType { id_type, .. }] if id_type == "imdb"
        ));
    }

    #[test]
    fn test_tvdb_is_not_accepted_for_movies() {
        let built = build("/Movies/Heat (1995) {tvdb-1}/Heat (1995) [DVD]-GRP");
        assert_eq!(built.record.base().database_link, FieldValue::Missing);
        assert_eq!(built.warnings[0].field(), Field::IdType);
    }

    #[test]
    fn test_movie_file_id_wins() {
        let built = build("/Movies/Heat (1995) {tmdb-949}/Heat (1995) {tmdb-950} [DVD]-GRP");
        assert_eq!(built.record.base().database_link, "https://www.themoviedb.org/movie/950");
        assert_eq!(built.warnings[0].field(), Field::Id);
    }

    #[test]
    fn test_folder_mismatch_is_an_entry_error() {
        let builder = RecordBuilder::new().expect("grammar");
        let err = builder
            .build(&entry("/Shows/Gen V/Season 01/Gen V - S01E01 - God U"), Utf8Path::new("/media/x.mkv"))
            .expect_err("folder mismatch");
        assert!(matches!(
            err,
            EntryError::GrammarMismatch { pattern: PatternKind::MediaFolder, .. }
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_season_folder_mismatch_is_an_entry_error() {
        let builder = RecordBuilder::new().expect("grammar");
        let err = builder
            .build(
                &entry("/Shows/Gen V (2023) {tvdb-378165}/Extras/Gen V (2023) - S01E01 - God U"),
                Utf8Path::new("/media/x.mkv"),
            )
            .expect_err("season mismatch");
        assert!(matches!(
            err,
            EntryError::GrammarMismatch { pattern: PatternKind::SeasonFolder, .. }
        ));
    }

    #[test]
    fn test_build_as_rejects_other_kinds() {
        let builder = RecordBuilder::new().expect("grammar");
        let entry = entry("/Shows/Gen V (2023) {tvdb-378165}/Season 01/Gen V (2023) - S01E01 - God U");
        let err = builder
            .build_as(&entry, Utf8Path::new("/media/x.mkv"), MediaKind::Anime)
            .expect_err("kind mismatch");
        assert!(matches!(
            err,
            EntryError::KindMismatch {
                expected: MediaKind::Anime,
                found: MediaKind::Show,
                ..
            }
        ));
        assert!(
            builder
                .build_as(&entry, Utf8Path::new("/media/x.mkv"), MediaKind::Show)
                .is_ok()
        );
    }
}
