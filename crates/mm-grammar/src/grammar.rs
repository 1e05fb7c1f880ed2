//! Compiled patterns and the field extractor.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use mm_core::{Field, FieldValue};
use regex::Regex;

use crate::error::GrammarError;
use crate::fields::FieldMap;
use crate::patterns::PatternKind;

/// The compiled form of every [`PatternKind`].
#[derive(Debug)]
struct CompiledPatterns {
    media_folder: Regex,
    season_folder: Regex,
    show_episode: Regex,
    anime_episode: Regex,
    movie: Regex,
}

impl CompiledPatterns {
    fn compile() -> Result<Self, GrammarError> {
        Ok(Self {
            media_folder: compile_pattern(PatternKind::MediaFolder)?,
            season_folder: compile_pattern(PatternKind::SeasonFolder)?,
            show_episode: compile_pattern(PatternKind::ShowEpisode)?,
            anime_episode: compile_pattern(PatternKind::AnimeEpisode)?,
            movie: compile_pattern(PatternKind::Movie)?,
        })
    }

    const fn get(&self, pattern: PatternKind) -> &Regex {
        match pattern {
            PatternKind::MediaFolder => &self.media_folder,
            PatternKind::SeasonFolder => &self.season_folder,
            PatternKind::ShowEpisode => &self.show_episode,
            PatternKind::AnimeEpisode => &self.anime_episode,
            PatternKind::Movie => &self.movie,
        }
    }
}

/// Compiles one pattern and checks that every group names a [`Field`].
fn compile_pattern(pattern: PatternKind) -> Result<Regex, GrammarError> {
    let regex =
        Regex::new(pattern.source()).map_err(|source| GrammarError::Compile { pattern, source })?;

    if let Some(group) = regex
        .capture_names()
        .flatten()
        .find(|name| Field::from_name(name).is_none())
    {
        return Err(GrammarError::UnknownGroup {
            pattern,
            group: group.to_owned(),
        });
    }

    Ok(regex)
}

/// Process-wide cache of compiled patterns.
static COMPILED: OnceLock<CompiledPatterns> = OnceLock::new();

fn compiled() -> Result<&'static CompiledPatterns, GrammarError> {
    if let Some(patterns) = COMPILED.get() {
        return Ok(patterns);
    }

    let patterns = CompiledPatterns::compile()?;
    Ok(COMPILED.get_or_init(|| patterns))
}

/// The naming grammar.
///
/// Patterns are compiled once per process and shared. Each `Grammar` value
/// carries its own invocation counter, so callers can observe exactly how
/// many matches they triggered.
///
/// # Examples
///
/// ```
/// use mm_core::Field;
/// use mm_grammar::{Grammar, PatternKind};
///
/// let grammar = Grammar::new()?;
/// let fields = grammar
///     .extract(PatternKind::MediaFolder, "Gen V (2023) {tvdb-378165}")
///     .expect("folder matches");
///
/// assert_eq!(fields.get(Field::Title).map(|v| v.as_str()), Some("Gen V"));
/// assert_eq!(grammar.invocations(), 1);
/// # Ok::<(), mm_grammar::GrammarError>(())
/// ```
#[derive(Debug)]
pub struct Grammar {
    patterns: &'static CompiledPatterns,
    invocations: AtomicU64,
}

impl Grammar {
    /// Creates a grammar, compiling the patterns on first use.
    pub fn new() -> Result<Self, GrammarError> {
        Ok(Self {
            patterns: compiled()?,
            invocations: AtomicU64::new(0),
        })
    }

    /// Applies `pattern` to the whole of `text`.
    ///
    /// Returns `None` when the text does not match. On a match, every group
    /// the pattern declares is present in the map; absent or empty groups
    /// hold [`FieldValue::Unknown`].
    pub fn extract(&self, pattern: PatternKind, text: &str) -> Option<FieldMap> {
        self.invocations.fetch_add(1, Ordering::Relaxed);

        let regex = self.patterns.get(pattern);
        let captures = regex.captures(text)?;

        let mut fields = FieldMap::default();
        for name in regex.capture_names().flatten() {
            if let Some(field) = Field::from_name(name) {
                let capture = captures.name(name).map(|m| m.as_str());
                fields.insert(field, FieldValue::from_capture(capture));
            }
        }
        Some(fields)
    }

    /// Returns how many times [`extract`](Self::extract) has run.
    #[inline]
    #[must_use]
    pub fn invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar() -> Grammar {
        Grammar::new().expect("patterns compile")
    }

    fn value(fields: &FieldMap, field: Field) -> &str {
        fields.get(field).map_or("<undeclared>", FieldValue::as_str)
    }

    #[test]
    fn test_all_patterns_compile() {
        for pattern in PatternKind::ALL {
            assert!(compile_pattern(pattern).is_ok(), "{pattern} failed to compile");
        }
    }

    #[test]
    fn test_media_folder() {
        let fields = grammar()
            .extract(PatternKind::MediaFolder, "Marvel's Agents of S.H.I.E.L.D. (2013) {tvdb-263365}")
            .expect("match");
        assert_eq!(value(&fields, Field::Title), "Marvel's Agents of S.H.I.E.L.D.");
        assert_eq!(value(&fields, Field::ReleaseYear), "2013");
        assert_eq!(value(&fields, Field::IdType), "tvdb");
        assert_eq!(value(&fields, Field::Id), "263365");
    }

    #[test]
    fn test_media_folder_captures_unrecognized_id_types() {
        let fields = grammar()
            .extract(PatternKind::MediaFolder, "Heat (1995) {imdb-113277}")
            .expect("match");
        assert_eq!(value(&fields, Field::IdType), "imdb");
    }

    #[test]
    fn test_media_folder_rejects_malformed_names() {
        let grammar = grammar();
        assert!(grammar.extract(PatternKind::MediaFolder, "Gen V").is_none());
        assert!(grammar.extract(PatternKind::MediaFolder, "Gen V (2023)").is_none());
        assert!(grammar.extract(PatternKind::MediaFolder, "Gen V (23) {tvdb-1}").is_none());
        assert!(grammar.extract(PatternKind::MediaFolder, "Gen V (2023) {tvdb-abc}").is_none());
    }

    #[test]
    fn test_season_folder() {
        let grammar = grammar();
        let regular = grammar.extract(PatternKind::SeasonFolder, "Season 1").expect("match");
        assert_eq!(value(&regular, Field::SeasonNumber), "1");

        let specials = grammar.extract(PatternKind::SeasonFolder, "Specials").expect("match");
        assert_eq!(specials.get(Field::SeasonNumber), Some(&FieldValue::Unknown));

        assert!(grammar.extract(PatternKind::SeasonFolder, "Extras").is_none());
        assert!(grammar.extract(PatternKind::SeasonFolder, "season 1").is_none());
    }

    #[test]
    fn test_show_episode_with_combined_custom_format() {
        let fields = grammar()
            .extract(
                PatternKind::ShowEpisode,
                "Gen V (2023) - S01E06 - Jumanji [AMZN WEBDL-720p][EAC3 5.1][h264]-NTb",
            )
            .expect("match");
        assert_eq!(value(&fields, Field::Title), "Gen V");
        assert_eq!(value(&fields, Field::ReleaseYear), "2023");
        assert_eq!(value(&fields, Field::SeasonNumber), "01");
        assert_eq!(value(&fields, Field::EpisodeNumber), "06");
        assert_eq!(value(&fields, Field::EpisodeTitle), "Jumanji");
        assert_eq!(value(&fields, Field::CustomFormat), "AMZN");
        assert_eq!(value(&fields, Field::QualityTitle), "WEBDL-720p");
        assert_eq!(value(&fields, Field::AudioCodec), "EAC3");
        assert_eq!(value(&fields, Field::AudioChannels), "5.1");
        assert_eq!(value(&fields, Field::VideoDynamicRange), "Unknown");
        assert_eq!(value(&fields, Field::VideoCodec), "h264");
        assert_eq!(value(&fields, Field::ReleaseGroup), "NTb");
    }

    #[test]
    fn test_quality_title_with_remux_is_not_split() {
        let fields = grammar()
            .extract(
                PatternKind::ShowEpisode,
                "Chernobyl (2019) - S01E01 - 1:23:45 [Bluray-1080p Remux][DTS-HD MA 5.1][x264]-EPSiLON",
            )
            .expect("match");
        assert_eq!(value(&fields, Field::CustomFormat), "Unknown");
        assert_eq!(value(&fields, Field::QualityTitle), "Bluray-1080p Remux");
        assert_eq!(value(&fields, Field::AudioCodec), "DTS-HD MA");
        assert_eq!(value(&fields, Field::AudioChannels), "5.1");
    }

    #[test]
    fn test_multi_word_custom_format() {
        let fields = grammar()
            .extract(
                PatternKind::ShowEpisode,
                "Severance (2022) - S02E01 - Hello, Ms. Cobel [ATVP Proper WEBDL-2160p][EAC3 Atmos 5.1][DV HDR10][h265]-FLUX",
            )
            .expect("match");
        assert_eq!(value(&fields, Field::CustomFormat), "ATVP Proper");
        assert_eq!(value(&fields, Field::AudioCodec), "EAC3 Atmos");
        assert_eq!(value(&fields, Field::VideoDynamicRange), "DV HDR10");
        assert_eq!(value(&fields, Field::EpisodeTitle), "Hello, Ms. Cobel");
    }

    #[test]
    fn test_show_episode_without_brackets() {
        let fields = grammar()
            .extract(PatternKind::ShowEpisode, "Severance - S01E01 - Good News About Hell")
            .expect("match");
        assert_eq!(value(&fields, Field::Title), "Severance");
        assert_eq!(value(&fields, Field::ReleaseYear), "Unknown");
        assert_eq!(value(&fields, Field::EpisodeTitle), "Good News About Hell");
        assert_eq!(value(&fields, Field::QualityTitle), "Unknown");
        assert_eq!(value(&fields, Field::ReleaseGroup), "Unknown");
    }

    #[test]
    fn test_anime_episode() {
        let fields = grammar()
            .extract(
                PatternKind::AnimeEpisode,
                "DAN DA DAN (2024) - S01E11 - 011 - First Love [WEBDL-1080p][8bit][x264][AAC 2.0][JA+EN]-MALD",
            )
            .expect("match");
        assert_eq!(value(&fields, Field::Title), "DAN DA DAN");
        assert_eq!(value(&fields, Field::AbsoluteEpisodeNumber), "011");
        assert_eq!(value(&fields, Field::EpisodeTitle), "First Love");
        assert_eq!(value(&fields, Field::QualityTitle), "WEBDL-1080p");
        assert_eq!(value(&fields, Field::VideoBitDepth), "8");
        assert_eq!(value(&fields, Field::VideoCodec), "x264");
        assert_eq!(value(&fields, Field::AudioCodec), "AAC");
        assert_eq!(value(&fields, Field::AudioChannels), "2.0");
        assert_eq!(value(&fields, Field::AudioLanguages), "JA+EN");
        assert_eq!(value(&fields, Field::ReleaseGroup), "MALD");
    }

    #[test]
    fn test_anime_pattern_rejects_specials_without_absolute_number() {
        let grammar = grammar();
        let special = "DAN DA DAN (2024) - S00E01 - Recap [WEBDL-1080p][AAC 2.0][x264]-MALD";
        assert!(grammar.extract(PatternKind::AnimeEpisode, special).is_none());

        let fields = grammar
            .extract(PatternKind::ShowEpisode, special)
            .expect("show pattern accepts specials");
        assert_eq!(value(&fields, Field::SeasonNumber), "00");
        assert_eq!(value(&fields, Field::EpisodeTitle), "Recap");
        assert_eq!(value(&fields, Field::VideoCodec), "x264");
    }

    #[test]
    fn test_movie_with_every_marker() {
        let fields = grammar()
            .extract(
                PatternKind::Movie,
                "Doctor Strange in the Multiverse of Madness (2022) {tmdb-453395} {edition-Imax} [DSNP IMAX Enhanced][WEBDL-720p][EAC3 Atmos 5.1][h264]-playWEB",
            )
            .expect("match");
        assert_eq!(value(&fields, Field::Title), "Doctor Strange in the Multiverse of Madness");
        assert_eq!(value(&fields, Field::Id), "453395");
        assert_eq!(value(&fields, Field::Edition), "Imax");
        assert_eq!(value(&fields, Field::CustomFormat), "DSNP IMAX Enhanced");
        assert_eq!(value(&fields, Field::QualityTitle), "WEBDL-720p");
        assert_eq!(value(&fields, Field::AudioCodec), "EAC3 Atmos");
        assert_eq!(value(&fields, Field::AudioChannels), "5.1");
        assert_eq!(value(&fields, Field::VideoCodec), "h264");
        assert_eq!(value(&fields, Field::ReleaseGroup), "playWEB");
    }

    #[test]
    fn test_movie_without_optional_markers() {
        let fields = grammar()
            .extract(
                PatternKind::Movie,
                "Shrek the Third (2007) {tmdb-810} [Bluray-1080p][3D][DTS 5.1][x264]-GROUP",
            )
            .expect("match");
        assert_eq!(value(&fields, Field::Edition), "Unknown");
        assert_eq!(value(&fields, Field::CustomFormat), "Unknown");
        assert_eq!(value(&fields, Field::QualityTitle), "Bluray-1080p");
        assert_eq!(value(&fields, Field::ThreeDInfo), "3D");
        assert_eq!(value(&fields, Field::ReleaseGroup), "GROUP");
    }

    #[test]
    fn test_movie_is_case_insensitive() {
        let fields = grammar()
            .extract(PatternKind::Movie, "Heat (1995) {TMDB-949} [bluray-2160p][x265]-grp")
            .expect("match");
        assert_eq!(value(&fields, Field::IdType), "TMDB");
        assert_eq!(value(&fields, Field::QualityTitle), "bluray-2160p");
        assert_eq!(value(&fields, Field::VideoCodec), "x265");
    }

    #[test]
    fn test_present_but_empty_groups_are_unknown() {
        let grammar = grammar();
        let movie = grammar
            .extract(PatternKind::Movie, "Heat (1995) {tmdb-949} {edition-} [][DVD]-GRP")
            .expect("match");
        assert_eq!(movie.get(Field::Edition), Some(&FieldValue::Unknown));
        assert_eq!(movie.get(Field::CustomFormat), Some(&FieldValue::Unknown));
        assert_eq!(value(&movie, Field::QualityTitle), "DVD");

        let show = grammar
            .extract(PatternKind::ShowEpisode, "Gen V (2023) - S01E01 - God U [ WEBDL-720p]-NTb")
            .expect("match");
        assert_eq!(show.get(Field::CustomFormat), Some(&FieldValue::Unknown));

        for fields in [&movie, &show] {
            assert!(fields.iter().all(|(_, value)| !value.as_str().is_empty()));
        }
    }

    #[test]
    fn test_undeclared_fields_are_absent() {
        let fields = grammar()
            .extract(PatternKind::ShowEpisode, "Severance - S01E01 - Good News About Hell")
            .expect("match");
        assert!(!fields.declares(Field::AbsoluteEpisodeNumber));
        assert!(!fields.declares(Field::Edition));
        assert!(fields.declares(Field::VideoBitDepth));
    }

    #[test]
    fn test_invocations_count_every_attempt() {
        let grammar = grammar();
        assert_eq!(grammar.invocations(), 0);
        grammar.extract(PatternKind::SeasonFolder, "Season 02");
        grammar.extract(PatternKind::SeasonFolder, "not a season");
        assert_eq!(grammar.invocations(), 2);

        let other = Grammar::new().expect("patterns compile");
        assert_eq!(other.invocations(), 0);
    }
}
