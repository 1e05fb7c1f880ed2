//! Canonical filename rendering.
//!
//! The rendering order mirrors the bracket order of the file patterns, so a
//! record parsed from a conventional filename renders back to that name.
//! Sentinel-valued fields are left out, as the organizing tools omit them.
//! A concrete `Unknown` quality, which the grammar recognizes as a quality
//! title, is rendered like any other value.

use mm_core::{DatabaseIdType, EpisodeInfo, Field, FieldValue, MediaBase, Record};
use smallvec::{SmallVec, smallvec};

/// One rendered piece of a filename and the fields it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The rendered text, including its leading separator.
    pub text: String,
    /// The fields rendered into this piece.
    pub fields: SmallVec<[Field; 2]>,
}

impl Segment {
    fn new(text: String, fields: SmallVec<[Field; 2]>) -> Self {
        Self { text, fields }
    }
}

/// Renders the canonical filename pieces for `record`, in order.
#[must_use]
pub fn render_segments(record: &Record) -> Vec<Segment> {
    let base = record.base();
    let mut segments = Vec::with_capacity(12);

    if let Some(title) = base.title.value() {
        segments.push(Segment::new(title.to_owned(), smallvec![Field::Title]));
    }
    if let Some(year) = base.release_year.value() {
        segments.push(Segment::new(format!(" ({year})"), smallvec![Field::ReleaseYear]));
    }

    let mut brackets = Vec::with_capacity(6);
    match record {
        Record::Movie(movie) => {
            if let Some((id_type, id)) = base.database_link.value().and_then(DatabaseIdType::parse_link) {
                segments.push(Segment::new(
                    format!(" {{{id_type}-{id}}}"),
                    smallvec![Field::DatabaseLink],
                ));
            }
            if let Some(edition) = movie.edition.value() {
                segments.push(Segment::new(format!(" {{edition-{edition}}}"), smallvec![Field::Edition]));
            }

            if let Some(quality) = base.quality_title.value() {
                if let Some(custom_format) = base.custom_format.value() {
                    brackets.push(bracket(custom_format, Field::CustomFormat));
                }
                brackets.push(bracket(quality, Field::QualityTitle));
            }
            push_bracket(&mut brackets, &movie.three_d_info, Field::ThreeDInfo);
            push_bracket(&mut brackets, &base.video_dynamic_range, Field::VideoDynamicRange);
            push_audio(&mut brackets, base);
            push_bracket(&mut brackets, &base.video_codec, Field::VideoCodec);
        }
        Record::Show(show) => {
            push_episode(&mut segments, &show.episode, None);
            push_quality(&mut brackets, base);
            push_audio(&mut brackets, base);
            push_bracket(&mut brackets, &base.video_dynamic_range, Field::VideoDynamicRange);
            push_bracket(&mut brackets, &base.video_codec, Field::VideoCodec);
        }
        Record::Anime(anime) => {
            push_episode(&mut segments, &anime.episode, Some(&anime.absolute_episode_number));
            push_quality(&mut brackets, base);
            push_bracket(&mut brackets, &base.video_dynamic_range, Field::VideoDynamicRange);
            if let Some(depth) = anime.video_bit_depth.value() {
                brackets.push(bracket(&format!("{depth}bit"), Field::VideoBitDepth));
            }
            push_bracket(&mut brackets, &base.video_codec, Field::VideoCodec);
            push_audio(&mut brackets, base);
            push_bracket(&mut brackets, &anime.audio_languages, Field::AudioLanguages);
        }
    }

    if let Some(first) = brackets.first_mut() {
        first.text.insert(0, ' ');
    }
    segments.extend(brackets);

    if let Some(group) = base.release_group.value() {
        segments.push(Segment::new(format!("-{group}"), smallvec![Field::ReleaseGroup]));
    }

    segments
}

/// Renders the canonical filename for `record`, without extension.
///
/// # Examples
///
/// ```
/// use mm_core::Record;
/// use mm_grammar::render_file_name;
///
/// let record: Record = serde_json::from_value(serde_json::json!({
///     "kind": "Movie",
///     "relative_path": "/Movies/Heat (1995) {tmdb-949}/Heat (1995) {tmdb-949} [DVD]-GRP.xml",
///     "title": "Heat", "release_year": "1995",
///     "database_link": "https://www.themoviedb.org/movie/949", "extension": ".mkv",
///     "custom_format": "Unknown", "quality_title": "DVD", "video_dynamic_range": "Unknown",
///     "video_codec": "Unknown", "audio_codec": "Unknown", "audio_channels": "Unknown",
///     "release_group": "GRP", "edition": "Unknown", "three_d_info": "Unknown"
/// }))?;
///
/// assert_eq!(render_file_name(&record), "Heat (1995) {tmdb-949} [DVD]-GRP");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[must_use]
pub fn render_file_name(record: &Record) -> String {
    render_segments(record)
        .into_iter()
        .map(|segment| segment.text)
        .collect()
}

fn bracket(text: &str, field: Field) -> Segment {
    Segment::new(format!("[{text}]"), smallvec![field])
}

fn push_bracket(brackets: &mut Vec<Segment>, value: &FieldValue, field: Field) {
    if let Some(text) = value.value() {
        brackets.push(bracket(text, field));
    }
}

/// `[CustomFormat Quality]`, the combined episode form.
fn push_quality(brackets: &mut Vec<Segment>, base: &MediaBase) {
    let Some(quality) = base.quality_title.value() else {
        return;
    };
    match base.custom_format.value() {
        Some(custom_format) => brackets.push(Segment::new(
            format!("[{custom_format} {quality}]"),
            smallvec![Field::CustomFormat, Field::QualityTitle],
        )),
        None => brackets.push(bracket(quality, Field::QualityTitle)),
    }
}

/// `[AudioCodec Channels]`; both halves are required.
fn push_audio(brackets: &mut Vec<Segment>, base: &MediaBase) {
    if let (Some(codec), Some(channels)) = (base.audio_codec.value(), base.audio_channels.value()) {
        brackets.push(Segment::new(
            format!("[{codec} {channels}]"),
            smallvec![Field::AudioCodec, Field::AudioChannels],
        ));
    }
}

/// ` - S01E06[ - 011] - Episode Title`
fn push_episode(segments: &mut Vec<Segment>, episode: &EpisodeInfo, absolute: Option<&FieldValue>) {
    if let Some(number) = episode.episode_number.value() {
        segments.push(Segment::new(
            format!(" - S{}E{number}", episode.season_number),
            smallvec![Field::SeasonNumber, Field::EpisodeNumber],
        ));
    }
    if let Some(absolute) = absolute.and_then(FieldValue::value) {
        segments.push(Segment::new(format!(" - {absolute}"), smallvec![Field::AbsoluteEpisodeNumber]));
    }
    if let Some(title) = episode.episode_title.value() {
        segments.push(Segment::new(format!(" - {title}"), smallvec![Field::EpisodeTitle]));
    }
}
