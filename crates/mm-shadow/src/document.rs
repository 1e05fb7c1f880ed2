//! The persisted `<Media>` document.
//!
//! A materialized entry holds an XML document with a `<Media>` root and one
//! child element per field:
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <Media>
//!   <Type>Show</Type>
//!   <Title>Gen V</Title>
//!   <ReleaseYear>2023</ReleaseYear>
//!   ...
//!   <EpisodeTitle>Jumanji</EpisodeTitle>
//! </Media>
//! ```
//!
//! Element names come from [`Field::element_name`]. A document carries
//! exactly the elements its `Type` models; an element of another kind, an
//! unknown element or a missing one makes the document invalid. The relative
//! path is not stored, it is the entry's own location.

use camino::Utf8Path;
use mm_core::{
    AnimeRecord, EpisodeInfo, Field, FieldValue, MediaBase, MediaKind, MovieRecord, Record, SeasonKind,
    SeasonNumber, ShowRecord,
};
use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Name of the root element.
pub const ROOT: &str = "Media";

const DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Why persisted content is not a valid document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The content is not UTF-8 text.
    #[error("content is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The content is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// An element names no field, or a field the kind does not model.
    #[error("unexpected element <{0}>")]
    UnexpectedElement(String),

    /// A modeled field has no element.
    #[error("missing element <{0}>")]
    MissingElement(&'static str),

    /// An element's text is not a valid value for its field.
    #[error("invalid <{element}> value '{value}'")]
    InvalidValue {
        /// The element name.
        element: &'static str,
        /// The text found.
        value: String,
    },
}

/// Serializes a record's persisted fields as a map of element to text.
struct Elements<'a>(&'a Record);

impl Serialize for Elements<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.0.kind().fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for field in fields {
            if let (Some(name), Some(value)) = (field.element_name(), self.0.field(field)) {
                map.serialize_entry(name, value.as_ref())?;
            }
        }
        map.end()
    }
}

/// Renders `record` as an indented document with an XML declaration and a
/// trailing newline.
///
/// # Errors
///
/// Returns [`quick_xml::SeError`] if the XML writer fails.
pub fn render(record: &Record) -> Result<String, quick_xml::SeError> {
    let mut xml = String::from(DECLARATION);
    let mut serializer = quick_xml::se::Serializer::with_root(&mut xml, Some(ROOT))?;
    serializer.indent(' ', 2);
    Elements(record).serialize(serializer)?;
    xml.push('\n');
    Ok(xml)
}

/// Parses a document into the record stored at `relative_path`.
///
/// Element text is read back with sentinel normalization, so a value
/// persisted as `Unknown` or `Missing` loads as that sentinel.
///
/// # Errors
///
/// Returns [`DocumentError`] if `text` is not a valid document.
pub fn parse(text: &str, relative_path: &Utf8Path) -> Result<Record, DocumentError> {
    let mut elements: FxHashMap<String, String> = quick_xml::de::from_str(text.trim_start_matches('\u{feff}'))?;

    let kind_element = element(Field::Kind);
    let kind_text = elements
        .remove(kind_element)
        .ok_or(DocumentError::MissingElement(kind_element))?;
    let kind = MediaKind::from_label(kind_text.trim()).ok_or(DocumentError::InvalidValue {
        element: kind_element,
        value: kind_text,
    })?;

    let modeled = kind.fields();
    if let Some(name) = elements
        .keys()
        .find(|name| Field::from_element(name).is_none_or(|field| !modeled.contains(&field)))
    {
        return Err(DocumentError::UnexpectedElement(name.clone()));
    }

    let mut reader = Reader { elements };
    let base = MediaBase {
        relative_path: relative_path.to_owned(),
        title: reader.value(Field::Title)?,
        release_year: reader.value(Field::ReleaseYear)?,
        database_link: reader.value(Field::DatabaseLink)?,
        extension: reader.value(Field::Extension)?,
        custom_format: reader.value(Field::CustomFormat)?,
        quality_title: reader.value(Field::QualityTitle)?,
        video_dynamic_range: reader.value(Field::VideoDynamicRange)?,
        video_codec: reader.value(Field::VideoCodec)?,
        audio_codec: reader.value(Field::AudioCodec)?,
        audio_channels: reader.value(Field::AudioChannels)?,
        release_group: reader.value(Field::ReleaseGroup)?,
    };

    let record = match kind {
        MediaKind::Movie => Record::Movie(MovieRecord {
            base,
            edition: reader.value(Field::Edition)?,
            three_d_info: reader.value(Field::ThreeDInfo)?,
        }),
        MediaKind::Show => Record::Show(ShowRecord {
            base,
            episode: reader.episode()?,
        }),
        MediaKind::Anime => Record::Anime(AnimeRecord {
            base,
            episode: reader.episode()?,
            absolute_episode_number: reader.value(Field::AbsoluteEpisodeNumber)?,
            video_bit_depth: reader.value(Field::VideoBitDepth)?,
            audio_languages: reader.value(Field::AudioLanguages)?,
        }),
    };
    Ok(record)
}

/// Element name of a field the document stores.
fn element(field: Field) -> &'static str {
    field.element_name().unwrap_or_else(|| field.as_str())
}

struct Reader {
    elements: FxHashMap<String, String>,
}

impl Reader {
    fn text(&mut self, field: Field) -> Result<(&'static str, String), DocumentError> {
        let name = element(field);
        let text = self
            .elements
            .remove(name)
            .ok_or(DocumentError::MissingElement(name))?;
        Ok((name, text))
    }

    fn value(&mut self, field: Field) -> Result<FieldValue, DocumentError> {
        self.text(field).map(|(_, text)| FieldValue::from(text.trim()))
    }

    fn episode(&mut self) -> Result<EpisodeInfo, DocumentError> {
        let (name, text) = self.text(Field::SeasonKind)?;
        let season_kind = SeasonKind::from_label(text.trim())
            .ok_or(DocumentError::InvalidValue { element: name, value: text })?;

        let (name, text) = self.text(Field::SeasonNumber)?;
        let season_number = SeasonNumber::parse(&text)
            .ok_or(DocumentError::InvalidValue { element: name, value: text })?;

        Ok(EpisodeInfo {
            season_kind,
            season_number,
            episode_number: self.value(Field::EpisodeNumber)?,
            episode_title: self.value(Field::EpisodeTitle)?,
        })
    }
}
