//! Configuration structures for media-mirror.
//!
//! - [`MirrorConfig`] - Shadow tree layout and path handling
//! - [`CheckConfig`] - Consistency checker settings
//! - [`Config`] - Root configuration combining both
//!
//! All types implement [`Default`] and deserialize with `#[serde(default)]`,
//! so a configuration file only needs the keys it overrides.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Field, MediaKind};

/// Names of the top-level kind directories in the shadow tree.
///
/// # Examples
///
/// ```
/// use mm_core::{KindDirs, MediaKind};
///
/// let dirs = KindDirs::default();
/// assert_eq!(dirs.classify("Shows"), Some(MediaKind::Show));
/// assert_eq!(dirs.classify("Music"), None);
/// assert_eq!(dirs.dir(MediaKind::Movie), "Movies");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindDirs {
    /// Directory holding movie folders.
    pub movies: String,
    /// Directory holding show folders.
    pub shows: String,
    /// Directory holding anime folders.
    pub anime: String,
}

impl KindDirs {
    /// Maps a top-level directory name to its kind.
    #[must_use]
    pub fn classify(&self, segment: &str) -> Option<MediaKind> {
        MediaKind::ALL
            .into_iter()
            .find(|kind| self.dir(*kind) == segment)
    }

    /// Returns the directory name for `kind`.
    #[must_use]
    pub fn dir(&self, kind: MediaKind) -> &str {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::Show => &self.shows,
            MediaKind::Anime => &self.anime,
        }
    }
}

impl Default for KindDirs {
    fn default() -> Self {
        Self {
            movies: "Movies".to_owned(),
            shows: "Shows".to_owned(),
            anime: "Anime".to_owned(),
        }
    }
}

/// Shadow tree settings.
///
/// # Examples
///
/// ```
/// use mm_core::MirrorConfig;
///
/// let config = MirrorConfig::default();
/// assert_eq!(config.entry_extension, "xml");
/// assert_eq!(config.long_path_threshold, 250);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Root of the shadow tree.
    pub root: Utf8PathBuf,

    /// Top-level kind directory names.
    pub kind_dirs: KindDirs,

    /// Extension of shadow entry files, without the dot.
    pub entry_extension: String,

    /// Path length above which paths are escaped before opening (Windows).
    pub long_path_threshold: usize,

    /// Whether to follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::new(),
            kind_dirs: KindDirs::default(),
            entry_extension: "xml".to_owned(),
            long_path_threshold: 250,
            follow_links: false,
        }
    }
}

/// Consistency checker settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Fields reported when they hold a sentinel value.
    pub flag_unknown_fields: Vec<Field>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            flag_unknown_fields: vec![Field::VideoBitDepth, Field::AudioLanguages],
        }
    }
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use mm_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"mirror": {"entry_extension": "json"}}"#)
///     .expect("valid config");
/// assert_eq!(config.mirror.entry_extension, "json");
/// assert_eq!(config.mirror.kind_dirs.anime, "Anime");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shadow tree settings.
    pub mirror: MirrorConfig,

    /// Consistency checker settings.
    pub check: CheckConfig,
}

impl Config {
    /// Reads and validates a JSON configuration file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dirs = &self.mirror.kind_dirs;
        for kind in MediaKind::ALL {
            let dir = dirs.dir(kind);
            if dir.is_empty() || dir.contains(['/', '\\']) {
                return Err(ConfigError::InvalidOption {
                    option: format!("mirror.kind_dirs.{}", kind.label().to_lowercase()),
                    reason: format!("'{dir}' is not a single directory name"),
                });
            }
            if dirs.classify(dir) != Some(kind) {
                return Err(ConfigError::InvalidOption {
                    option: "mirror.kind_dirs".to_owned(),
                    reason: format!("'{dir}' is used for more than one kind"),
                });
            }
        }

        let extension = &self.mirror.entry_extension;
        if extension.is_empty() || extension.starts_with('.') {
            return Err(ConfigError::InvalidOption {
                option: "mirror.entry_extension".to_owned(),
                reason: format!("'{extension}' must be non-empty and given without a dot"),
            });
        }

        if self.mirror.long_path_threshold == 0 {
            return Err(ConfigError::InvalidOption {
                option: "mirror.long_path_threshold".to_owned(),
                reason: "must be positive".to_owned(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_duplicate_kind_dirs_rejected() {
        let mut config = Config::default();
        config.mirror.kind_dirs.anime = "Shows".to_owned();
        let err = config.validate().expect_err("duplicate dirs");
        assert!(err.to_string().contains("more than one kind"));
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let mut config = Config::default();
        config.mirror.entry_extension = ".xml".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).expect("serialize");
        let parsed: Config = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_check_fields_deserialize_by_name() {
        let config: Config =
            serde_json::from_str(r#"{"check": {"flag_unknown_fields": ["release_group"]}}"#)
                .expect("deserialize");
        assert_eq!(config.check.flag_unknown_fields, vec![Field::ReleaseGroup]);
        assert_eq!(config.mirror.long_path_threshold, 250);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("media-mirror.json");
        std::fs::write(&path, r#"{"mirror": {"kind_dirs": {"movies": "Films"}}}"#)
            .expect("write config");

        let path = Utf8Path::from_path(&path).expect("utf-8 path");
        let config = Config::load(path).expect("load");
        assert_eq!(config.mirror.kind_dirs.classify("Films"), Some(MediaKind::Movie));
        assert_eq!(config.mirror.kind_dirs.shows, "Shows");
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write config");

        let path = Utf8Path::from_path(&path).expect("utf-8 path");
        assert!(matches!(Config::load(path), Err(ConfigError::Parse(_))));
    }
}
