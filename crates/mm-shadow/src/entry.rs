//! Shadow entries and their path layout.

use camino::{Utf8Path, Utf8PathBuf};
use mm_core::{KindDirs, MediaKind};

use crate::error::{EntryError, ScanError};

/// One file in the shadow tree.
///
/// The kind is classified from the top-level directory when the entry is
/// created, so every entry a run sees already has a known kind.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use mm_core::{KindDirs, MediaKind};
/// use mm_shadow::ShadowEntry;
///
/// let entry = ShadowEntry::new(
///     Utf8Path::new("/srv/mirror"),
///     "/srv/mirror/Movies/Heat (1995) {tmdb-949}/Heat (1995) {tmdb-949} [DVD]-GRP.xml".into(),
///     &KindDirs::default(),
/// )?;
///
/// assert_eq!(entry.kind(), MediaKind::Movie);
/// assert_eq!(
///     entry.relative_path().as_str(),
///     "/Movies/Heat (1995) {tmdb-949}/Heat (1995) {tmdb-949} [DVD]-GRP.xml"
/// );
/// # Ok::<(), mm_shadow::ScanError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadowEntry {
    shadow_path: Utf8PathBuf,
    relative_path: Utf8PathBuf,
    kind: MediaKind,
}

/// The name segments of a shadow entry's relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout<'a> {
    /// `Title (Year) {idtype-id}`
    pub media_folder: &'a str,
    /// `Season N` or `Specials`, for episodic kinds.
    pub season_folder: Option<&'a str>,
    /// The entry's file stem, which is the media filename.
    pub file_stem: &'a str,
}

impl ShadowEntry {
    /// Creates an entry for `shadow_path` found under `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::UnknownKind`] when the top-level directory is not
    /// one of `kind_dirs`.
    pub fn new(root: &Utf8Path, shadow_path: Utf8PathBuf, kind_dirs: &KindDirs) -> Result<Self, ScanError> {
        let relative = shadow_path.strip_prefix(root).unwrap_or(shadow_path.as_path());
        let segments: Vec<&str> = relative
            .components()
            .filter_map(|component| match component {
                camino::Utf8Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();
        let relative_path = Utf8PathBuf::from(format!("/{}", segments.join("/")));

        let segment = segments.first().copied().unwrap_or_default();
        let kind = kind_dirs
            .classify(segment)
            .ok_or_else(|| ScanError::unknown_kind(relative_path.clone(), segment))?;

        Ok(Self {
            shadow_path,
            relative_path,
            kind,
        })
    }

    /// Returns the on-disk path of the entry.
    #[inline]
    #[must_use]
    pub fn shadow_path(&self) -> &Utf8Path {
        &self.shadow_path
    }

    /// Returns the `/`-separated path relative to the shadow root, with a
    /// leading `/`.
    #[inline]
    #[must_use]
    pub fn relative_path(&self) -> &Utf8Path {
        &self.relative_path
    }

    /// Returns the kind classified from the top-level directory.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Splits the relative path into its media folder, season folder and
    /// file stem.
    ///
    /// Movies need `/<Kind>/<MediaFolder>/<entry>`; episodic kinds need
    /// `/<Kind>/<MediaFolder>/<SeasonFolder>/<entry>`.
    ///
    /// # Errors
    ///
    /// Returns [`EntryError::Layout`] when the entry sits at the wrong depth.
    pub fn layout(&self) -> Result<Layout<'_>, EntryError> {
        let segments: Vec<&str> = self.relative_path.as_str().split('/').skip(1).collect();
        let file_stem = self.relative_path.file_stem().unwrap_or_default();

        let (media_folder, season_folder) = match (self.kind.is_episodic(), segments.as_slice()) {
            (false, [_, media, _]) => (*media, None),
            (true, [_, media, season, _]) => (*media, Some(*season)),
            (false, _) => return Err(self.layout_error("movie entries must sit directly in a media folder")),
            (true, _) => return Err(self.layout_error("episode entries must sit in a season folder")),
        };

        Ok(Layout {
            media_folder,
            season_folder,
            file_stem,
        })
    }

    fn layout_error(&self, reason: &'static str) -> EntryError {
        EntryError::Layout {
            path: self.relative_path.clone(),
            reason,
        }
    }
}
