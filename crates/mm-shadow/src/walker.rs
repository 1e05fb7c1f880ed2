//! Shadow tree traversal.
//!
//! [`EntryWalker`] uses the `ignore` crate to enumerate shadow entry files
//! below the root, in a stable (file-name sorted) order, and classifies each
//! one into a [`ShadowEntry`].
//!
//! Hidden files and directories are skipped, so tool droppings such as
//! `.stfolder` never reach classification. Files sitting directly in the
//! root are not entries and are skipped too.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::WalkBuilder;
use mm_core::{ConfigError, KindDirs, MirrorConfig};
use tracing::debug;

use crate::entry::ShadowEntry;
use crate::error::ScanError;

/// Discovers shadow entries in a shadow tree.
///
/// # Examples
///
/// ```no_run
/// use mm_core::MirrorConfig;
/// use mm_shadow::EntryWalker;
///
/// let config = MirrorConfig {
///     root: "/srv/mirror".into(),
///     ..MirrorConfig::default()
/// };
/// let walker = EntryWalker::new(&config)?;
/// for entry in walker.collect_entries()? {
///     println!("{} {}", entry.kind(), entry.relative_path());
/// }
/// # Ok::<(), mm_shadow::ScanError>(())
/// ```
#[derive(Debug)]
pub struct EntryWalker {
    /// The shadow root.
    root: Utf8PathBuf,
    /// Top-level kind directory names.
    kind_dirs: KindDirs,
    /// Shadow entry extension, without the dot.
    extension: String,
    /// Whether to follow symbolic links.
    follow_links: bool,
}

impl EntryWalker {
    /// Creates a walker for the root described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the root doesn't exist or isn't a
    /// directory.
    pub fn new(config: &MirrorConfig) -> Result<Self, ScanError> {
        if !config.root.is_dir() {
            return Err(ConfigError::MissingDirectory(config.root.clone()).into());
        }

        Ok(Self {
            root: config.root.clone(),
            kind_dirs: config.kind_dirs.clone(),
            extension: config.entry_extension.clone(),
            follow_links: config.follow_links,
        })
    }

    /// Collects every shadow entry below the root.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Walk`] if traversal fails,
    /// [`ScanError::NonUtf8Path`] for a non-UTF-8 path, and
    /// [`ScanError::UnknownKind`] for an entry under an unrecognized
    /// top-level directory.
    pub fn collect_entries(&self) -> Result<Vec<ShadowEntry>, ScanError> {
        let mut entries = Vec::new();

        for result in self.build_walker() {
            let dir_entry = result?;

            if !dir_entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = dir_entry.path();
            let utf8_path = Utf8Path::from_path(path).ok_or_else(|| ScanError::NonUtf8Path(path.to_owned()))?;

            if !self.is_shadow_entry(utf8_path) {
                debug!(path = %utf8_path, "Skipping non-entry file");
                continue;
            }

            // Depth 1 holds files directly in the root.
            if dir_entry.depth() < 2 {
                debug!(path = %utf8_path, "Skipping file outside kind directories");
                continue;
            }

            entries.push(ShadowEntry::new(&self.root, utf8_path.to_owned(), &self.kind_dirs)?);
        }

        Ok(entries)
    }

    fn build_walker(&self) -> ignore::Walk {
        WalkBuilder::new(&self.root)
            // Hidden files only; a media library has no .gitignore semantics
            .standard_filters(false)
            .hidden(true)
            .follow_links(self.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
    }

    fn is_shadow_entry(&self, path: &Utf8Path) -> bool {
        path.extension().is_some_and(|ext| ext == self.extension)
    }

    /// Returns the shadow root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config(root: &Utf8Path) -> MirrorConfig {
        MirrorConfig {
            root: root.to_owned(),
            ..MirrorConfig::default()
        }
    }

    fn touch(root: &Utf8Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        fs::write(path, "x").expect("write");
    }

    #[test]
    fn test_missing_root() {
        let err = EntryWalker::new(&config(Utf8Path::new("/definitely/not/here"))).expect_err("missing");
        assert!(matches!(err, ScanError::Config(ConfigError::MissingDirectory(_))));
    }

    #[test]
    fn test_collects_entries_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8 tempdir");
        touch(root, "Shows/B (2020) {tvdb-2}/Season 01/b.xml");
        touch(root, "Movies/A (2020) {tmdb-1}/a.xml");
        touch(root, "Movies/A (2020) {tmdb-1}/a.nfo");
        touch(root, "Movies/.hidden/c.xml");
        touch(root, "stray.xml");

        let walker = EntryWalker::new(&config(root)).expect("walker");
        let entries = walker.collect_entries().expect("entries");
        let paths: Vec<&str> = entries.iter().map(|e| e.relative_path().as_str()).collect();

        assert_eq!(
            paths,
            ["/Movies/A (2020) {tmdb-1}/a.xml", "/Shows/B (2020) {tvdb-2}/Season 01/b.xml"]
        );
    }

    #[test]
    fn test_unknown_kind_directory_aborts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = Utf8Path::from_path(dir.path()).expect("utf8 tempdir");
        touch(root, "Music/A (2020) {tmdb-1}/a.xml");

        let walker = EntryWalker::new(&config(root)).expect("walker");
        assert!(matches!(
            walker.collect_entries(),
            Err(ScanError::UnknownKind { .. })
        ));
    }
}
