//! Filename normalization and long-path escaping.

use camino::{Utf8Path, Utf8PathBuf};

/// Characters that are not allowed in filenames on common filesystems.
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Prefix that lifts the Windows `MAX_PATH` limit.
const EXTENDED_LENGTH_PREFIX: &str = r"\\?\";

/// Normalizes a name the way shadow filenames are normalized.
///
/// Control characters are dropped. Non-ASCII characters and characters that
/// are invalid in filenames become `_`.
///
/// # Examples
///
/// ```
/// use mm_core::sanitize_filename;
///
/// assert_eq!(sanitize_filename("What If...? (2021)"), "What If..._ (2021)");
/// assert_eq!(sanitize_filename("Pokémon"), "Pok_mon");
/// assert_eq!(sanitize_filename("Gen V"), "Gen V");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control())
        .map(|c| {
            if !c.is_ascii() || INVALID_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Returns `path` in a form that can be opened regardless of its length.
///
/// On Windows, paths longer than `threshold` bytes get the extended-length
/// prefix and their separators normalized to `\`. Other platforms have no
/// such limit and get the path back unchanged.
#[must_use]
pub fn escape_long_path(path: &Utf8Path, threshold: usize) -> Utf8PathBuf {
    escape_for(path, threshold, cfg!(windows))
}

fn escape_for(path: &Utf8Path, threshold: usize, windows: bool) -> Utf8PathBuf {
    let raw = path.as_str();
    if !windows || raw.len() <= threshold || raw.starts_with(EXTENDED_LENGTH_PREFIX) {
        return path.to_owned();
    }

    let mut escaped = String::with_capacity(EXTENDED_LENGTH_PREFIX.len() + raw.len());
    escaped.push_str(EXTENDED_LENGTH_PREFIX);
    escaped.extend(raw.chars().map(|c| if c == '/' { '\\' } else { c }));
    Utf8PathBuf::from(escaped)
}
