//! Error types for the mm-core crate.
//!
//! [`ConfigError`] covers configuration loading and validation across the
//! workspace.

use camino::Utf8PathBuf;

/// Errors that can occur while loading or validating configuration.
///
/// # Examples
///
/// ```
/// use mm_core::ConfigError;
/// use camino::Utf8PathBuf;
///
/// let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/srv/mirror"));
/// assert!(error.to_string().contains("/srv/mirror"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The shadow root does not exist or is not a directory.
    #[error("missing required directory: {0}")]
    MissingDirectory(Utf8PathBuf),

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// Dotted name of the option.
        option: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for [`Config`](crate::Config).
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_display() {
        let error = ConfigError::MissingDirectory(Utf8PathBuf::from("/missing/mirror"));
        assert_eq!(error.to_string(), "missing required directory: /missing/mirror");
    }

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::InvalidOption {
            option: "mirror.entry_extension".to_owned(),
            reason: "must be non-empty".to_owned(),
        };
        let msg = error.to_string();
        assert!(msg.contains("mirror.entry_extension"));
        assert!(msg.contains("must be non-empty"));
    }
}
