//! Season classification.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Whether an episode belongs to a regular season or the specials folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonKind {
    /// A numbered season folder (`Season 01`).
    Regular,
    /// The `Specials` folder; always season `00`.
    Special,
}

impl SeasonKind {
    /// Returns the display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Special => "Special",
        }
    }

    /// Parses a display label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Regular" => Some(Self::Regular),
            "Special" => Some(Self::Special),
            _ => None,
        }
    }
}

impl fmt::Display for SeasonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A season number, rendered zero-padded to two digits.
///
/// # Examples
///
/// ```
/// use mm_core::SeasonNumber;
///
/// let season = SeasonNumber::parse("1").expect("numeric");
/// assert_eq!(season.to_string(), "01");
/// assert_eq!(SeasonNumber::SPECIALS.to_string(), "00");
/// assert!(SeasonNumber::parse("one").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeasonNumber(u16);

impl SeasonNumber {
    /// The season number of the specials folder.
    pub const SPECIALS: Self = Self(0);

    /// Creates a season number.
    #[inline]
    #[must_use]
    pub const fn new(number: u16) -> Self {
        Self(number)
    }

    /// Parses a decimal season number such as `"1"` or `"01"`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        text.parse().ok().map(Self)
    }

    /// Returns the numeric value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for SeasonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl Serialize for SeasonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeasonNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid season number '{text}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding() {
        assert_eq!(SeasonNumber::new(3).to_string(), "03");
        assert_eq!(SeasonNumber::new(12).to_string(), "12");
        assert_eq!(SeasonNumber::new(104).to_string(), "104");
    }

    #[test]
    fn test_parse_rejects_signs_and_text() {
        assert!(SeasonNumber::parse("-1").is_none());
        assert!(SeasonNumber::parse("+1").is_none());
        assert!(SeasonNumber::parse("").is_none());
        assert_eq!(SeasonNumber::parse("07"), Some(SeasonNumber::new(7)));
    }

    #[test]
    fn test_serde_as_padded_string() {
        let json = serde_json::to_string(&SeasonNumber::new(1)).expect("serialize");
        assert_eq!(json, r#""01""#);

        let parsed: SeasonNumber = serde_json::from_str(r#""00""#).expect("deserialize");
        assert_eq!(parsed, SeasonNumber::SPECIALS);

        assert!(serde_json::from_str::<SeasonNumber>(r#""S1""#).is_err());
    }
}
