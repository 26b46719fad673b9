//! Platform tag for inbound traffic channels.
//!
//! Platforms identify the acquisition channel a visitor arrived from
//! ("whatsapp", "google", "meta", ...). The roster is partitioned by
//! platform; a selection never crosses platforms. Tags are free-form but
//! normalized so `" WhatsApp "` and `"whatsapp"` address the same roster.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`Platform::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformValidationError {
    /// The tag was empty after trimming.
    Empty,
    /// The tag exceeded [`PLATFORM_TAG_MAX`] characters.
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The tag contained characters outside `[a-z0-9_-]` after lowering.
    InvalidCharacters,
}

impl fmt::Display for PlatformValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "platform tag must not be empty"),
            Self::TooLong { max } => {
                write!(f, "platform tag must be at most {max} characters")
            }
            Self::InvalidCharacters => write!(
                f,
                "platform tag may only contain letters, digits, hyphens, or underscores",
            ),
        }
    }
}

impl std::error::Error for PlatformValidationError {}

/// Maximum accepted length for a platform tag.
pub const PLATFORM_TAG_MAX: usize = 32;

/// Normalized platform tag.
///
/// Construction trims surrounding whitespace and lowercases the tag, so
/// equality and hashing already account for the loose casing of the two
/// independently entered data sources.
///
/// # Examples
/// ```
/// use backend::domain::Platform;
///
/// let platform = Platform::new(" WhatsApp ").expect("valid tag");
/// assert_eq!(platform.as_str(), "whatsapp");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Platform(String);

impl Platform {
    /// Validate and construct a [`Platform`] from borrowed input.
    pub fn new(tag: impl AsRef<str>) -> Result<Self, PlatformValidationError> {
        let normalized = tag.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(PlatformValidationError::Empty);
        }
        if normalized.chars().count() > PLATFORM_TAG_MAX {
            return Err(PlatformValidationError::TooLong {
                max: PLATFORM_TAG_MAX,
            });
        }
        if !normalized
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_')
        {
            return Err(PlatformValidationError::InvalidCharacters);
        }
        Ok(Self(normalized))
    }

    /// Access the normalized tag.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.0
    }
}

impl TryFrom<String> for Platform {
    type Error = PlatformValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    //! Normalization and validation coverage.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("whatsapp", "whatsapp")]
    #[case(" WhatsApp ", "whatsapp")]
    #[case("GOOGLE", "google")]
    #[case("meta-ads", "meta-ads")]
    fn accepts_and_normalizes(#[case] input: &str, #[case] expected: &str) {
        let platform = Platform::new(input).expect("valid tag");
        assert_eq!(platform.as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank(#[case] input: &str) {
        assert_eq!(Platform::new(input), Err(PlatformValidationError::Empty));
    }

    #[test]
    fn rejects_overlong_tags() {
        let input = "x".repeat(PLATFORM_TAG_MAX + 1);
        assert_eq!(
            Platform::new(input),
            Err(PlatformValidationError::TooLong {
                max: PLATFORM_TAG_MAX
            })
        );
    }

    #[rstest]
    #[case("what sapp")]
    #[case("meta/ads")]
    fn rejects_invalid_characters(#[case] input: &str) {
        assert_eq!(
            Platform::new(input),
            Err(PlatformValidationError::InvalidCharacters)
        );
    }

    #[test]
    fn normalized_tags_compare_equal() {
        let a = Platform::new("Meta").expect("valid tag");
        let b = Platform::new("  meta").expect("valid tag");
        assert_eq!(a, b);
    }
}
