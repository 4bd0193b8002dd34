use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SlugError {
    #[error("slug cannot be empty")]
    Empty,

    #[error("slug contains invalid character {0:?}")]
    InvalidChar(char),

    #[error("slug cannot start or end with a dash")]
    EdgeDash,

    #[error("slug cannot contain consecutive dashes")]
    DoubleDash,
}

/// Stable string identifier for a survey.
///
/// Lowercase ASCII alphanumerics separated by single dashes, e.g.
/// `"satisfaction"` or `"team-culture"`. Appears in URLs, so construction
/// validates the shape instead of trusting the caller.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SurveySlug(String);

impl SurveySlug {
    /// Validates and wraps the given slug text.
    ///
    /// # Errors
    ///
    /// Returns `SlugError` if the text is empty, carries characters outside
    /// `[a-z0-9-]`, or uses dashes at the edges or back to back.
    pub fn new(raw: impl Into<String>) -> Result<Self, SlugError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(SlugError::Empty);
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SlugError::InvalidChar(bad));
        }
        if raw.starts_with('-') || raw.ends_with('-') {
            return Err(SlugError::EdgeDash);
        }
        if raw.contains("--") {
            return Err(SlugError::DoubleDash);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SurveySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurveySlug({:?})", self.0)
    }
}

impl fmt::Display for SurveySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SurveySlug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for SurveySlug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SurveySlug> for String {
    fn from(slug: SurveySlug) -> Self {
        slug.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_slugs() {
        assert!(SurveySlug::new("satisfaction").is_ok());
        assert!(SurveySlug::new("team-culture-2").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(SurveySlug::new("").unwrap_err(), SlugError::Empty);
    }

    #[test]
    fn rejects_uppercase_and_spaces() {
        assert_eq!(
            SurveySlug::new("Satisfaction").unwrap_err(),
            SlugError::InvalidChar('S')
        );
        assert_eq!(
            SurveySlug::new("team culture").unwrap_err(),
            SlugError::InvalidChar(' ')
        );
    }

    #[test]
    fn rejects_bad_dashes() {
        assert_eq!(SurveySlug::new("-edge").unwrap_err(), SlugError::EdgeDash);
        assert_eq!(SurveySlug::new("edge-").unwrap_err(), SlugError::EdgeDash);
        assert_eq!(
            SurveySlug::new("a--b").unwrap_err(),
            SlugError::DoubleDash
        );
    }

    #[test]
    fn parses_from_str() {
        let slug: SurveySlug = "satisfaction".parse().unwrap();
        assert_eq!(slug.as_str(), "satisfaction");
    }
}
