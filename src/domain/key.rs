use std::{fmt, num::NonZeroUsize, str::FromStr};

use non_empty_string::NonEmptyString;

/// A validated tracker project code.
///
/// Project codes are the leading component of a work-item key and must be
/// uppercase ASCII alphanumeric, starting with a letter (for example
/// `PROJ` or `API2`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProjectCode(NonEmptyString);

impl ProjectCode {
    /// Creates a new `ProjectCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProjectCodeError` if the string is empty, does not
    /// start with an uppercase letter, or contains characters other than
    /// uppercase letters and digits.
    pub fn new(s: String) -> Result<Self, InvalidProjectCodeError> {
        let non_empty =
            NonEmptyString::new(s.clone()).map_err(|_| InvalidProjectCodeError(s.clone()))?;

        let mut chars = s.chars();
        let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_uppercase());
        if !starts_with_letter || !chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(InvalidProjectCodeError(s));
        }

        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for ProjectCode {
    type Error = InvalidProjectCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl AsRef<str> for ProjectCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProjectCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectCode {
    type Err = InvalidProjectCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Error returned when a string is not a valid project code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "Invalid project code '{0}': must start with an uppercase letter and contain only uppercase \
     letters and digits"
)]
pub struct InvalidProjectCodeError(String);

/// The key of a work item in the source tracker.
///
/// Format: `{PROJECT}-{NUMBER}`, where `PROJECT` is a [`ProjectCode`] and
/// `NUMBER` is a positive non-zero integer. Examples: `PROJ-123`,
/// `API2-7`.
///
/// Keys namespace the identifiers of criteria extracted from an
/// explicitly supplied list, so that criteria from different work items
/// never collide.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKey {
    project: ProjectCode,
    number: NonZeroUsize,
}

impl ItemKey {
    /// Create a key from pre-validated parts.
    #[must_use]
    pub const fn new(project: ProjectCode, number: NonZeroUsize) -> Self {
        Self { project, number }
    }

    /// The project code component.
    #[must_use]
    pub fn project(&self) -> &str {
        self.project.as_str()
    }

    /// The numeric component.
    #[must_use]
    pub const fn number(&self) -> NonZeroUsize {
        self.number
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.project, self.number)
    }
}

/// Errors that can occur during key parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Invalid key format (malformed structure).
    #[error("Invalid work-item key: {0}")]
    Syntax(String),

    /// Invalid number component (non-numeric or zero).
    #[error("Invalid number in key '{0}': expected a non-zero integer, got {1}")]
    Number(String, String),

    /// Invalid project code component.
    #[error(transparent)]
    Project(#[from] InvalidProjectCodeError),
}

impl FromStr for ItemKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (project_str, number_str) = s.rsplit_once('-').ok_or_else(|| {
            // A key must contain at least one dash separating project and
            // number.
            Error::Syntax(s.to_string())
        })?;

        let number = number_str
            .parse::<usize>()
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| Error::Number(s.to_string(), number_str.to_string()))?;

        let project = ProjectCode::new(project_str.to_string())?;

        Ok(Self::new(project, number))
    }
}

impl TryFrom<&str> for ItemKey {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl TryFrom<String> for ItemKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<ItemKey> for String {
    fn from(key: ItemKey) -> Self {
        key.to_string()
    }
}
