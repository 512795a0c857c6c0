//! Validated text types shared across the handover workspace.
//!
//! Form fields are deliberately stored as plain strings so nurses can enter partial or
//! annotated values. The types here are only used at the edges where a value *must* be
//! present, such as the MRN used as the persistence key.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input contained a line break where a single-line value is required
    #[error("Text must be a single line")]
    MultiLine,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A Medical Record Number used as the external lookup key for persisted reports.
///
/// MRNs are not unique client-side; the same MRN may key many stored reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mrn(NonEmptyText);

impl Mrn {
    /// Parses a user-entered MRN.
    ///
    /// # Errors
    ///
    /// - [`TextError::Empty`] if the value is blank.
    /// - [`TextError::MultiLine`] if the value spans more than one line.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let text = NonEmptyText::new(input)?;
        if text.as_str().contains(['\n', '\r']) {
            return Err(TextError::MultiLine);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Case-insensitive substring match against a search query.
    pub fn contains_ignore_case(&self, query: &str) -> bool {
        self.as_str()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}

impl std::fmt::Display for Mrn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Mrn {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::str::FromStr for Mrn {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mrn::parse(s)
    }
}

impl serde::Serialize for Mrn {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Mrn {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Mrn::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Ward 4  ").unwrap();
        assert_eq!(text.as_str(), "Ward 4");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   \t"), Err(TextError::Empty));
    }

    #[test]
    fn test_mrn_rejects_empty() {
        assert_eq!(Mrn::parse(""), Err(TextError::Empty));
    }

    #[test]
    fn test_mrn_rejects_line_breaks() {
        assert_eq!(Mrn::parse("ABC\n123"), Err(TextError::MultiLine));
    }

    #[test]
    fn test_mrn_contains_ignore_case() {
        let mrn = Mrn::parse("ABC123").unwrap();
        assert!(mrn.contains_ignore_case("abc"));
        assert!(mrn.contains_ignore_case("C12"));
        assert!(!mrn.contains_ignore_case("xyz"));
    }

    #[test]
    fn test_mrn_deserialize_rejects_blank() {
        let result: Result<Mrn, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
