//! # Report Types
//!
//! Validated primitive text types shared by the clinic report crates.

use regex::Regex;
use std::sync::OnceLock;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input text is not a syntactically valid email address
    #[error("Please enter a valid email address.")]
    InvalidEmail,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
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

    /// Returns the first character, upper-cased.
    pub fn initial(&self) -> char {
        self.0
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
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

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"))
}

/// An email address that passed the login screen's syntax check.
///
/// The check is deliberately loose: a local part, `@`, a domain, `.`, and a TLD, with no
/// whitespace anywhere. The value is stored exactly as typed (no trimming), since surrounding
/// whitespace already fails the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses an email address, returning `TextError::InvalidEmail` if the syntax is wrong.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if email_regex().is_match(input) {
            Ok(Self(input.to_owned()))
        } else {
            Err(TextError::InvalidEmail)
        }
    }

    /// Returns `true` if `input` would parse as an email address.
    pub fn is_valid(input: &str) -> bool {
        email_regex().is_match(input)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims() {
        let text = NonEmptyText::new("  Dr Jones  ").unwrap();
        assert_eq!(text.as_str(), "Dr Jones");
    }

    #[test]
    fn test_non_empty_text_rejects_blank() {
        assert_eq!(NonEmptyText::new("   \t").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn test_non_empty_text_initial_is_uppercased() {
        let text = NonEmptyText::new("alice@example.com").unwrap();
        assert_eq!(text.initial(), 'A');
    }

    #[test]
    fn test_non_empty_text_deserialize_rejects_blank() {
        let result: Result<NonEmptyText, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn test_email_accepts_simple_address() {
        let email = EmailAddress::parse("a@b.com").unwrap();
        assert_eq!(email.as_str(), "a@b.com");
    }

    #[test]
    fn test_email_rejects_bad_syntax() {
        for bad in [
            "",
            "plainaddress",
            "a@b",
            "@b.com",
            "a@.com",
            "a b@c.com",
            "a@b .com",
            " a@b.com",
            "a@@b.com",
        ] {
            assert_eq!(
                EmailAddress::parse(bad).unwrap_err(),
                TextError::InvalidEmail,
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_email_accepts_subdomains_and_plus() {
        assert!(EmailAddress::is_valid("first.last+tag@mail.clinic.co.uk"));
    }
}
