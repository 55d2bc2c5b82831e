//! Validation error types and field checks

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

/// Validation error for request payloads and parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., zip code)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Number outside the accepted range
    OutOfRange { field: &'static str, min: i64, max: i64 },

    /// Update body carried nothing to change
    NoChanges,

    /// Query parameter the resource cannot be filtered by
    UnknownFilter { name: String },

    /// Same filter given more than once
    DuplicateFilter { name: &'static str },

    /// Body, path or query could not be parsed at all
    Malformed { target: &'static str, detail: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            Self::NoChanges => write!(f, "request body must contain at least one field to update"),
            Self::UnknownFilter { name } => write!(f, "unknown filter '{}'", name),
            Self::DuplicateFilter { name } => write!(f, "filter '{}' given more than once", name),
            Self::Malformed { target, detail } => write!(f, "invalid {}: {}", target, detail),
        }
    }
}

impl std::error::Error for ValidationError {}

static STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2}$").expect("invalid state regex"));

static ZIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5}$").expect("invalid zip regex"));

/// Non-blank text of at most `max` characters. The value is kept as given.
pub fn text(field: &'static str, value: String, max: usize) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

/// Optional free text: may be empty, bounded by `max` characters.
pub fn free_text(field: &'static str, value: String, max: usize) -> Result<String, ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(value)
}

/// Identifier of a user, owner or business: strictly positive.
pub fn positive_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value < 1 {
        return Err(ValidationError::OutOfRange {
            field,
            min: 1,
            max: i64::MAX,
        });
    }
    Ok(value)
}

pub fn in_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<i64, ValidationError> {
    if !(min..=max).contains(&value) {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(value)
}

/// Two-letter US state code.
pub fn state_code(field: &'static str, value: String) -> Result<String, ValidationError> {
    if !STATE_RE.is_match(&value) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a two-letter state code",
        });
    }
    Ok(value)
}

/// Five-digit zip code.
pub fn zip_code(field: &'static str, value: String) -> Result<String, ValidationError> {
    if !ZIP_RE.is_match(&value) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be exactly five digits",
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "name",
            max: 50,
        };
        assert_eq!(err.to_string(), "name exceeds maximum length of 50 characters");

        let err = ValidationError::OutOfRange {
            field: "stars",
            min: 0,
            max: 5,
        };
        assert_eq!(err.to_string(), "stars must be between 0 and 5");
    }

    #[test]
    fn text_rejects_blank() {
        let err = text("name", "   ".into(), 50).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "name" });
    }

    #[test]
    fn text_counts_characters_not_bytes() {
        assert!(text("city", "é".repeat(50), 50).is_ok());
        assert!(text("city", "é".repeat(51), 50).is_err());
    }

    #[test]
    fn free_text_allows_empty() {
        assert_eq!(free_text("review_text", String::new(), 10).unwrap(), "");
    }

    #[test]
    fn state_and_zip_formats() {
        assert!(state_code("state", "OR".into()).is_ok());
        assert!(state_code("state", "Ore".into()).is_err());
        assert!(state_code("state", "1A".into()).is_err());

        assert!(zip_code("zip_code", "97331".into()).is_ok());
        assert!(zip_code("zip_code", "9733".into()).is_err());
        assert!(zip_code("zip_code", "9733a".into()).is_err());
    }

    #[test]
    fn ids_must_be_positive() {
        assert!(positive_id("owner_id", 1).is_ok());
        assert!(matches!(
            positive_id("owner_id", 0),
            Err(ValidationError::OutOfRange { field: "owner_id", .. })
        ));
    }
}
