//! Validation error types

use std::fmt;

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required field was not supplied
    Missing { field: &'static str },

    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// String doesn't match required format (e.g., UUID)
    InvalidFormat { field: &'static str, reason: &'static str },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// Numeric text that does not parse
    InvalidNumber { field: &'static str, value: String },

    /// Number outside the accepted bounds
    OutOfRange { field: &'static str, min: i64, max: i64 },

    /// Request body or query string could not be decoded
    Malformed { reason: String },
}

impl ValidationError {
    /// Name of the offending field, if the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Missing { field }
            | Self::Empty { field }
            | Self::InvalidFormat { field, .. }
            | Self::InvalidVariant { field, .. }
            | Self::InvalidNumber { field, .. }
            | Self::OutOfRange { field, .. } => Some(field),
            Self::Malformed { .. } => None,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { field } => write!(f, "{} is required", field),
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "{} must be a number, got '{}'", field, value)
            }
            Self::OutOfRange { field, min, max } => {
                write!(f, "{} must be between {} and {}", field, min, max)
            }
            Self::Malformed { reason } => write!(f, "malformed request: {}", reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Request schema that validates into a domain value.
///
/// Implemented by every JSON body and query-string type so validation
/// happens once, in the extractor, before a handler runs.
pub trait Validate {
    type Output;

    fn validate(self) -> Result<Self::Output, ValidationError>;
}

/// Parse an identifier that arrived as text.
pub fn parse_id(field: &'static str, value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| ValidationError::InvalidFormat {
        field,
        reason: "invalid UUID format",
    })
}

/// Treat an empty (or whitespace-only) query value as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an integer that arrived as text.
pub(crate) fn parse_int(field: &'static str, value: &str) -> Result<i32, ValidationError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: value.to_owned(),
        })
}

/// Deserialize a patch field so that an explicit `null` is kept apart from
/// an absent key: absent is `None`, `null` is `Some(None)`.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
