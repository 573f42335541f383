//! Work title validation

use super::ValidationError;

/// Validated work title.
///
/// Used both for `Work.title` and for entries of a composer's
/// `notableWorks` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkTitle(String);

impl WorkTitle {
    /// Create a new work title.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    ///
    /// # Example
    /// ```
    /// use opusctl_server::models::WorkTitle;
    ///
    /// assert!(WorkTitle::new("Boléro").is_ok());
    /// assert!(WorkTitle::new("").is_err());
    /// assert!(WorkTitle::new("   ").is_err());  // whitespace only
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Validate an optional title, reporting absence as `Missing`.
    pub fn required(s: Option<&str>) -> Result<Self, ValidationError> {
        match s {
            Some(s) => Self::new(s),
            None => Err(ValidationError::Missing { field: "title" }),
        }
    }

    /// Get the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for WorkTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
