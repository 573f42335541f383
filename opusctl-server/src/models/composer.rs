//! Composer request schemas and validated values

use serde::Deserialize;

use super::validation::{nullable, Validate};
use super::{ValidationError, WorkTitle};

/// Earliest accepted birth year
pub const MIN_YEAR: i32 = 0;

/// Latest accepted birth year
pub const MAX_YEAR: i32 = 2025;

/// Validated composer name, stored exactly as submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerName(String);

impl ComposerName {
    /// Accept any name with at least one non-whitespace character.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }
        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check a `born` year against the accepted bounds.
pub fn check_born(year: i32) -> Result<i32, ValidationError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(ValidationError::OutOfRange {
            field: "born",
            min: MIN_YEAR as i64,
            max: MAX_YEAR as i64,
        })
    }
}

/// Validate a list of titles and drop duplicates, keeping first occurrence.
fn title_set(titles: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let mut set: Vec<String> = Vec::with_capacity(titles.len());
    for raw in titles {
        let title = WorkTitle::new(&raw)?.into_string();
        if !set.contains(&title) {
            set.push(title);
        }
    }
    Ok(set)
}

/// POST /composers body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComposerRequest {
    pub name: Option<String>,
    pub born: Option<i32>,
    pub death: Option<i32>,
    pub era: Option<String>,
    pub bio: Option<String>,
    pub notable_works: Option<Vec<String>>,
}

/// Fully validated composer, ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewComposer {
    pub name: ComposerName,
    pub born: i32,
    pub death: Option<i32>,
    pub era: Option<String>,
    pub bio: Option<String>,
    pub notable_works: Vec<String>,
}

impl Validate for CreateComposerRequest {
    type Output = NewComposer;

    fn validate(self) -> Result<NewComposer, ValidationError> {
        let name = match self.name {
            Some(name) => ComposerName::new(&name)?,
            None => return Err(ValidationError::Missing { field: "name" }),
        };
        let born = match self.born {
            Some(born) => check_born(born)?,
            None => return Err(ValidationError::Missing { field: "born" }),
        };
        Ok(NewComposer {
            name,
            born,
            death: self.death,
            era: self.era,
            bio: self.bio,
            notable_works: title_set(self.notable_works.unwrap_or_default())?,
        })
    }
}

/// PUT /composers/{id} body.
///
/// Absent fields are left unchanged. `null` clears the optional fields
/// (`death`, `era`, `bio`); for `name` and `born` it means "keep".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComposerRequest {
    pub name: Option<String>,
    pub born: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub death: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub era: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub bio: Option<Option<String>>,
    pub notable_works: Option<Vec<String>>,
}

/// Validated partial update of a composer
///
/// `Some(None)` on an optional column sets it to NULL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposerPatch {
    pub name: Option<ComposerName>,
    pub born: Option<i32>,
    pub death: Option<Option<i32>>,
    pub era: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub notable_works: Option<Vec<String>>,
}

impl ComposerPatch {
    /// True when the patch would not touch any column.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.born.is_none()
            && self.death.is_none()
            && self.era.is_none()
            && self.bio.is_none()
            && self.notable_works.is_none()
    }
}

impl Validate for UpdateComposerRequest {
    type Output = ComposerPatch;

    fn validate(self) -> Result<ComposerPatch, ValidationError> {
        Ok(ComposerPatch {
            name: self.name.as_deref().map(ComposerName::new).transpose()?,
            born: self.born.map(check_born).transpose()?,
            death: self.death,
            era: self.era,
            bio: self.bio,
            notable_works: self.notable_works.map(title_set).transpose()?,
        })
    }
}

/// Body of POST/DELETE /composers/{id}/works
#[derive(Debug, Default, Deserialize)]
pub struct NotableWorkRequest {
    pub title: Option<String>,
}

impl Validate for NotableWorkRequest {
    type Output = WorkTitle;

    fn validate(self) -> Result<WorkTitle, ValidationError> {
        WorkTitle::required(self.title.as_deref())
    }
}
