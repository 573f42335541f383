//! Query-string filters for composer and work listings
//!
//! Every value arrives as text. Numbers are parsed here, so a bad
//! `?bornAfter=abc` is a validation error instead of a silent zero.

use serde::Deserialize;
use uuid::Uuid;

use super::validation::{non_empty, parse_id, parse_int, Validate};
use super::ValidationError;

/// Constraint on `born`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BornFilter {
    Exact(i32),
    /// Exclusive bounds
    Between { after: Option<i32>, before: Option<i32> },
}

/// Column a composer listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerSortField {
    Name,
    Born,
    Death,
    Era,
}

impl ComposerSortField {
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "name" => Ok(Self::Name),
            "born" => Ok(Self::Born),
            "death" => Ok(Self::Death),
            "era" => Ok(Self::Era),
            other => Err(ValidationError::InvalidVariant {
                field: "sort",
                value: other.to_owned(),
            }),
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Born => "born",
            Self::Death => "death",
            Self::Era => "era",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One `field` / `-field` entry of a sort expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: ComposerSortField,
    pub direction: SortDirection,
}

/// Parse `sort=-born,name` (commas or spaces) into ordered sort keys.
pub fn parse_sort(expr: &str) -> Result<Vec<SortKey>, ValidationError> {
    let mut keys: Vec<SortKey> = Vec::new();
    for token in expr
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let (direction, name) = match token.strip_prefix('-') {
            Some(name) => (SortDirection::Desc, name),
            None => (SortDirection::Asc, token.strip_prefix('+').unwrap_or(token)),
        };
        let field = ComposerSortField::parse(name)?;
        // first mention of a field wins
        if !keys.iter().any(|k| k.field == field) {
            keys.push(SortKey { field, direction });
        }
    }
    Ok(keys)
}

/// GET /composers query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerQueryParams {
    pub name: Option<String>,
    pub era: Option<String>,
    pub born: Option<String>,
    pub born_after: Option<String>,
    pub born_before: Option<String>,
    pub sort: Option<String>,
}

/// Validated composer filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposerFilter {
    /// Case-insensitive substring of the name
    pub name: Option<String>,
    pub era: Option<String>,
    pub born: Option<BornFilter>,
    pub sort: Vec<SortKey>,
}

impl Validate for ComposerQueryParams {
    type Output = ComposerFilter;

    fn validate(self) -> Result<ComposerFilter, ValidationError> {
        let born = non_empty(self.born)
            .map(|v| parse_int("born", &v))
            .transpose()?;
        let after = non_empty(self.born_after)
            .map(|v| parse_int("bornAfter", &v))
            .transpose()?;
        let before = non_empty(self.born_before)
            .map(|v| parse_int("bornBefore", &v))
            .transpose()?;

        // a range replaces an exact match on the same field
        let born = if after.is_some() || before.is_some() {
            Some(BornFilter::Between { after, before })
        } else {
            born.map(BornFilter::Exact)
        };

        let sort = match non_empty(self.sort) {
            Some(expr) => parse_sort(&expr)?,
            None => Vec::new(),
        };

        Ok(ComposerFilter {
            name: non_empty(self.name),
            era: non_empty(self.era),
            born,
            sort,
        })
    }
}

/// GET /works query string
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkQueryParams {
    pub composer_id: Option<String>,
    pub year: Option<String>,
    #[serde(rename = "type")]
    pub work_type: Option<String>,
    pub q: Option<String>,
}

/// Validated work filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkFilter {
    pub composer_id: Option<Uuid>,
    pub year: Option<i32>,
    pub work_type: Option<String>,
    /// Case-insensitive substring of the title
    pub title_contains: Option<String>,
}

impl WorkFilter {
    /// All works referencing one composer.
    pub fn for_composer(composer_id: Uuid) -> Self {
        Self {
            composer_id: Some(composer_id),
            ..Default::default()
        }
    }
}

impl Validate for WorkQueryParams {
    type Output = WorkFilter;

    fn validate(self) -> Result<WorkFilter, ValidationError> {
        Ok(WorkFilter {
            composer_id: non_empty(self.composer_id)
                .map(|v| parse_id("composerId", &v))
                .transpose()?,
            year: non_empty(self.year)
                .map(|v| parse_int("year", &v))
                .transpose()?,
            work_type: non_empty(self.work_type),
            title_contains: non_empty(self.q),
        })
    }
}
