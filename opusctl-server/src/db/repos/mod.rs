//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; handlers build one per request
//! - Absent rows surface as `DbError::NotFound`
//! - Unique violations surface as `DbError::Conflict`

pub mod composers;
pub mod works;

pub use composers::{composer_exists, Composer, ComposerRepo, ComposerStats, ComposerWithWorks, EraCount};
pub use works::{Work, WorkRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: a {resource} with this {field} already exists")]
    Conflict {
        resource: &'static str,
        field: &'static str,
    },
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Translate a unique-constraint violation into `Conflict`.
    pub(crate) fn unique(err: sqlx::Error, resource: &'static str, field: &'static str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict { resource, field }
            }
            _ => Self::Sqlx(err),
        }
    }
}
