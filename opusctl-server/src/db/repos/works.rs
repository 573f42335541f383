//! Work repository
//!
//! Handles work CRUD with:
//! - Composer existence check and insert in one transaction
//! - Filtered listing via QueryBuilder

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{composer_exists, DbError};
use crate::models::{NewWork, WorkFilter, WorkPatch};

const WORK_COLUMNS: &str = "id, title, year, work_type, composer_id, duration_min, \
                            instrumentation, notes, created_at, updated_at";

/// Work record from database
///
/// Also decoded from the JSON aggregate built by
/// `ComposerRepo::get_with_works`, hence `Deserialize`.
#[derive(Debug, Clone, PartialEq, FromRow, Deserialize)]
pub struct Work {
    pub id: Uuid,
    pub title: String,
    pub year: Option<i32>,
    pub work_type: Option<String>,
    pub composer_id: Uuid,
    pub duration_min: Option<f64>,
    pub instrumentation: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Build the SELECT for a filtered work listing.
pub(crate) fn list_query(filter: &WorkFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM works WHERE 1=1", WORK_COLUMNS));

    if let Some(composer_id) = filter.composer_id {
        builder.push(" AND composer_id = ").push_bind(composer_id);
    }
    if let Some(year) = filter.year {
        builder.push(" AND year = ").push_bind(year);
    }
    if let Some(work_type) = &filter.work_type {
        builder.push(" AND work_type = ").push_bind(work_type.clone());
    }
    if let Some(q) = &filter.title_contains {
        builder
            .push(" AND strpos(lower(title), lower(")
            .push_bind(q.clone())
            .push(")) > 0");
    }

    builder.push(" ORDER BY created_at, id");
    builder
}

/// Build the UPDATE for a patch; always bumps `updated_at`.
pub(crate) fn update_query(id: Uuid, patch: WorkPatch) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE works SET ");
    {
        let mut set = builder.separated(", ");
        if let Some(title) = patch.title {
            set.push("title = ").push_bind_unseparated(title.into_string());
        }
        if let Some(year) = patch.year {
            set.push("year = ").push_bind_unseparated(year);
        }
        if let Some(work_type) = patch.work_type {
            set.push("work_type = ").push_bind_unseparated(work_type);
        }
        if let Some(composer_id) = patch.composer_id {
            set.push("composer_id = ").push_bind_unseparated(composer_id);
        }
        if let Some(duration_min) = patch.duration_min {
            set.push("duration_min = ").push_bind_unseparated(duration_min);
        }
        if let Some(instrumentation) = patch.instrumentation {
            set.push("instrumentation = ")
                .push_bind_unseparated(instrumentation);
        }
        if let Some(notes) = patch.notes {
            set.push("notes = ").push_bind_unseparated(notes);
        }
        set.push("updated_at = NOW()");
    }

    builder
        .push(" WHERE id = ")
        .push_bind(id)
        .push(format_args!(" RETURNING {}", WORK_COLUMNS));
    builder
}

/// Work repository
pub struct WorkRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> WorkRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a work for an existing composer.
    ///
    /// The composer check is best-effort: nothing stops the composer
    /// being deleted afterwards.
    pub async fn create(&self, new: NewWork) -> Result<Work, DbError> {
        let mut tx = self.pool.begin().await?;

        if !composer_exists(&mut *tx, new.composer_id).await? {
            return Err(DbError::not_found("composer", new.composer_id));
        }

        let work: Work = sqlx::query_as(&format!(
            r#"
            INSERT INTO works
                (title, year, work_type, composer_id, duration_min, instrumentation, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            WORK_COLUMNS
        ))
        .bind(new.title.as_str())
        .bind(new.year)
        .bind(new.work_type)
        .bind(new.composer_id)
        .bind(new.duration_min)
        .bind(new.instrumentation)
        .bind(new.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::debug!(id = %work.id, composer_id = %work.composer_id, "work created");
        Ok(work)
    }

    /// Get a single work by ID.
    pub async fn get(&self, id: Uuid) -> Result<Work, DbError> {
        sqlx::query_as(&format!("SELECT {} FROM works WHERE id = $1", WORK_COLUMNS))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("work", id))
    }

    /// List works matching a filter. No match is an empty list.
    pub async fn list(&self, filter: &WorkFilter) -> Result<Vec<Work>, DbError> {
        let mut builder = list_query(filter);
        tracing::debug!(sql = builder.sql(), "listing works");
        let works = builder.build_query_as::<Work>().fetch_all(self.pool).await?;
        Ok(works)
    }

    /// Apply a partial update and return the new record.
    ///
    /// Moving a work to another composer requires that composer to exist.
    pub async fn update(&self, id: Uuid, patch: WorkPatch) -> Result<Work, DbError> {
        let mut tx = self.pool.begin().await?;

        if let Some(composer_id) = patch.composer_id {
            if !composer_exists(&mut *tx, composer_id).await? {
                return Err(DbError::not_found("composer", composer_id));
            }
        }

        let mut builder = update_query(id, patch);
        let updated = builder
            .build_query_as::<Work>()
            .fetch_optional(&mut *tx)
            .await?;
        let work = updated.ok_or_else(|| DbError::not_found("work", id))?;

        tx.commit().await?;
        Ok(work)
    }

    /// Delete a work (idempotent). Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM works WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
