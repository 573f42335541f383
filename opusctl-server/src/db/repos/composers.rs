//! Composer repository
//!
//! Handles composer CRUD plus the cross-collection operations:
//! - list: dynamic filter/sort via QueryBuilder
//! - get_with_works: LEFT JOIN on works, aggregated in one query
//! - add/remove_notable_work: single-statement set update (row-locked)
//! - stats: count, mean and per-era counts from one statement

use sqlx::types::Json;
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{DbError, Work};
use crate::models::{BornFilter, ComposerFilter, ComposerPatch, NewComposer, WorkTitle};

const COMPOSER_COLUMNS: &str = "id, name, born, death, era, bio, notable_works";

/// Composer record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Composer {
    pub id: Uuid,
    pub name: String,
    pub born: i32,
    pub death: Option<i32>,
    pub era: Option<String>,
    pub bio: Option<String>,
    pub notable_works: Vec<String>,
}

/// Composer joined with every work that references it
#[derive(Debug, Clone)]
pub struct ComposerWithWorks {
    pub composer: Composer,
    pub works: Vec<Work>,
}

/// Number of composers sharing an era (`None` for composers without one)
#[derive(Debug, Clone, PartialEq)]
pub struct EraCount {
    pub era: Option<String>,
    pub count: i64,
}

/// Aggregate statistics over the composers table
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerStats {
    pub total: i64,
    /// Mean of `born`; `None` when there are no composers
    pub avg_born: Option<f64>,
    /// Sorted by count, descending
    pub by_era: Vec<EraCount>,
}

/// Check whether a composer exists.
///
/// Generic over the executor so it can run inside a transaction.
pub async fn composer_exists<'e, E>(executor: E, id: Uuid) -> Result<bool, DbError>
where
    E: PgExecutor<'e>,
{
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM composers WHERE id = $1)")
            .bind(id)
            .fetch_one(executor)
            .await?;
    Ok(exists)
}

/// Build the SELECT for a filtered, sorted composer listing.
pub(crate) fn list_query(filter: &ComposerFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {} FROM composers WHERE 1=1",
        COMPOSER_COLUMNS
    ));

    if let Some(name) = &filter.name {
        builder
            .push(" AND strpos(lower(name), lower(")
            .push_bind(name.clone())
            .push(")) > 0");
    }
    if let Some(era) = &filter.era {
        builder.push(" AND era = ").push_bind(era.clone());
    }
    match filter.born {
        Some(BornFilter::Exact(year)) => {
            builder.push(" AND born = ").push_bind(year);
        }
        Some(BornFilter::Between { after, before }) => {
            if let Some(after) = after {
                builder.push(" AND born > ").push_bind(after);
            }
            if let Some(before) = before {
                builder.push(" AND born < ").push_bind(before);
            }
        }
        None => {}
    }

    builder.push(" ORDER BY ");
    if filter.sort.is_empty() {
        builder.push("name ASC");
    } else {
        let mut order = builder.separated(", ");
        for key in &filter.sort {
            order.push(format_args!(
                "{} {}",
                key.field.column(),
                key.direction.as_sql()
            ));
        }
    }

    builder
}

/// Build the UPDATE for a non-empty patch.
pub(crate) fn update_query(id: Uuid, patch: ComposerPatch) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE composers SET ");
    {
        let mut set = builder.separated(", ");
        if let Some(name) = patch.name {
            set.push("name = ").push_bind_unseparated(name.as_str().to_owned());
        }
        if let Some(born) = patch.born {
            set.push("born = ").push_bind_unseparated(born);
        }
        if let Some(death) = patch.death {
            set.push("death = ").push_bind_unseparated(death);
        }
        if let Some(era) = patch.era {
            set.push("era = ").push_bind_unseparated(era);
        }
        if let Some(bio) = patch.bio {
            set.push("bio = ").push_bind_unseparated(bio);
        }
        if let Some(notable_works) = patch.notable_works {
            set.push("notable_works = ").push_bind_unseparated(notable_works);
        }
    }

    builder
        .push(" WHERE id = ")
        .push_bind(id)
        .push(format_args!(" RETURNING {}", COMPOSER_COLUMNS));
    builder
}

/// Composer repository
pub struct ComposerRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ComposerRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a composer. A taken name is reported as `Conflict`.
    pub async fn create(&self, new: NewComposer) -> Result<Composer, DbError> {
        let composer: Composer = sqlx::query_as(&format!(
            r#"
            INSERT INTO composers (name, born, death, era, bio, notable_works)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            COMPOSER_COLUMNS
        ))
        .bind(new.name.as_str())
        .bind(new.born)
        .bind(new.death)
        .bind(new.era)
        .bind(new.bio)
        .bind(new.notable_works)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::unique(e, "composer", "name"))?;

        tracing::debug!(id = %composer.id, name = %composer.name, "composer created");
        Ok(composer)
    }

    /// Get a single composer by ID.
    pub async fn get(&self, id: Uuid) -> Result<Composer, DbError> {
        sqlx::query_as(&format!(
            "SELECT {} FROM composers WHERE id = $1",
            COMPOSER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("composer", id))
    }

    /// List composers matching a filter. No match is an empty list.
    pub async fn list(&self, filter: &ComposerFilter) -> Result<Vec<Composer>, DbError> {
        let mut builder = list_query(filter);
        tracing::debug!(sql = builder.sql(), "listing composers");
        let composers = builder
            .build_query_as::<Composer>()
            .fetch_all(self.pool)
            .await?;
        Ok(composers)
    }

    /// Apply a partial update and return the new record.
    pub async fn update(&self, id: Uuid, patch: ComposerPatch) -> Result<Composer, DbError> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut builder = update_query(id, patch);
        let updated = builder
            .build_query_as::<Composer>()
            .fetch_optional(self.pool)
            .await
            .map_err(|e| DbError::unique(e, "composer", "name"))?;

        updated.ok_or_else(|| DbError::not_found("composer", id))
    }

    /// Delete a composer (idempotent). Works that reference it are kept.
    ///
    /// Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM composers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a title to `notable_works` unless it is already there.
    pub async fn add_notable_work(&self, id: Uuid, title: &WorkTitle) -> Result<Composer, DbError> {
        sqlx::query_as(&format!(
            r#"
            UPDATE composers
            SET notable_works = CASE
                WHEN $2 = ANY(notable_works) THEN notable_works
                ELSE array_append(notable_works, $2)
            END
            WHERE id = $1
            RETURNING {}
            "#,
            COMPOSER_COLUMNS
        ))
        .bind(id)
        .bind(title.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("composer", id))
    }

    /// Remove a title from `notable_works`; absent titles are a no-op.
    pub async fn remove_notable_work(
        &self,
        id: Uuid,
        title: &WorkTitle,
    ) -> Result<Composer, DbError> {
        sqlx::query_as(&format!(
            r#"
            UPDATE composers
            SET notable_works = array_remove(notable_works, $2)
            WHERE id = $1
            RETURNING {}
            "#,
            COMPOSER_COLUMNS
        ))
        .bind(id)
        .bind(title.as_str())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("composer", id))
    }

    /// Get a composer with all of its works.
    ///
    /// LEFT JOIN so a composer without works still comes back,
    /// with an empty list.
    pub async fn get_with_works(&self, id: Uuid) -> Result<ComposerWithWorks, DbError> {
        let row = sqlx::query(
            r#"
            SELECT
                c.id, c.name, c.born, c.death, c.era, c.bio, c.notable_works,
                COALESCE(
                    json_agg(
                        json_build_object(
                            'id', w.id,
                            'title', w.title,
                            'year', w.year,
                            'work_type', w.work_type,
                            'composer_id', w.composer_id,
                            'duration_min', w.duration_min,
                            'instrumentation', w.instrumentation,
                            'notes', w.notes,
                            'created_at', w.created_at,
                            'updated_at', w.updated_at
                        )
                        ORDER BY w.created_at, w.id
                    ) FILTER (WHERE w.id IS NOT NULL),
                    '[]'::json
                ) AS works
            FROM composers c
            LEFT JOIN works w ON w.composer_id = c.id
            WHERE c.id = $1
            GROUP BY c.id
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("composer", id))?;

        let composer = Composer::from_row(&row)?;
        let Json(works): Json<Vec<Work>> = row.try_get("works")?;

        Ok(ComposerWithWorks { composer, works })
    }

    /// Compute count, mean birth year and per-era counts.
    ///
    /// One statement, so all three figures come from the same snapshot.
    /// Zero composers yields zero rows: total 0, no mean, no eras.
    pub async fn stats(&self) -> Result<ComposerStats, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT
                era,
                COUNT(*) AS count,
                (SUM(COUNT(*)) OVER ())::bigint AS total,
                (SUM(SUM(born)) OVER () / NULLIF(SUM(COUNT(born)) OVER (), 0))::float8 AS avg_born
            FROM composers
            GROUP BY era
            ORDER BY count DESC, era
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        let total = rows.first().map(|r| r.get::<i64, _>("total")).unwrap_or(0);
        let avg_born = rows
            .first()
            .and_then(|r| r.get::<Option<f64>, _>("avg_born"));
        let by_era = rows
            .into_iter()
            .map(|r| EraCount {
                era: r.get("era"),
                count: r.get("count"),
            })
            .collect();

        Ok(ComposerStats {
            total,
            avg_born,
            by_era,
        })
    }
}
