//! Work endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::db::{Work, WorkRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::http::server::AppState;
use crate::models::{CreateWorkRequest, UpdateWorkRequest, WorkFilter, WorkQueryParams};

/// Work response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub work_type: Option<String>,
    pub composer_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrumentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Work> for WorkResponse {
    fn from(w: Work) -> Self {
        Self {
            id: w.id,
            title: w.title,
            year: w.year,
            work_type: w.work_type,
            composer_id: w.composer_id,
            duration_min: w.duration_min,
            instrumentation: w.instrumentation,
            notes: w.notes,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

fn to_responses(works: Vec<Work>) -> Json<Vec<WorkResponse>> {
    Json(works.into_iter().map(WorkResponse::from).collect())
}

/// POST /works - create a work for an existing composer
async fn create_work(
    State(state): State<Arc<AppState>>,
    ValidJson(new): ValidJson<CreateWorkRequest>,
) -> Result<(StatusCode, Json<WorkResponse>), ApiError> {
    let work = WorkRepo::new(&state.pool).create(new).await?;
    tracing::info!(id = %work.id, composer_id = %work.composer_id, "created work");

    Ok((StatusCode::CREATED, Json(WorkResponse::from(work))))
}

/// GET /works - filtered list
async fn list_works(
    State(state): State<Arc<AppState>>,
    ValidQuery(filter): ValidQuery<WorkQueryParams>,
) -> Result<Json<Vec<WorkResponse>>, ApiError> {
    let works = WorkRepo::new(&state.pool).list(&filter).await?;
    Ok(to_responses(works))
}

/// GET /works/by-composer/{composer_id}
///
/// An unknown composer yields an empty array, not 404.
async fn works_by_composer(
    State(state): State<Arc<AppState>>,
    ValidUuid(composer_id): ValidUuid,
) -> Result<Json<Vec<WorkResponse>>, ApiError> {
    let works = WorkRepo::new(&state.pool)
        .list(&WorkFilter::for_composer(composer_id))
        .await?;
    Ok(to_responses(works))
}

/// GET /works/{id}
async fn get_work(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<WorkResponse>, ApiError> {
    let work = WorkRepo::new(&state.pool).get(id).await?;
    Ok(Json(WorkResponse::from(work)))
}

/// PUT /works/{id}
async fn update_work(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(patch): ValidJson<UpdateWorkRequest>,
) -> Result<Json<WorkResponse>, ApiError> {
    let work = WorkRepo::new(&state.pool).update(id, patch).await?;
    Ok(Json(WorkResponse::from(work)))
}

/// DELETE /works/{id}
async fn delete_work(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    if WorkRepo::new(&state.pool).delete(id).await? {
        tracing::info!(%id, "deleted work");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Work routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/works", get(list_works).post(create_work))
        .route("/works/by-composer/{composer_id}", get(works_by_composer))
        .route(
            "/works/{id}",
            get(get_work).put(update_work).delete(delete_work),
        )
}
