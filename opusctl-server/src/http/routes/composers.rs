//! Composer endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use uuid::Uuid;

use super::works::WorkResponse;
use crate::db::{Composer, ComposerRepo, ComposerStats, ComposerWithWorks, EraCount};
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidQuery, ValidUuid};
use crate::http::server::AppState;
use crate::models::{
    ComposerQueryParams, CreateComposerRequest, NotableWorkRequest, UpdateComposerRequest,
};

/// Composer response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposerResponse {
    pub id: Uuid,
    pub name: String,
    pub born: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub death: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub notable_works: Vec<String>,
}

impl From<Composer> for ComposerResponse {
    fn from(c: Composer) -> Self {
        Self {
            id: c.id,
            name: c.name,
            born: c.born,
            death: c.death,
            era: c.era,
            bio: c.bio,
            notable_works: c.notable_works,
        }
    }
}

/// Composer with its works embedded
#[derive(Debug, Serialize)]
pub struct ComposerDetailResponse {
    #[serde(flatten)]
    pub composer: ComposerResponse,
    pub works: Vec<WorkResponse>,
}

impl From<ComposerWithWorks> for ComposerDetailResponse {
    fn from(d: ComposerWithWorks) -> Self {
        Self {
            composer: ComposerResponse::from(d.composer),
            works: d.works.into_iter().map(WorkResponse::from).collect(),
        }
    }
}

/// One `byEra` entry
#[derive(Debug, Serialize)]
pub struct EraCountResponse {
    pub era: Option<String>,
    pub count: i64,
}

impl From<EraCount> for EraCountResponse {
    fn from(e: EraCount) -> Self {
        Self {
            era: e.era,
            count: e.count,
        }
    }
}

/// Aggregate statistics response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total: i64,
    pub avg_born: Option<f64>,
    pub by_era: Vec<EraCountResponse>,
}

impl From<ComposerStats> for StatsResponse {
    fn from(s: ComposerStats) -> Self {
        Self {
            total: s.total,
            avg_born: s.avg_born,
            by_era: s.by_era.into_iter().map(EraCountResponse::from).collect(),
        }
    }
}

/// POST /composers - create a composer
async fn create_composer(
    State(state): State<Arc<AppState>>,
    ValidJson(new): ValidJson<CreateComposerRequest>,
) -> Result<(StatusCode, Json<ComposerResponse>), ApiError> {
    let composer = ComposerRepo::new(&state.pool).create(new).await?;
    tracing::info!(id = %composer.id, name = %composer.name, "created composer");

    Ok((StatusCode::CREATED, Json(ComposerResponse::from(composer))))
}

/// GET /composers - filtered, optionally sorted list
async fn list_composers(
    State(state): State<Arc<AppState>>,
    ValidQuery(filter): ValidQuery<ComposerQueryParams>,
) -> Result<Json<Vec<ComposerResponse>>, ApiError> {
    let composers = ComposerRepo::new(&state.pool).list(&filter).await?;
    Ok(Json(
        composers.into_iter().map(ComposerResponse::from).collect(),
    ))
}

/// GET /composers/stats - count, mean birth year, counts per era
async fn composer_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let stats = ComposerRepo::new(&state.pool).stats().await?;
    Ok(Json(StatsResponse::from(stats)))
}

/// GET /composers/{id} - get a single composer
async fn get_composer(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ComposerResponse>, ApiError> {
    let composer = ComposerRepo::new(&state.pool).get(id).await?;
    Ok(Json(ComposerResponse::from(composer)))
}

/// GET /composers/{id}/detail - composer with its works
async fn get_composer_detail(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<ComposerDetailResponse>, ApiError> {
    let detail = ComposerRepo::new(&state.pool).get_with_works(id).await?;
    Ok(Json(ComposerDetailResponse::from(detail)))
}

/// PUT /composers/{id} - partial update
async fn update_composer(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(patch): ValidJson<UpdateComposerRequest>,
) -> Result<Json<ComposerResponse>, ApiError> {
    let composer = ComposerRepo::new(&state.pool).update(id, patch).await?;
    Ok(Json(ComposerResponse::from(composer)))
}

/// DELETE /composers/{id} - delete (idempotent, works are kept)
async fn delete_composer(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
) -> Result<StatusCode, ApiError> {
    if ComposerRepo::new(&state.pool).delete(id).await? {
        tracing::info!(%id, "deleted composer");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /composers/{id}/works - add a title to notableWorks
async fn add_notable_work(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(title): ValidJson<NotableWorkRequest>,
) -> Result<Json<ComposerResponse>, ApiError> {
    let composer = ComposerRepo::new(&state.pool)
        .add_notable_work(id, &title)
        .await?;
    Ok(Json(ComposerResponse::from(composer)))
}

/// DELETE /composers/{id}/works - remove a title from notableWorks
async fn remove_notable_work(
    State(state): State<Arc<AppState>>,
    ValidUuid(id): ValidUuid,
    ValidJson(title): ValidJson<NotableWorkRequest>,
) -> Result<Json<ComposerResponse>, ApiError> {
    let composer = ComposerRepo::new(&state.pool)
        .remove_notable_work(id, &title)
        .await?;
    Ok(Json(ComposerResponse::from(composer)))
}

/// Composer routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/composers", get(list_composers).post(create_composer))
        .route("/composers/stats", get(composer_stats))
        .route(
            "/composers/{id}",
            get(get_composer).put(update_composer).delete(delete_composer),
        )
        .route("/composers/{id}/detail", get(get_composer_detail))
        .route(
            "/composers/{id}/works",
            post(add_notable_work).delete(remove_notable_work),
        )
}
